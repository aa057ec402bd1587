// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Listener registry and lifecycle callbacks.
//!
//! Registrations live outside the socket and survive reconnects.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::RwLock;

use super::frame::InboundFrame;
use super::topic::Topic;
use crate::network::NetworkError;

/// Callback invoked with the community scope and the frame.
pub type EventCallback<S> = Arc<dyn Fn(S, Arc<InboundFrame>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Boxes an async closure into an [`EventCallback`].
pub fn event_callback<S, F, Fut>(f: F) -> EventCallback<S>
where
    F: Fn(S, Arc<InboundFrame>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |scope, frame| Box::pin(f(scope, frame)))
}

/// Topic to callbacks mapping.
pub struct ListenerRegistry<S> {
    topics: RwLock<HashMap<Topic, Vec<EventCallback<S>>>>,
}

impl<S> ListenerRegistry<S> {
    pub fn new() -> Self {
        ListenerRegistry {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `callback` under every topic in `topics`.
    pub fn register(&self, topics: &[Topic], callback: EventCallback<S>) {
        let mut map = self.topics.write();
        for topic in topics {
            map.entry(*topic).or_default().push(callback.clone());
        }
    }

    /// Snapshot of the callbacks for `topic`.
    pub fn callbacks(&self, topic: Topic) -> Vec<EventCallback<S>> {
        self.topics.read().get(&topic).cloned().unwrap_or_default()
    }

    pub fn count(&self, topic: Topic) -> usize {
        self.topics.read().get(&topic).map_or(0, Vec::len)
    }
}

impl<S> Default for ListenerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

type OpenCallback = Arc<dyn Fn() + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&NetworkError) + Send + Sync>;
type CloseCallback = Arc<dyn Fn(Option<u16>) + Send + Sync>;

/// Connection lifecycle callbacks.
#[derive(Default)]
pub struct LifecycleHandlers {
    open: RwLock<Vec<OpenCallback>>,
    error: RwLock<Vec<ErrorCallback>>,
    close: RwLock<Vec<CloseCallback>>,
}

impl LifecycleHandlers {
    pub fn on_open(&self, f: impl Fn() + Send + Sync + 'static) {
        self.open.write().push(Arc::new(f));
    }

    pub fn on_error(&self, f: impl Fn(&NetworkError) + Send + Sync + 'static) {
        self.error.write().push(Arc::new(f));
    }

    pub fn on_close(&self, f: impl Fn(Option<u16>) + Send + Sync + 'static) {
        self.close.write().push(Arc::new(f));
    }

    pub(crate) fn emit_open(&self) {
        let handlers = self.open.read().clone();
        handlers.iter().for_each(|f| f());
    }

    pub(crate) fn emit_error(&self, error: &NetworkError) {
        let handlers = self.error.read().clone();
        handlers.iter().for_each(|f| f(error));
    }

    pub(crate) fn emit_close(&self, code: Option<u16>) {
        let handlers = self.close.read().clone();
        handlers.iter().for_each(|f| f(code));
    }
}
