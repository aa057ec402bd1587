// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Dispatchers
//!
//! Scripted dispatchers for exercising the transport without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::dispatcher::{Dispatcher, DispatcherFactory, PreparedRequest, RawResponse};
use super::error::NetworkError;
use super::proxy::ProxyConfig;

/// Result of one mocked dispatch.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Respond with an HTTP status and body.
    Respond(u16, Vec<u8>),
    /// Fail as if the connection was refused.
    Fail(String),
}

impl MockOutcome {
    /// `200 OK` with a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        MockOutcome::Respond(200, value.to_string().into_bytes())
    }
}

/// Dispatcher that replays queued outcomes, then a fixed fallback.
pub struct MockDispatcher {
    queued: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl MockDispatcher {
    pub fn new(fallback: MockOutcome) -> Self {
        MockDispatcher {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `value`.
    pub fn responding(value: serde_json::Value) -> Self {
        Self::new(MockOutcome::json(value))
    }

    /// Always fails with a connection error.
    pub fn failing() -> Self {
        Self::new(MockOutcome::Fail("connection refused".into()))
    }

    /// Queues an outcome used before the fallback.
    pub fn push(&self, outcome: MockOutcome) {
        self.queued.lock().push_back(outcome);
    }

    /// Returns all requests seen so far.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(&self, request: &PreparedRequest) -> Result<RawResponse, NetworkError> {
        self.requests.lock().push(request.clone());

        let outcome = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match outcome {
            MockOutcome::Respond(status, body) => Ok(RawResponse { status, body }),
            MockOutcome::Fail(reason) => Err(NetworkError::ConnectionFailed(reason)),
        }
    }
}

/// Factory handing out mock dispatchers and recording proxy installs.
pub struct MockDispatcherFactory {
    direct: Arc<MockDispatcher>,
    proxied: Mutex<HashMap<String, Arc<MockDispatcher>>>,
    proxied_default: Option<Arc<MockDispatcher>>,
    rejected: Mutex<Vec<String>>,
    installed: Mutex<Vec<ProxyConfig>>,
}

impl MockDispatcherFactory {
    pub fn new(direct: Arc<MockDispatcher>) -> Self {
        MockDispatcherFactory {
            direct,
            proxied: Mutex::new(HashMap::new()),
            proxied_default: None,
            rejected: Mutex::new(Vec::new()),
            installed: Mutex::new(Vec::new()),
        }
    }

    /// Dispatcher used for any proxy without a specific entry.
    pub fn with_proxied_default(mut self, dispatcher: Arc<MockDispatcher>) -> Self {
        self.proxied_default = Some(dispatcher);
        self
    }

    /// Dispatcher used for proxies on `host`.
    pub fn with_proxy(self, host: &str, dispatcher: Arc<MockDispatcher>) -> Self {
        self.proxied.lock().insert(host.to_string(), dispatcher);
        self
    }

    /// Makes proxies on `host` fail to build.
    pub fn reject_proxy(self, host: &str) -> Self {
        self.rejected.lock().push(host.to_string());
        self
    }

    /// Proxies handed to `proxied`, in order.
    pub fn installed(&self) -> Vec<ProxyConfig> {
        self.installed.lock().clone()
    }
}

impl DispatcherFactory for MockDispatcherFactory {
    fn direct(&self) -> Result<Arc<dyn Dispatcher>, NetworkError> {
        Ok(self.direct.clone())
    }

    fn proxied(&self, proxy: &ProxyConfig) -> Result<Arc<dyn Dispatcher>, NetworkError> {
        self.installed.lock().push(proxy.clone());

        if self.rejected.lock().iter().any(|h| h == proxy.host()) {
            return Err(NetworkError::InvalidProxy(proxy.to_string()));
        }

        let specific = self.proxied.lock().get(proxy.host()).cloned();
        let dispatcher = specific
            .or_else(|| self.proxied_default.clone())
            .unwrap_or_else(|| Arc::new(MockDispatcher::failing()));
        Ok(dispatcher)
    }
}
