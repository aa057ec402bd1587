// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Realtime Channel
//!
//! Owns the single WebSocket of an authenticated identity. A background task
//! connects, pumps the outbound queue, classifies inbound frames and closes
//! and re-establishes the socket on a fixed timer. Listener registrations,
//! the outbound queue and voice sessions all outlive any one socket.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::command::{CommandArg, CommandContext};
use super::frame::{self, InboundFrame, OutboundFrame, OutboundQueue};
use super::handshake::{handshake_request, unix_millis, RealtimeIdentity};
use super::listeners::{event_callback, EventCallback, LifecycleHandlers, ListenerRegistry};
use super::topic::{classify, Topic};
use super::voice::{spawn_keep_alive, VoiceSessionSet};
use super::RealtimeConfig;
use crate::crypto::CredentialSigner;
use crate::network::NetworkError;
use crate::oracle::ElapsedRealtimeClock;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connection state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Open,
    Reconnecting,
    Closed,
}

/// Materializes the handle passed to listeners for a community.
pub trait ScopeProvider<S>: Send + Sync {
    fn scope(&self, ndc_id: i64) -> S;
}

/// Realtime event channel.
pub struct RealtimeChannel<S> {
    config: RealtimeConfig,
    identity: RealtimeIdentity,
    signer: CredentialSigner,
    clock: Arc<ElapsedRealtimeClock>,
    scopes: Arc<dyn ScopeProvider<S>>,
    scope_cache: Mutex<HashMap<i64, S>>,
    listeners: ListenerRegistry<S>,
    lifecycle: LifecycleHandlers,
    voice: Arc<VoiceSessionSet>,
    outbound: OutboundQueue,
    outbound_rx: Mutex<Option<mpsc::Receiver<String>>>,
    state: RwLock<ChannelState>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: Clone + Send + Sync + 'static> RealtimeChannel<S> {
    /// Creates a disconnected channel.
    pub fn new(
        config: RealtimeConfig,
        identity: RealtimeIdentity,
        signer: CredentialSigner,
        clock: Arc<ElapsedRealtimeClock>,
        scopes: Arc<dyn ScopeProvider<S>>,
    ) -> Arc<Self> {
        let (outbound, outbound_rx) = OutboundQueue::new(config.outbound_capacity);
        let (shutdown, _) = watch::channel(false);

        Arc::new(RealtimeChannel {
            config,
            identity,
            signer,
            clock,
            scopes,
            scope_cache: Mutex::new(HashMap::new()),
            listeners: ListenerRegistry::new(),
            lifecycle: LifecycleHandlers::default(),
            voice: Arc::new(VoiceSessionSet::new()),
            outbound,
            outbound_rx: Mutex::new(Some(outbound_rx)),
            state: RwLock::new(ChannelState::Disconnected),
            shutdown,
            task: Mutex::new(None),
        })
    }

    pub fn state(&self) -> ChannelState {
        *self.state.read()
    }

    pub fn identity(&self) -> &RealtimeIdentity {
        &self.identity
    }

    pub fn voice_sessions(&self) -> &VoiceSessionSet {
        &self.voice
    }

    /// Spawns the connection task. Calling it again has no effect.
    pub fn start(self: &Arc<Self>) {
        let Some(outbound_rx) = self.outbound_rx.lock().take() else {
            return;
        };
        let shutdown_rx = self.shutdown.subscribe();
        let handle = tokio::spawn(self.clone().run(outbound_rx, shutdown_rx));
        *self.task.lock() = Some(handle);
    }

    /// Closes the socket and stops the connection task and keep-alives.
    pub async fn close(&self) {
        self.set_state(ChannelState::Closed);
        self.voice.clear();
        let _ = self.shutdown.send(true);

        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    // === Listeners ===

    /// Registers an async callback for `topic`.
    pub fn on<F, Fut>(&self, topic: Topic, f: F)
    where
        F: Fn(S, Arc<InboundFrame>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.listeners.register(&[topic], event_callback(f));
    }

    /// Registers one callback under several topics.
    pub fn on_many(&self, topics: &[Topic], callback: EventCallback<S>) {
        self.listeners.register(topics, callback);
    }

    /// Fires when a chat message is `prefix` alone or `prefix` plus arguments.
    pub fn command<F, Fut>(&self, prefix: &str, f: F)
    where
        F: Fn(S, CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let prefix = prefix.to_string();
        let f = Arc::new(f);
        self.on(Topic::Message, move |scope, frame| {
            let context = CommandContext::matching(&frame, &prefix);
            let f = f.clone();
            async move {
                if let Some(context) = context {
                    f(scope, context).await;
                }
            }
        });
    }

    /// Like [`command`](Self::command), also passing the parsed arguments.
    pub fn command_args<F, Fut>(&self, prefix: &str, f: F)
    where
        F: Fn(S, CommandContext, Vec<CommandArg>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let prefix = prefix.to_string();
        let f = Arc::new(f);
        self.on(Topic::Message, move |scope, frame| {
            let matched = CommandContext::matching(&frame, &prefix).map(|context| {
                let args = context.args(&prefix);
                (context, args)
            });
            let f = f.clone();
            async move {
                if let Some((context, args)) = matched {
                    f(scope, context, args).await;
                }
            }
        });
    }

    pub fn on_open(&self, f: impl Fn() + Send + Sync + 'static) {
        self.lifecycle.on_open(f);
    }

    pub fn on_error(&self, f: impl Fn(&NetworkError) + Send + Sync + 'static) {
        self.lifecycle.on_error(f);
    }

    pub fn on_close(&self, f: impl Fn(Option<u16>) + Send + Sync + 'static) {
        self.lifecycle.on_close(f);
    }

    // === Inbound ===

    /// Parses, classifies and dispatches one text frame.
    pub fn handle_text(&self, text: &str) {
        match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => self.dispatch(frame),
            Err(e) => warn!(error = %e, "Dropping undecodable frame"),
        }
    }

    /// Runs every callback registered for the frame's topic on its own task.
    pub fn dispatch(&self, frame: InboundFrame) {
        let Some(topic) = classify(&frame) else {
            debug!(t = frame.t, "Dropping frame with unknown tag");
            return;
        };
        info!(topic = topic.as_str(), t = frame.t, "Received frame");

        let callbacks = self.listeners.callbacks(topic);
        if callbacks.is_empty() {
            return;
        }

        let scope = self.scope_for(frame.ndc_id().unwrap_or_default());
        let frame = Arc::new(frame);
        for callback in callbacks {
            tokio::spawn(callback(scope.clone(), frame.clone()));
        }
    }

    fn scope_for(&self, ndc_id: i64) -> S {
        self.scope_cache
            .lock()
            .entry(ndc_id)
            .or_insert_with(|| self.scopes.scope(ndc_id))
            .clone()
    }

    // === Outbound ===

    /// Queues a frame. Frames queued while reconnecting are sent on the next socket.
    pub fn send(&self, frame: &OutboundFrame) -> Result<(), NetworkError> {
        if self.state() == ChannelState::Closed {
            return Err(NetworkError::ChannelClosed);
        }
        self.outbound.push(frame)
    }

    pub async fn join_voice_thread(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::join_voice(ndc_id, thread_id, id))
    }

    pub async fn join_video_thread(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::join_video(ndc_id, thread_id, id))
    }

    pub async fn join_video_thread_as_viewer(
        &self,
        ndc_id: i64,
        thread_id: &str,
    ) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::join_as_viewer(ndc_id, thread_id, id))
    }

    /// Joins and opens a voice channel, then keeps it alive until ended.
    pub async fn start_voice_chat(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::join_voice(ndc_id, thread_id, id))?;
        self.send(&frame::open_voice_channel(ndc_id, thread_id, id))?;

        if let Some(epoch) = self.voice.insert(thread_id) {
            spawn_keep_alive(
                self.voice.clone(),
                self.outbound.clone(),
                self.clock.clone(),
                ndc_id,
                thread_id.to_string(),
                epoch,
                self.config.keepalive_interval(),
            );
        }
        Ok(())
    }

    /// Leaves a voice channel. Its keep-alive stops on the next tick, even if
    /// the thread is started again before then.
    pub async fn end_voice_chat(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        self.voice.remove(thread_id);
        let id = self.clock.now().await?;
        self.send(&frame::leave_voice(ndc_id, thread_id, id))
    }

    pub async fn send_typing(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::typing(ndc_id, thread_id, id))
    }

    pub async fn send_recording(&self, ndc_id: i64, thread_id: &str) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::recording(ndc_id, thread_id, id))
    }

    pub async fn send_end_recording(
        &self,
        ndc_id: i64,
        thread_id: &str,
        duration: u64,
    ) -> Result<(), NetworkError> {
        let id = self.clock.now().await?;
        self.send(&frame::end_recording(ndc_id, thread_id, duration, id))
    }

    // === Connection task ===

    fn set_state(&self, state: ChannelState) {
        let mut current = self.state.write();
        if *current != ChannelState::Closed {
            *current = state;
        }
    }

    async fn connect(&self) -> Result<Socket, NetworkError> {
        let request = handshake_request(
            &self.config.ws_url,
            &self.identity,
            &self.signer,
            unix_millis(),
        )?;

        match timeout(
            self.config.connect_timeout(),
            tokio_tungstenite::connect_async(request),
        )
        .await
        {
            Ok(Ok((socket, _))) => Ok(socket),
            Ok(Err(e)) => Err(NetworkError::WebSocket(e.to_string())),
            Err(_) => Err(NetworkError::Timeout),
        }
    }

    async fn run(
        self: Arc<Self>,
        mut outbound: mpsc::Receiver<String>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut first = true;

        loop {
            if *shutdown.borrow() {
                return;
            }
            self.set_state(if first {
                ChannelState::Connecting
            } else {
                ChannelState::Reconnecting
            });
            first = false;

            let rotate_at = Instant::now() + self.config.reconnect_interval();

            let socket = match self.connect().await {
                Ok(socket) => socket,
                Err(e) => {
                    warn!(url = %self.config.ws_url, error = %e, "Realtime connection failed");
                    self.lifecycle.emit_error(&e);
                    tokio::select! {
                        _ = shutdown.changed() => return,
                        _ = sleep_until(rotate_at) => continue,
                    }
                }
            };

            self.set_state(ChannelState::Open);
            info!(url = %self.config.ws_url, "Realtime socket opened");
            self.lifecycle.emit_open();

            let (mut sink, mut stream) = socket.split();
            let mut readable = true;

            loop {
                tokio::select! {
                    _ = shutdown.changed() => {
                        let _ = sink.close().await;
                        info!("Realtime socket closed");
                        self.lifecycle.emit_close(None);
                        return;
                    }
                    _ = sleep_until(rotate_at) => {
                        let _ = sink.close().await;
                        info!("Rotating realtime socket");
                        if readable {
                            self.lifecycle.emit_close(None);
                        }
                        break;
                    }
                    Some(text) = outbound.recv() => {
                        debug!(bytes = text.len(), "Sending frame");
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            let err = NetworkError::WebSocket(e.to_string());
                            warn!(error = %err, "Realtime send failed");
                            self.lifecycle.emit_error(&err);
                        }
                    }
                    message = stream.next(), if readable => match message {
                        Some(Ok(Message::Text(text))) => self.handle_text(&text),
                        Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                            Ok(text) => self.handle_text(&text),
                            Err(_) => debug!("Dropping non-UTF-8 binary frame"),
                        },
                        Some(Ok(Message::Close(close))) => {
                            readable = false;
                            let code = close.map(|c| u16::from(c.code));
                            info!(code = ?code, "Realtime socket closed by peer");
                            self.lifecycle.emit_close(code);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            readable = false;
                            let err = NetworkError::WebSocket(e.to_string());
                            warn!(error = %err, "Realtime socket error");
                            self.lifecycle.emit_error(&err);
                        }
                        None => {
                            readable = false;
                            self.lifecycle.emit_close(None);
                        }
                    },
                }
            }
        }
    }
}
