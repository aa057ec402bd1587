// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Realtime Channel
//!
//! A single long-lived WebSocket per authenticated identity.
//!
//! # Architecture
//!
//! - **Handshake**: signed upgrade request
//! - **Topics**: inbound `{t, o}` frames classified into named topics
//! - **Listeners**: topic callbacks and command listeners, kept across reconnects
//! - **Frames**: outbound builders and a socket-independent queue
//! - **Voice**: per-thread keep-alive loops
//!
//! # Example
//!
//! ```ignore
//! use dorks_core::realtime::Topic;
//!
//! let channel = client.realtime()?;
//! channel.command("!ping", |scope, ctx| async move {
//!     let _ = scope.send_message(ctx.thread_id.as_deref().unwrap_or_default(), "pong").await;
//! });
//! channel.start();
//! ```

mod channel;
mod command;
pub mod frame;
mod handshake;
mod listeners;
mod topic;
mod voice;

use std::time::Duration;

pub use channel::{ChannelState, RealtimeChannel, ScopeProvider};
pub use command::{CommandArg, CommandContext};
pub use frame::{InboundFrame, OutboundFrame, OutboundQueue};
pub use handshake::{handshake_request, unix_millis, RealtimeIdentity};
pub use listeners::{event_callback, EventCallback, LifecycleHandlers, ListenerRegistry};
pub use topic::{classify, Topic};
pub use voice::{spawn_keep_alive, VoiceSessionSet};

/// Default realtime endpoint.
pub const DEFAULT_WS_URL: &str = "wss://ws1.aminoapps.com";

/// Realtime channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// WebSocket base URL
    pub ws_url: String,

    /// Period after which the socket is closed and re-established
    pub reconnect_interval_ms: u64,

    /// Period between voice keep-alive frames
    pub keepalive_interval_ms: u64,

    /// Upgrade handshake timeout
    pub connect_timeout_ms: u64,

    /// Outbound frames held while the socket is down
    pub outbound_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        RealtimeConfig {
            ws_url: DEFAULT_WS_URL.to_string(),
            reconnect_interval_ms: 450_000,
            keepalive_interval_ms: 60_000,
            connect_timeout_ms: 10_000,
            outbound_capacity: 256,
        }
    }
}

impl RealtimeConfig {
    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_millis(self.keepalive_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
