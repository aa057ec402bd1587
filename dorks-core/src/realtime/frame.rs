// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Realtime frames.
//!
//! Inbound and outbound frames share the `{"t": <tag>, "o": {...}}` shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::network::NetworkError;

/// Tag of chat message frames.
pub const TAG_CHAT_MESSAGE: i64 = 1000;
/// Tag of notification frames.
pub const TAG_NOTIFICATION: i64 = 10;
/// Tag of tip frames.
pub const TAG_TIP: i64 = 120;

pub const TAG_JOIN: i64 = 112;
pub const TAG_CHANNEL: i64 = 108;
pub const TAG_ACTION_START: i64 = 304;
pub const TAG_ACTION_END: i64 = 306;

/// Frame received from the socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundFrame {
    pub t: i64,
    #[serde(default)]
    pub o: Value,
}

impl InboundFrame {
    /// Community the event belongs to.
    pub fn ndc_id(&self) -> Option<i64> {
        self.o
            .get("ndcId")
            .or_else(|| self.o.pointer("/payload/ndcId"))
            .and_then(Value::as_i64)
    }

    /// The embedded chat message, if any.
    pub fn chat_message(&self) -> Option<&Value> {
        self.o.get("chatMessage")
    }

    /// Media sub-type of the embedded chat message.
    pub fn message_type(&self) -> Option<i64> {
        self.chat_message()
            .and_then(|m| m.get("type"))
            .and_then(Value::as_i64)
    }

    /// Text content of the embedded chat message.
    pub fn content(&self) -> Option<&str> {
        self.chat_message()
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.chat_message()
            .and_then(|m| m.get("threadId"))
            .and_then(Value::as_str)
    }
}

/// Frame written to the socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundFrame {
    pub o: Value,
    pub t: i64,
}

/// Join a voice thread as a speaker.
pub fn join_voice(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    join(ndc_id, thread_id, 1, id)
}

/// Join a video thread as a viewer.
pub fn join_as_viewer(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    join(ndc_id, thread_id, 2, id)
}

/// Leave a voice thread.
pub fn leave_voice(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    join(ndc_id, thread_id, 2, id)
}

fn join(ndc_id: i64, thread_id: &str, join_role: u8, id: u64) -> OutboundFrame {
    OutboundFrame {
        o: json!({
            "ndcId": ndc_id,
            "threadId": thread_id,
            "joinRole": join_role,
            "id": id.to_string(),
        }),
        t: TAG_JOIN,
    }
}

/// Join a video thread as a presenter.
pub fn join_video(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    OutboundFrame {
        o: json!({
            "ndcId": ndc_id,
            "threadId": thread_id,
            "joinRole": 1,
            "channelType": 5,
            "id": id.to_string(),
        }),
        t: TAG_CHANNEL,
    }
}

/// Open the voice channel of a thread.
pub fn open_voice_channel(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    OutboundFrame {
        o: json!({
            "ndcId": ndc_id,
            "threadId": thread_id,
            "channelType": 1,
            "id": id.to_string(),
        }),
        t: TAG_CHANNEL,
    }
}

/// Typing indicator.
pub fn typing(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    action(TAG_ACTION_START, "Typing", ndc_id, thread_id, json!({ "threadType": 2 }), id)
}

/// Voice note recording indicator.
pub fn recording(ndc_id: i64, thread_id: &str, id: u64) -> OutboundFrame {
    action(TAG_ACTION_START, "Recording", ndc_id, thread_id, json!({ "threadType": 0 }), id)
}

/// End of a recording, with its duration.
pub fn end_recording(ndc_id: i64, thread_id: &str, duration: u64, id: u64) -> OutboundFrame {
    action(
        TAG_ACTION_END,
        "Recording",
        ndc_id,
        thread_id,
        json!({ "threadType": 0, "duration": duration }),
        id,
    )
}

fn action(t: i64, name: &str, ndc_id: i64, thread_id: &str, params: Value, id: u64) -> OutboundFrame {
    OutboundFrame {
        o: json!({
            "actions": [name],
            "target": format!("ndc://x{}/chat-thread/{}", ndc_id, thread_id),
            "ndcId": ndc_id,
            "params": params,
            "id": id.to_string(),
        }),
        t,
    }
}

/// Socket-independent queue of serialized outbound frames.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    tx: mpsc::Sender<String>,
}

impl OutboundQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (OutboundQueue { tx }, rx)
    }

    /// Queues a frame without waiting for the socket.
    pub fn push(&self, frame: &OutboundFrame) -> Result<(), NetworkError> {
        let text =
            serde_json::to_string(frame).map_err(|e| NetworkError::InvalidBody(e.to_string()))?;
        debug!(t = frame.t, "Queueing frame");

        self.tx.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => NetworkError::WebSocket("outbound queue full".into()),
            TrySendError::Closed(_) => NetworkError::ChannelClosed,
        })
    }
}
