// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-style listeners over the message topic.

use serde_json::Value;

use super::frame::InboundFrame;

/// Chat message that matched a command prefix.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub ndc_id: Option<i64>,
    pub thread_id: Option<String>,
    pub content: String,
    /// Raw chat message object.
    pub message: Value,
}

impl CommandContext {
    /// Builds a context if the frame's text is `prefix` alone or `prefix`
    /// followed by whitespace.
    pub fn matching(frame: &InboundFrame, prefix: &str) -> Option<Self> {
        let content = frame.content()?;
        let rest = content.strip_prefix(prefix)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }

        Some(CommandContext {
            ndc_id: frame.ndc_id(),
            thread_id: frame.thread_id().map(str::to_string),
            content: content.to_string(),
            message: frame.chat_message().cloned().unwrap_or(Value::Null),
        })
    }

    /// Arguments following `prefix`.
    pub fn args(&self, prefix: &str) -> Vec<CommandArg> {
        self.content
            .get(prefix.len()..)
            .unwrap_or_default()
            .split_whitespace()
            .map(CommandArg::new)
            .collect()
    }
}

/// One whitespace separated command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    raw: String,
}

impl CommandArg {
    pub fn new(raw: &str) -> Self {
        CommandArg {
            raw: raw.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.raw.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.raw.parse().ok()
    }

    /// Reads `true/yes/on/1` and `false/no/off/0`, ignoring case.
    pub fn as_bool(&self) -> Option<bool> {
        match self.raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}
