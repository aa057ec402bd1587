// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types

use thiserror::Error;

use super::api_error::ApiError;
use crate::crypto::CryptoError;
use crate::oracle::OracleError;

/// Network layer errors.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Failed to reach the remote host.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Proxy descriptor could not be parsed or installed.
    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    /// Header name or value rejected by the HTTP stack.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Signing service failed.
    #[error("Signature oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Local signing failed.
    #[error("Signing error: {0}")]
    Crypto(#[from] CryptoError),

    /// Request body could not be serialized.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Response body was not a valid envelope.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The backend answered with a non-zero status code.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Realtime socket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Realtime channel is closed.
    #[error("Channel closed")]
    ChannelClosed,
}

impl NetworkError {
    /// Returns true for faults that proxy rotation may recover from.
    pub fn is_transport_fault(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed(_) | NetworkError::Timeout => true,
            NetworkError::Http(e) => !e.is_builder() && !e.is_decode(),
            NetworkError::Oracle(_) => true,
            _ => false,
        }
    }

    /// Returns the backend error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            NetworkError::Api(e) => Some(e),
            _ => None,
        }
    }
}
