// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the client façade.

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::CryptoError;
use crate::network::{ApiError, NetworkError};
use crate::oracle::OracleError;
use crate::storage::CacheError;

/// Unified error type for client operations.
#[derive(Error, Debug)]
pub enum DorksError {
    /// The backend rejected the request with a non-zero status code.
    #[error("API error: {0}")]
    Api(ApiError),

    /// The request could not be delivered or decoded.
    #[error("network error: {0}")]
    Network(NetworkError),

    /// Credential derivation or session decoding failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The signing service failed outside of a transport call.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// The session cache could not be read or written.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operation needs a logged-in session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The operation needs a community context. Use `as_community`.
    #[error("community context required")]
    MissingCommunity,

    /// A resolved link does not belong to a community.
    #[error("link does not point at a community")]
    NotACommunityLink,

    /// A path template placeholder had no value.
    #[error("missing path parameter: {0}")]
    MissingParameter(String),
}

impl From<NetworkError> for DorksError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Api(e) => DorksError::Api(e),
            NetworkError::Crypto(e) => DorksError::Crypto(e),
            other => DorksError::Network(other),
        }
    }
}

impl From<ApiError> for DorksError {
    fn from(err: ApiError) -> Self {
        DorksError::Api(err)
    }
}

impl DorksError {
    /// Returns the backend error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            DorksError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True for backend errors that end the session.
    pub fn is_auth_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_auth_error)
    }
}

/// Result type for client operations.
pub type DorksResult<T> = Result<T, DorksError>;
