// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signature Oracle
//!
//! Remote half of the request authentication scheme. An auxiliary service
//! turns payloads into elliptic-curve signatures, hands out the public-key
//! bundle pushed to the main service after login, and seeds the
//! elapsed-realtime clock used to correlate realtime frames.

mod clock;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use clock::ElapsedRealtimeClock;
pub use http::HttpSignatureOracle;

/// Errors returned by the signature oracle.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The request could not be completed.
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The oracle answered with a non-success HTTP status.
    #[error("oracle returned HTTP {0}")]
    Status(u16),

    /// The oracle answered with an unexpected body.
    #[error("invalid oracle response: {0}")]
    InvalidResponse(String),

    /// The elapsed-realtime base was not an integer.
    #[error("invalid elapsed realtime value: {0}")]
    InvalidClock(String),
}

/// Client of the auxiliary signing service.
///
/// Implementations must be callable concurrently; no call is retried here.
#[async_trait]
pub trait SignatureOracle: Send + Sync {
    /// Signs `payload`, which must be the exact string that is also signed locally.
    async fn request_remote_signature(
        &self,
        payload: &str,
        user_id: Option<&str>,
    ) -> Result<String, OracleError>;

    /// Fetches the public-key bundle pushed to the main service for `user_id`.
    async fn fetch_public_key_material(
        &self,
        user_id: &str,
    ) -> Result<serde_json::Value, OracleError>;

    /// Fetches the oracle's current elapsed-realtime counter.
    async fn fetch_elapsed_base(&self) -> Result<String, OracleError>;
}

/// Body of a remote signature request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest<'a> {
    pub payload: &'a str,
    pub user_id: Option<&'a str>,
}

/// Remote signature response.
#[derive(Debug, Deserialize)]
pub struct SignatureResponse {
    #[serde(rename = "ECDSA")]
    pub ecdsa: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Public-key bundle response.
#[derive(Debug, Deserialize)]
pub struct CredentialsResponse {
    pub credentials: serde_json::Value,
}

/// Elapsed-realtime response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElapsedResponse {
    pub elapsed_realtime: String,
    #[serde(default)]
    pub message: Option<String>,
}
