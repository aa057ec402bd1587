// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Response Envelope
//!
//! Every backend response carries `api:statuscode` next to its payload fields.
//! The envelope is checked before the payload is looked at.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api_error::ApiError;
use super::error::NetworkError;

/// Status and metadata shared by all responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "api:statuscode")]
    pub status_code: i64,
    #[serde(rename = "api:duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "api:message", default)]
    pub message: Option<String>,
    #[serde(rename = "api:timestamp", default)]
    pub timestamp: Option<String>,
}

/// Parses a body as JSON, retrying through a lossy text decode.
pub fn parse_body(bytes: &[u8]) -> Result<Value, NetworkError> {
    if let Ok(value) = serde_json::from_slice(bytes) {
        return Ok(value);
    }

    let text = String::from_utf8_lossy(bytes);
    serde_json::from_str(text.trim_start_matches('\u{feff}').trim())
        .map_err(|e| NetworkError::MalformedResponse(e.to_string()))
}

/// Checks the envelope of an already parsed body.
pub fn validate(value: &Value) -> Result<ResponseEnvelope, NetworkError> {
    let envelope = ResponseEnvelope::deserialize(value)
        .map_err(|e| NetworkError::MalformedResponse(format!("envelope: {}", e)))?;

    if envelope.status_code != 0 {
        return Err(ApiError::from_code(envelope.status_code).into());
    }

    Ok(envelope)
}

/// Parses, validates and decodes a response body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, NetworkError> {
    let value = parse_body(bytes)?;
    validate(&value)?;
    serde_json::from_value(value).map_err(|e| NetworkError::MalformedResponse(e.to_string()))
}
