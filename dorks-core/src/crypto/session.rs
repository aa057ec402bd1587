// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session token decoding.
//!
//! A session token is url-safe base64 of `version (1 byte) || JSON || signature (20 bytes)`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

use super::CryptoError;

const HEADER_LEN: usize = 1;
const TRAILER_LEN: usize = 20;

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionData {
    #[serde(rename = "0")]
    pub status: u64,
    #[serde(rename = "2")]
    pub user_id: String,
    #[serde(rename = "4")]
    pub ip_address: String,
    #[serde(rename = "5")]
    pub timestamp: u64,
    #[serde(rename = "7")]
    pub hash: String,
}

/// Decodes the claims embedded in a session token.
pub fn decode_session(session_id: &str) -> Result<SessionData, CryptoError> {
    let raw = URL_SAFE_NO_PAD
        .decode(session_id.trim_end_matches('='))
        .map_err(|e| CryptoError::InvalidSession(e.to_string()))?;

    if raw.len() <= HEADER_LEN + TRAILER_LEN {
        return Err(CryptoError::InvalidSession("token too short".into()));
    }

    let claims = &raw[HEADER_LEN..raw.len() - TRAILER_LEN];
    let data: SessionData = serde_json::from_slice(claims)
        .map_err(|e| CryptoError::InvalidSession(e.to_string()))?;

    if data.user_id.len() < 36 {
        return Err(CryptoError::InvalidSession("user id too short".into()));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_token(claims: &str) -> String {
        let mut raw = vec![0x02];
        raw.extend_from_slice(claims.as_bytes());
        raw.extend_from_slice(&[0xFF; TRAILER_LEN]);
        URL_SAFE_NO_PAD.encode(raw)
    }

    #[test]
    fn test_decode_session_claims() {
        let token = encode_token(
            r#"{"0":2,"2":"3f6b2c1a-9d7e-4c55-8a3b-1e2f3a4b5c6d","4":"127.0.0.1","5":1700000000,"7":"abc"}"#,
        );

        let data = decode_session(&token).unwrap();
        assert_eq!(data.user_id, "3f6b2c1a-9d7e-4c55-8a3b-1e2f3a4b5c6d");
        assert_eq!(data.ip_address, "127.0.0.1");
        assert_eq!(data.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_decode_session_accepts_padding() {
        let token = encode_token(
            r#"{"0":2,"2":"3f6b2c1a-9d7e-4c55-8a3b-1e2f3a4b5c6d","4":"127.0.0.1","5":1,"7":"h"}"#,
        );
        let padded = format!("{}==", token);
        assert!(decode_session(&padded).is_ok());
    }

    #[test]
    fn test_decode_session_rejects_garbage() {
        assert!(decode_session("not a token!").is_err());
        assert!(decode_session("AAAA").is_err());
        assert!(decode_session(&encode_token("{}")).is_err());
    }
}
