// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signed WebSocket handshake.
//!
//! The signed payload is `"{device_id}|{millis}"`. It travels URL-encoded in
//! the `signbody` query parameter and its HMAC goes in `NDC-MSG-SIG`.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};

use crate::crypto::CredentialSigner;
use crate::network::headers::{
    auth_value, ACCEPT_ENCODING, ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE, AUID, NDC_AUTH,
    NDC_DEVICE_ID, NDC_MSG_SIG, USER_AGENT, USER_AGENT_VALUE,
};
use crate::network::NetworkError;

/// Identity presented on the realtime socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeIdentity {
    pub device_id: String,
    pub session_id: String,
    pub user_id: String,
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Builds the upgrade request for `ws_url` at `millis`.
pub fn handshake_request(
    ws_url: &str,
    identity: &RealtimeIdentity,
    signer: &CredentialSigner,
    millis: u128,
) -> Result<Request, NetworkError> {
    let sign_body = format!("{}|{}", identity.device_id, millis);
    let url = format!(
        "{}/?signbody={}%7C{}",
        ws_url.trim_end_matches('/'),
        identity.device_id,
        millis
    );

    let mut request = url
        .into_client_request()
        .map_err(|e| NetworkError::WebSocket(format!("invalid handshake request: {}", e)))?;

    let headers = [
        (ACCEPT_ENCODING, "gzip".to_string()),
        (ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE.to_string()),
        (USER_AGENT, USER_AGENT_VALUE.to_string()),
        (AUID, identity.user_id.clone()),
        (NDC_AUTH, auth_value(&identity.session_id)),
        (NDC_DEVICE_ID, identity.device_id.clone()),
        (NDC_MSG_SIG, signer.sign_body(sign_body.as_bytes())),
    ];

    for (name, value) in headers {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| NetworkError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|e| NetworkError::InvalidHeader(format!("{}: {}", name, e)))?;
        request.headers_mut().insert(header, value);
    }

    Ok(request)
}
