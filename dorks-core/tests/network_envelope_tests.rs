// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for network::envelope and network::api_error

use serde::Deserialize;
use serde_json::json;

use dorks_core::network::*;

#[derive(Debug, Deserialize)]
struct Wallet {
    #[serde(rename = "totalCoins")]
    total_coins: f64,
}

#[derive(Debug, Deserialize)]
struct WalletResponse {
    wallet: Wallet,
}

#[test]
fn test_decode_success_payload() {
    let body = br#"{"api:statuscode":0,"api:message":"OK","wallet":{"totalCoins":12.5}}"#;
    let response: WalletResponse = decode(body).unwrap();
    assert_eq!(response.wallet.total_coins, 12.5);
}

#[test]
fn test_envelope_metadata() {
    let envelope: ResponseEnvelope = decode(
        br#"{"api:statuscode":0,"api:duration":"0.012s","api:timestamp":"2026-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    assert_eq!(envelope.status_code, 0);
    assert_eq!(envelope.duration.as_deref(), Some("0.012s"));
}

#[test]
fn test_nonzero_status_is_api_error() {
    let err = decode::<ResponseEnvelope>(br#"{"api:statuscode":200,"api:message":"x"}"#)
        .unwrap_err();

    let api = err.api_error().unwrap();
    assert_eq!(api.code(), 200);
    assert!(api.is_known());
    assert!(!err.is_transport_fault());
}

#[test]
fn test_status_checked_before_payload() {
    // Payload shape is irrelevant once the status is non-zero
    let err = decode::<WalletResponse>(br#"{"api:statuscode":105}"#).unwrap_err();
    assert_eq!(err.api_error().map(ApiError::code), Some(105));
}

#[test]
fn test_missing_status_is_malformed() {
    assert!(matches!(
        decode::<ResponseEnvelope>(br#"{"wallet":{}}"#),
        Err(NetworkError::MalformedResponse(_))
    ));
}

#[test]
fn test_not_json_is_malformed() {
    assert!(matches!(
        decode::<ResponseEnvelope>(b"<html>502 Bad Gateway</html>"),
        Err(NetworkError::MalformedResponse(_))
    ));
}

#[test]
fn test_lossy_fallback_accepts_bom() {
    let mut body = "\u{feff}".as_bytes().to_vec();
    body.extend_from_slice(br#"{"api:statuscode":0}"#);
    let value = parse_body(&body).unwrap();
    assert_eq!(value["api:statuscode"], 0);
}

#[test]
fn test_validate_parsed_value() {
    assert!(validate(&json!({"api:statuscode": 0})).is_ok());
    assert!(validate(&json!({"api:statuscode": 106})).is_err());
}

// ============================================================
// Error table
// ============================================================

#[test]
fn test_unknown_code_keeps_number() {
    let err = ApiError::from_code(987_654);
    assert_eq!(err.code(), 987_654);
    assert!(!err.is_known());
    assert!(err.to_string().contains("987654"));
}

#[test]
fn test_known_codes_have_names_and_messages() {
    for code in [100, 103, 104, 105, 106, 110, 200, 213, 219, 270, 1600] {
        let err = ApiError::from_code(code);
        assert!(err.is_known(), "code {} missing from table", code);
        assert!(!err.name().is_empty());
        assert!(!err.message().is_empty());
    }
}

#[test]
fn test_auth_codes() {
    assert!(ApiError::from_code(105).is_auth_error());
    assert!(ApiError::from_code(200).is_auth_error());
    assert!(!ApiError::from_code(106).is_auth_error());
}
