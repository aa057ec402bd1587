// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Header names and the base header set presented on every request.

use std::collections::BTreeMap;

pub const NDC_DEVICE_ID: &str = "NDCDEVICEID";
pub const NDC_AUTH: &str = "NDCAUTH";
pub const AUID: &str = "AUID";
pub const NDC_LANG: &str = "NDCLANG";
/// Local body HMAC.
pub const NDC_MSG_SIG: &str = "NDC-MSG-SIG";
/// Remote ECDSA signature.
pub const NDC_MESSAGE_SIGNATURE: &str = "NDC-MESSAGE-SIGNATURE";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const USER_AGENT: &str = "User-Agent";

pub const USER_AGENT_VALUE: &str = "Dalvik/2.1.0 (Linux; U; Android 10; M2006C3MNG Build/QP1A.190711.020;com.narvii.amino.master/4.3.3121)";
pub const ACCEPT_LANGUAGE_VALUE: &str = "ru-RU";
pub const NDC_LANG_VALUE: &str = "ru";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf8";
pub const URL_ENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered header map. Names keep their wire casing.
pub type HeaderMap = BTreeMap<String, String>;

/// Headers every request starts from.
pub fn base_headers(device_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE.into(), ACCEPT_LANGUAGE_VALUE.into());
    headers.insert(USER_AGENT.into(), USER_AGENT_VALUE.into());
    headers.insert(NDC_LANG.into(), NDC_LANG_VALUE.into());
    headers.insert(CONTENT_TYPE.into(), JSON_CONTENT_TYPE.into());
    headers.insert(NDC_DEVICE_ID.into(), device_id.into());
    headers
}

/// Formats a session id for the `NDCAUTH` header.
pub fn auth_value(session_id: &str) -> String {
    format!("sid={}", session_id)
}
