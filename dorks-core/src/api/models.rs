// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Response payloads.
//!
//! Only the fields the client relies on are typed; everything else is kept
//! in `extra` so no data is lost.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile, global or per community.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndc_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amino_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub sid: String,
    pub user_profile: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub account: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_profile: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(default)]
    pub total_coins: i64,
    #[serde(default)]
    pub total_coins_float: f64,
    #[serde(default)]
    pub ads_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletResponse {
    pub wallet: Wallet,
}

/// Chat thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub thread_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "type")]
    pub thread_type: i64,
    #[serde(default)]
    pub members_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndc_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadResponse {
    pub thread: Thread,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListResponse {
    #[serde(default)]
    pub thread_list: Vec<Thread>,
}

/// Chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "type")]
    pub message_type: i64,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page of messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    #[serde(default)]
    pub message_list: Vec<ChatMessage>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub prev_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub ndc_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub members_count: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityListResponse {
    #[serde(default)]
    pub community_list: Vec<Community>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    pub media_value: String,
}

/// Resolved share link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LinkInfo {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub extensions: Map<String, Value>,
}

impl LinkInfo {
    /// Object the link points at, if the backend described one.
    pub fn link_info(&self) -> Option<&Value> {
        self.extensions.get("linkInfo")
    }

    /// Community the link belongs to, if any.
    pub fn community(&self) -> Option<&Value> {
        self.extensions.get("community")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResolutionResponse {
    pub link_info_v2: LinkInfo,
}
