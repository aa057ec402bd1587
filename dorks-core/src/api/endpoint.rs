// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declarative endpoint descriptors.
//!
//! A descriptor names a method, a path template, where the path is rooted
//! and how the body is signed. Templates use `{name}` placeholders: `{uid}`
//! comes from the session, `{ndc}` from the community context, everything
//! else from call parameters.

use crate::network::{Method, Signing};

use super::error::{DorksError, DorksResult};

/// Root a path template is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Absolute path, used as written.
    Global,
    /// Under `/x{ndc}/s`. Requires a community context.
    Community,
    /// Under `/x{ndc}/s` with a community context, `/g/s` without one.
    Contextual,
}

/// One backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub scope: Scope,
    pub signing: Signing,
}

impl Endpoint {
    pub const fn get(path: &'static str, scope: Scope) -> Self {
        Endpoint {
            method: Method::Get,
            path,
            scope,
            signing: Signing::None,
        }
    }

    pub const fn delete(path: &'static str, scope: Scope) -> Self {
        Endpoint {
            method: Method::Delete,
            path,
            scope,
            signing: Signing::None,
        }
    }

    /// Fully signed JSON POST.
    pub const fn post(path: &'static str, scope: Scope) -> Self {
        Endpoint {
            method: Method::Post,
            path,
            scope,
            signing: Signing::Full,
        }
    }

    /// Locally signed POST. Without a body it is sent url-encoded.
    pub const fn post_early(path: &'static str, scope: Scope) -> Self {
        Endpoint {
            method: Method::Post,
            path,
            scope,
            signing: Signing::Local,
        }
    }

    /// Resolves the template into a request path.
    pub fn render(
        &self,
        ndc_id: Option<i64>,
        uid: Option<&str>,
        params: &[(&str, &str)],
    ) -> DorksResult<String> {
        let prefix = match (self.scope, ndc_id) {
            (Scope::Global, _) => String::new(),
            (Scope::Community, None) => return Err(DorksError::MissingCommunity),
            (Scope::Community | Scope::Contextual, Some(ndc)) => format!("/x{}/s", ndc),
            (Scope::Contextual, None) => "/g/s".to_string(),
        };

        let mut path = String::with_capacity(prefix.len() + self.path.len());
        path.push_str(&prefix);

        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            path.push_str(&rest[..start]);

            let value = match name {
                "uid" => uid.ok_or(DorksError::NotAuthenticated)?.to_string(),
                "ndc" => ndc_id.ok_or(DorksError::MissingCommunity)?.to_string(),
                _ => params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .ok_or_else(|| DorksError::MissingParameter(name.to_string()))?,
            };
            path.push_str(&value);
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        Ok(path)
    }
}

// === Authentication ===

pub const ACCOUNT: Endpoint = Endpoint::get("/g/s/account", Scope::Global);
pub const LOGIN: Endpoint = Endpoint::post_early("/g/s/auth/login", Scope::Global);
pub const PUBLIC_KEY: Endpoint = Endpoint::post("/g/s/security/public_key", Scope::Global);
pub const REQUEST_SECURITY_VALIDATION: Endpoint =
    Endpoint::post_early("/g/s/auth/request-security-validation", Scope::Global);
pub const CHECK_SECURITY_VALIDATION: Endpoint =
    Endpoint::post("/g/s/auth/check-security-validation", Scope::Global);

// === Threads ===

pub const THREAD: Endpoint = Endpoint::get("/chat/thread/{thread_id}", Scope::Community);
pub const JOINED_THREADS: Endpoint = Endpoint::get(
    "/chat/thread?type=joined-me&start={start}&size={size}",
    Scope::Community,
);
pub const JOIN_THREAD: Endpoint =
    Endpoint::post_early("/chat/thread/{thread_id}/member/{uid}", Scope::Community);
pub const LEAVE_THREAD: Endpoint =
    Endpoint::delete("/chat/thread/{thread_id}/member/{uid}", Scope::Community);
pub const SEND_MESSAGE: Endpoint =
    Endpoint::post("/chat/thread/{thread_id}/message", Scope::Community);
pub const MESSAGES: Endpoint = Endpoint::get(
    "/chat/thread/{thread_id}/message?v=2&pagingType=t&size={size}",
    Scope::Community,
);
pub const DELETE_MESSAGE: Endpoint = Endpoint::delete(
    "/chat/thread/{thread_id}/message/{message_id}",
    Scope::Community,
);
pub const TIP_THREAD: Endpoint =
    Endpoint::post("/chat/thread/{thread_id}/tipping", Scope::Community);

// === Users and communities ===

pub const USER_PROFILE: Endpoint = Endpoint::get("/user-profile/{user_id}", Scope::Contextual);
pub const JOINED_COMMUNITIES: Endpoint = Endpoint::get(
    "/g/s/community/joined?v=1&start={start}&size={size}",
    Scope::Global,
);
pub const JOIN_COMMUNITY: Endpoint = Endpoint::post("/community/join", Scope::Community);
pub const LEAVE_COMMUNITY: Endpoint = Endpoint::post_early("/community/leave", Scope::Community);

// === Wallet, media, links ===

pub const WALLET: Endpoint = Endpoint::get("/g/s/wallet", Scope::Global);
pub const MEDIA_UPLOAD: Endpoint = Endpoint::post_early("/g/s/media/upload", Scope::Global);
pub const LINK_RESOLUTION: Endpoint = Endpoint::get("/g/s/link-resolution?q={q}", Scope::Global);
