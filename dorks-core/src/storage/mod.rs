// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Storage
//!
//! Key to session records that let a login skip the credential exchange.
//! The only backend is [`FileSessionCache`]: a bounded in-memory LRU that can
//! mirror itself to a JSON file.

mod error;
mod session_cache;

use serde::{Deserialize, Serialize};

use crate::api::User;

pub use error::CacheError;
pub use session_cache::{cache_key, FileSessionCache, DEFAULT_MAX_SIZE};

/// An authenticated session as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSession {
    pub session_id: String,
    pub device_id: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Backend for cached sessions.
pub trait SessionCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CachedSession>, CacheError>;

    fn set(&self, key: &str, session: CachedSession) -> Result<(), CacheError>;

    /// Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}
