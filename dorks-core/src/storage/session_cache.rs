// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded LRU session cache with optional JSON file persistence.
//!
//! The file is rewritten atomically (temp file, then rename) after every
//! mutation, so a crash leaves either the old map or the new one.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use ring::digest::{digest, SHA256};
use tracing::{debug, info, warn};

use super::{CacheError, CachedSession, SessionCache};

/// Default entry limit.
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Cache key for an email login. The password never reaches the cache file.
pub fn cache_key(email: &str, password: &str) -> String {
    let material = format!("{}-{}", email, password);
    hex::encode(digest(&SHA256, material.as_bytes()))
}

struct Entry {
    session: CachedSession,
    stored_at: Instant,
    last_used: u64,
}

struct Inner {
    entries: HashMap<String, Entry>,
    tick: u64,
}

impl Inner {
    fn touch(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// LRU cache bounded by size and, optionally, entry age.
pub struct FileSessionCache {
    inner: Mutex<Inner>,
    max_size: usize,
    max_age: Option<Duration>,
    path: Option<PathBuf>,
}

impl FileSessionCache {
    /// Creates a cache that lives only in memory.
    pub fn in_memory(max_size: usize, max_age: Option<Duration>) -> Self {
        FileSessionCache {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            max_size: max_size.max(1),
            max_age,
            path: None,
        }
    }

    /// Opens a cache mirrored to `path`, loading any entries already there.
    ///
    /// Loaded entries start aging from the moment they are read. A file
    /// holding more than `max_size` entries is rewritten after trimming.
    pub fn open(
        path: impl Into<PathBuf>,
        max_size: usize,
        max_age: Option<Duration>,
    ) -> Result<Self, CacheError> {
        let path = path.into();
        let cache = FileSessionCache {
            path: Some(path.clone()),
            ..Self::in_memory(max_size, max_age)
        };

        if path.exists() {
            let data = fs::read_to_string(&path)?;
            let stored: BTreeMap<String, CachedSession> = if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            };
            info!(path = %path.display(), entries = stored.len(), "Loaded session cache");

            let mut inner = cache.inner.lock();
            for (key, session) in stored {
                let last_used = inner.touch();
                inner.entries.insert(
                    key,
                    Entry {
                        session,
                        stored_at: Instant::now(),
                        last_used,
                    },
                );
            }
            if cache.evict_overflow(&mut inner) {
                cache.persist(&inner)?;
            }
        }

        Ok(cache)
    }

    /// Number of live entries. Expired entries are dropped first.
    pub fn len(&self) -> usize {
        let mut inner = self.inner.lock();
        if self.prune_expired(&mut inner) {
            if let Err(e) = self.persist(&inner) {
                warn!(error = %e, "Failed to save session cache after pruning");
            }
        }
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.max_age
            .is_some_and(|max_age| entry.stored_at.elapsed() > max_age)
    }

    /// Returns true if anything was removed.
    fn prune_expired(&self, inner: &mut Inner) -> bool {
        let before = inner.entries.len();
        inner.entries.retain(|key, entry| {
            let expired = self.is_expired(entry);
            if expired {
                info!(key = %key, "Session cache entry expired");
            }
            !expired
        });
        inner.entries.len() != before
    }

    /// Returns true if anything was evicted.
    fn evict_overflow(&self, inner: &mut Inner) -> bool {
        let mut evicted = false;
        while inner.entries.len() > self.max_size {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    inner.entries.remove(&key);
                    info!(key = %key, "Session cache eviction");
                    evicted = true;
                }
                None => break,
            }
        }
        evicted
    }

    fn persist(&self, inner: &Inner) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let snapshot: BTreeMap<&str, &CachedSession> = inner
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &entry.session))
            .collect();
        let data = serde_json::to_string_pretty(&snapshot)?;
        atomic_write(path, data.as_bytes())?;
        debug!(path = %path.display(), entries = snapshot.len(), "Saved session cache");
        Ok(())
    }
}

impl SessionCache for FileSessionCache {
    fn get(&self, key: &str) -> Result<Option<CachedSession>, CacheError> {
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(key) {
            Some(entry) => self.is_expired(entry),
            None => return Ok(None),
        };
        if expired {
            inner.entries.remove(key);
            info!(key = %key, "Session cache entry expired");
            self.persist(&inner)?;
            return Ok(None);
        }

        let last_used = inner.touch();
        Ok(inner.entries.get_mut(key).map(|entry| {
            entry.last_used = last_used;
            entry.session.clone()
        }))
    }

    fn set(&self, key: &str, session: CachedSession) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        self.prune_expired(&mut inner);
        let last_used = inner.touch();
        inner.entries.insert(
            key.to_string(),
            Entry {
                session,
                stored_at: Instant::now(),
                last_used,
            },
        );
        self.evict_overflow(&mut inner);
        self.persist(&inner)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        if inner.entries.remove(key).is_some() {
            self.persist(&inner)?;
        }
        Ok(())
    }
}

/// Atomic file write (write to temp, then rename)
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_key_hides_password() {
        let key = cache_key("a@b.c", "hunter2");
        assert_eq!(key.len(), 64);
        assert!(!key.contains("hunter2"));
        assert_eq!(key, cache_key("a@b.c", "hunter2"));
        assert_ne!(key, cache_key("a@b.c", "hunter3"));
    }

    #[test]
    fn test_atomic_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");

        atomic_write(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }
}
