// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client configuration.
//!
//! Built with `Default` plus `with_*` methods, or loaded from `DORKS_*`
//! environment variables by [`ClientConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::network::{ProxyConfig, TransportConfig};
use crate::realtime::RealtimeConfig;
use crate::storage::DEFAULT_MAX_SIZE;

/// Default signing service URL.
pub const DEFAULT_ORACLE_URL: &str = "https://qfhmflnp-3000.euw.devtunnels.ms";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("invalid proxy {0}")]
    InvalidProxy(String),
}

/// Session cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Caching is skipped entirely when false
    pub enabled: bool,

    /// JSON file mirroring the cache, memory only when `None`
    pub path: Option<PathBuf>,

    /// Maximum number of cached sessions
    pub max_size: usize,

    /// Entries older than this are dropped on read
    pub max_age: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            path: None,
            max_size: DEFAULT_MAX_SIZE,
            max_age: None,
        }
    }
}

/// Configuration for a [`Client`](crate::api::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Key presented to the signing service
    pub api_key: String,

    /// Fixed device identifier, derived fresh when `None`
    pub device_id: Option<String>,

    /// Signing service base URL
    pub oracle_url: String,

    /// Signing service request timeout
    pub oracle_timeout: Duration,

    pub transport: TransportConfig,

    pub realtime: RealtimeConfig,

    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_key: String::new(),
            device_id: None,
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            oracle_timeout: Duration::from_secs(30),
            transport: TransportConfig::default(),
            realtime: RealtimeConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_proxies(mut self, proxies: Vec<ProxyConfig>) -> Self {
        self.transport = self.transport.with_proxies(proxies);
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.transport = self.transport.with_base_url(base_url);
        self
    }

    pub fn with_oracle_url(mut self, oracle_url: impl Into<String>) -> Self {
        self.oracle_url = oracle_url.into();
        self
    }

    pub fn with_realtime(mut self, realtime: RealtimeConfig) -> Self {
        self.realtime = realtime;
        self
    }

    /// Persist the session cache to `path`.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.path = Some(path.into());
        self
    }

    /// Disable the session cache.
    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("DORKS_API_KEY").ok_or(ConfigError::Missing("DORKS_API_KEY"))?;
        let mut config = ClientConfig::new(api_key.trim());

        if let Some(device_id) = var("DORKS_DEVICE_ID") {
            config.device_id = Some(device_id.trim().to_string());
        }
        if let Some(list) = var("DORKS_PROXIES") {
            config = config.with_proxies(parse_proxies(&list)?);
        }
        if let Some(base_url) = var("DORKS_BASE_URL") {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(oracle_url) = var("DORKS_ORACLE_URL") {
            config.oracle_url = oracle_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ws_url) = var("DORKS_WS_URL") {
            config.realtime.ws_url = ws_url.trim().to_string();
        }
        if let Some(path) = var("DORKS_CACHE_PATH") {
            config.cache.path = Some(PathBuf::from(path.trim()));
        }
        if let Some(size) = var("DORKS_CACHE_MAX_SIZE") {
            config.cache.max_size = parse_number("DORKS_CACHE_MAX_SIZE", &size)?;
        }
        if let Some(secs) = var("DORKS_CACHE_MAX_AGE_SECS") {
            let secs: u64 = parse_number("DORKS_CACHE_MAX_AGE_SECS", &secs)?;
            config.cache.max_age = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Parses a comma or newline separated proxy list.
pub fn parse_proxies(list: &str) -> Result<Vec<ProxyConfig>, ConfigError> {
    list.split([',', '\n'])
        .map(str::trim)
        .filter(|descriptor| !descriptor.is_empty())
        .map(|descriptor| {
            ProxyConfig::parse(descriptor).map_err(|_| ConfigError::InvalidProxy(descriptor.into()))
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.oracle_url, DEFAULT_ORACLE_URL);
        assert_eq!(config.transport.base_url, "https://service.aminoapps.com");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 1000);
        assert_eq!(config.realtime.reconnect_interval_ms, 450_000);
    }

    #[test]
    fn test_from_env() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DORKS_API_KEY", "k"),
            ("DORKS_PROXIES", "socks5://10.0.0.1:1080, 10.0.0.2:1081"),
            ("DORKS_WS_URL", "ws://127.0.0.1:9000"),
            ("DORKS_CACHE_PATH", "/tmp/dorks.json"),
            ("DORKS_CACHE_MAX_SIZE", "5"),
            ("DORKS_CACHE_MAX_AGE_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.transport.proxies.len(), 2);
        assert_eq!(config.realtime.ws_url, "ws://127.0.0.1:9000");
        assert_eq!(config.cache.path, Some(PathBuf::from("/tmp/dorks.json")));
        assert_eq!(config.cache.max_size, 5);
        assert_eq!(config.cache.max_age, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_from_env_errors() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DORKS_API_KEY"))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[
                ("DORKS_API_KEY", "k"),
                ("DORKS_CACHE_MAX_SIZE", "lots"),
            ])),
            Err(ConfigError::InvalidValue { var: "DORKS_CACHE_MAX_SIZE", .. })
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[
                ("DORKS_API_KEY", "k"),
                ("DORKS_PROXIES", "ftp://nope:1"),
            ])),
            Err(ConfigError::InvalidProxy(_))
        ));
    }
}
