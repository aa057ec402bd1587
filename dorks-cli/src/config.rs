// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI Configuration

use std::path::PathBuf;

use anyhow::Result;
use dorks_core::config::parse_proxies;
use dorks_core::ClientConfig;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_key: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub proxies: Option<String>,
    pub data_dir: PathBuf,
    pub ws_url: Option<String>,
}

impl CliConfig {
    /// Session cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("sessions.json")
    }

    /// Builds the library configuration, starting from the `DORKS_*` environment.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_lookup(|name| match name {
            "DORKS_API_KEY" => Some(self.api_key.clone()),
            _ => std::env::var(name).ok(),
        })?;

        if let Some(list) = &self.proxies {
            config = config.with_proxies(parse_proxies(list)?);
        }
        if let Some(ws_url) = &self.ws_url {
            config.realtime.ws_url = ws_url.clone();
        }
        if config.cache.path.is_none() {
            config = config.with_cache_path(self.cache_path());
        }

        Ok(config)
    }
}
