// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Login Command
//!
//! Logs in and stores the session in the cache file.

use anyhow::Result;

use crate::config::CliConfig;
use crate::display;

pub async fn run(config: &CliConfig) -> Result<()> {
    let client = super::connect(config).await?;

    let Some(session) = client.session() else {
        anyhow::bail!("login returned without a session");
    };

    display::success(&format!(
        "Logged in as {}",
        session.user.nickname.as_deref().unwrap_or(&session.user.uid)
    ));
    println!();
    println!("  Device ID: {}", session.device_id);
    println!("  Cache:     {:?}", config.cache_path());

    Ok(())
}
