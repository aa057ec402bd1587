// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Threads Command

use anyhow::Result;
use dorks_core::api::DEFAULT_PAGE_SIZE;

use crate::config::CliConfig;
use crate::display;

/// Lists joined threads of a community.
pub async fn list(config: &CliConfig, ndc_id: i64) -> Result<()> {
    let client = super::connect(config).await?;
    let threads = client
        .as_community(ndc_id)
        .joined_threads(0, DEFAULT_PAGE_SIZE)
        .await?;

    if threads.is_empty() {
        display::info("No joined threads.");
        return Ok(());
    }
    for thread in &threads {
        display::display_thread(thread);
    }
    Ok(())
}

/// Sends a text message to a thread.
pub async fn send(config: &CliConfig, ndc_id: i64, thread_id: &str, text: &str) -> Result<()> {
    let client = super::connect(config).await?;
    client
        .as_community(ndc_id)
        .send_message(thread_id, text)
        .await?;

    display::success("Message sent");
    Ok(())
}
