// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI Commands

pub mod account;
pub mod listen;
pub mod login;
pub mod threads;

use anyhow::{Context, Result};
use dorks_core::Client;

use crate::config::CliConfig;

/// Creates a client and logs in with the configured credentials.
pub async fn connect(config: &CliConfig) -> Result<Client> {
    let email = config
        .email
        .as_deref()
        .context("no email given, use --email or DORKS_EMAIL")?;
    let password = config
        .password
        .as_deref()
        .context("no password given, use --password or DORKS_PASSWORD")?;

    let client = Client::new(config.client_config()?)?;
    client.login(email, password).await?;
    Ok(client)
}
