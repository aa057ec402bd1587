// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account Command

use anyhow::Result;

use crate::config::CliConfig;
use crate::display;

/// Shows the account profile and wallet.
pub async fn show(config: &CliConfig) -> Result<()> {
    let client = super::connect(config).await?;

    let user = client.account().await?;
    display::display_user(&user);

    let wallet = client.wallet().await?;
    display::display_wallet(&wallet);

    Ok(())
}
