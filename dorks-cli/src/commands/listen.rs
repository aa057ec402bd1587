// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Listen Command
//!
//! Opens the realtime channel and prints events until interrupted.

use anyhow::Result;
use dorks_core::Topic;

use crate::config::CliConfig;
use crate::display;

pub async fn run(config: &CliConfig, topics: &[String], echo_prefix: Option<&str>) -> Result<()> {
    let client = super::connect(config).await?;
    let channel = client.realtime()?;

    let topics = if topics.is_empty() {
        Topic::ALL.to_vec()
    } else {
        topics
            .iter()
            .map(|name| name.parse::<Topic>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("{}", e))?
    };

    for topic in topics {
        channel.on(topic, move |scope, frame| async move {
            println!(
                "{} [ndc {}] {}",
                console::style(topic).cyan().bold(),
                scope.ndc_id().unwrap_or_default(),
                frame.o
            );
        });
    }

    if let Some(prefix) = echo_prefix {
        let prefix_len = prefix.len();
        channel.command(prefix, move |scope, ctx| async move {
            let Some(thread_id) = ctx.thread_id.as_deref() else {
                return;
            };
            let reply = ctx.content[prefix_len..].trim();
            if reply.is_empty() {
                return;
            }
            if let Err(e) = scope.send_message(thread_id, reply).await {
                tracing::warn!(error = %e, "Echo reply failed");
            }
        });
    }

    channel.on_open(|| display::success("Realtime channel open"));
    channel.on_close(|code| display::warning(&format!("Realtime channel closed ({:?})", code)));
    channel.on_error(|e| display::warning(&format!("Realtime error: {}", e)));

    channel.start();
    display::info("Listening, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    channel.close().await;
    display::success("Closed");

    Ok(())
}
