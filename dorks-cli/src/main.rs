// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dorks CLI
//!
//! Command-line interface for the dorks client.

mod commands;
mod config;
mod display;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "dorks")]
#[command(version, about = "Signed client for the NDC social backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Signing service API key
    #[arg(long, global = true, env = "DORKS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Account email
    #[arg(long, global = true, env = "DORKS_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "DORKS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Comma separated proxy list (socks4://, socks5://, http://)
    #[arg(long, global = true, env = "DORKS_PROXIES")]
    proxies: Option<String>,

    /// Realtime endpoint override
    #[arg(long, global = true, env = "DORKS_WS_URL")]
    ws_url: Option<String>,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and cache the session
    Login,

    /// Show the account profile and wallet
    Account,

    /// Work with chat threads
    #[command(subcommand)]
    Threads(ThreadCommands),

    /// Print realtime events until interrupted
    Listen {
        /// Topics to print (default: all)
        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Reply with the rest of any message starting with this prefix
        #[arg(long)]
        echo: Option<String>,
    },
}

#[derive(Subcommand)]
enum ThreadCommands {
    /// List joined threads
    List {
        /// Community id
        #[arg(long)]
        community: i64,
    },

    /// Send a text message
    Send {
        /// Community id
        #[arg(long)]
        community: i64,

        /// Thread id
        thread: String,

        /// Message text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dorks_core=info,dorks=info")),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dorks")
    });

    let config = CliConfig {
        api_key: cli.api_key.unwrap_or_default(),
        email: cli.email,
        password: cli.password,
        proxies: cli.proxies,
        data_dir,
        ws_url: cli.ws_url,
    };

    match cli.command {
        Commands::Login => commands::login::run(&config).await?,
        Commands::Account => commands::account::show(&config).await?,
        Commands::Threads(cmd) => match cmd {
            ThreadCommands::List { community } => {
                commands::threads::list(&config, community).await?;
            }
            ThreadCommands::Send {
                community,
                thread,
                text,
            } => {
                commands::threads::send(&config, community, &thread, &text).await?;
            }
        },
        Commands::Listen { topics, echo } => {
            commands::listen::run(&config, &topics, echo.as_deref()).await?;
        }
    }

    Ok(())
}
