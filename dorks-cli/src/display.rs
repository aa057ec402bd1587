// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display Helpers
//!
//! Terminal output formatting and styling.

use console::style;
use dorks_core::api::{Thread, User, Wallet};

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Displays a user profile.
pub fn display_user(user: &User) {
    let width = 40;
    println!("{}", "─".repeat(width));
    println!(
        "  {}",
        style(user.nickname.as_deref().unwrap_or("(no nickname)"))
            .bold()
            .cyan()
    );
    println!("{}", "─".repeat(width));
    println!("  {:<10} {}", style("uid").dim(), user.uid);
    if let Some(amino_id) = &user.amino_id {
        println!("  {:<10} {}", style("amino id").dim(), amino_id);
    }
    if let Some(level) = user.level {
        println!("  {:<10} {}", style("level").dim(), level);
    }
    println!("{}", "─".repeat(width));
}

pub fn display_wallet(wallet: &Wallet) {
    println!(
        "  {:<10} {}",
        style("coins").dim(),
        style(wallet.total_coins_float).bold()
    );
}

pub fn display_thread(thread: &Thread) {
    println!(
        "  {}  {} ({} members)",
        style(&thread.thread_id).dim(),
        thread.title.as_deref().unwrap_or("(untitled)"),
        thread.members_count
    );
}
