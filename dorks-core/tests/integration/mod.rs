// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration Tests for Dorks Core
//!
//! These tests drive complete workflows through the public client: login and
//! session caching, proxy failover, and the realtime channel against a local
//! WebSocket server.
//!
//! Run with: cargo test --test integration

#[path = "../common/mod.rs"]
mod common;

mod login_workflow_test;
mod realtime_workflow_test;
mod rotation_workflow_test;
