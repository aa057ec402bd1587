// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dorks API Layer
//!
//! High-level client for the backend service.
//!
//! # Overview
//!
//! The API layer coordinates:
//! - Login, session reuse and session invalidation
//! - Community scoping through immutable contexts
//! - Declarative endpoint descriptors and the single request builder
//! - Resource helpers for threads, users, communities, wallet and media
//!
//! # Example
//!
//! ```ignore
//! use dorks_core::api::{Client, DorksError};
//! use dorks_core::ClientConfig;
//!
//! let client = Client::new(ClientConfig::new("api-key"))?;
//! client.login("me@example.com", "password").await?;
//!
//! match client.as_community(42).thread("thread-id").await {
//!     Err(DorksError::Api(e)) => println!("{} ({})", e.name(), e.code()),
//!     other => println!("{:?}", other),
//! }
//! ```
//!
//! # Module Structure
//!
//! - `client`: the [`Client`] façade and session state
//! - `auth`: login flows
//! - `endpoint`: endpoint descriptors
//! - `resources`: resource helpers
//! - `models`: response payloads
//! - `error`: [`DorksError`]

mod auth;
mod client;
pub mod endpoint;
mod error;
pub mod models;
mod resources;

pub use client::{Client, Context, Session, DEFAULT_PAGE_SIZE};
pub use endpoint::{Endpoint, Scope};
pub use error::{DorksError, DorksResult};
pub use models::{ChatMessage, Community, LinkInfo, MessagePage, Thread, User, Wallet};
