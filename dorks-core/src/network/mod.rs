// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Layer
//!
//! Signed HTTP transport for the backend service.
//!
//! # Architecture
//!
//! - **Dispatcher trait**: puts a prepared request on the wire, directly or through a proxy
//! - **Envelope**: uniform status check applied to every response
//! - **Resilient transport**: header construction, signing, proxy rotation
//! - **API error table**: backend status codes with names and messages
//!
//! # Example
//!
//! ```ignore
//! use dorks_core::network::{ResilientTransport, TransportConfig};
//!
//! let transport = ResilientTransport::new(&config, &device_id, signer, oracle)?;
//! let wallet: Wallet = transport.get("/g/s/wallet").await?;
//! ```

mod api_error;
mod dispatcher;
mod envelope;
mod error;
pub mod headers;
mod mock;
mod proxy;
mod transport;

pub use api_error::ApiError;
pub use error::NetworkError;

pub use dispatcher::{
    Dispatcher, DispatcherFactory, Method, PreparedRequest, RawResponse, ReqwestDispatcher,
    ReqwestDispatcherFactory,
};
pub use envelope::{decode, parse_body, validate, ResponseEnvelope};
pub use proxy::{ProxyConfig, ProxyPool};
pub use transport::{
    RequestSpec, ResilientTransport, Signing, TransportConfig, TransportMode, TransportResult,
    API_PREFIX, DEFAULT_BASE_URL,
};

// Mock dispatchers for testing
pub use mock::{MockDispatcher, MockDispatcherFactory, MockOutcome};
