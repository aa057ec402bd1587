// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dorks Core Library
//!
//! Client for the NDC social backend: signed HTTP transport with proxy
//! failover and a realtime event channel.
//! All digests and request signatures use the audited `ring` crate.

pub mod api;
pub mod config;
pub mod crypto;
pub mod network;
pub mod oracle;
pub mod realtime;
pub mod storage;

pub use api::{Client, Context, DorksError, DorksResult, Endpoint, Scope, Session, User};
pub use config::{CacheConfig, ClientConfig, ConfigError};
pub use crypto::{decode_session, CredentialSigner, CryptoError, SessionData};
pub use network::{
    ApiError, NetworkError, ProxyConfig, ProxyPool, ResilientTransport, TransportConfig,
    TransportMode,
};
pub use oracle::{ElapsedRealtimeClock, HttpSignatureOracle, OracleError, SignatureOracle};
pub use realtime::{
    ChannelState, CommandArg, CommandContext, RealtimeChannel, RealtimeConfig, Topic,
};
pub use storage::{cache_key, CacheError, CachedSession, FileSessionCache, SessionCache};
