// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Stub signing service and client builders shared across test files.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use dorks_core::crypto::CredentialSigner;
use dorks_core::network::{
    DispatcherFactory, MockDispatcher, MockDispatcherFactory, ProxyConfig, ResilientTransport,
    TransportConfig,
};
use dorks_core::oracle::{OracleError, SignatureOracle};
use dorks_core::storage::SessionCache;
use dorks_core::{Client, ClientConfig};

pub const DEVICE_ID: &str = "52TESTDEVICE";

/// Signing service answering every call from fixed values.
pub struct StubOracle {
    pub signatures: AtomicUsize,
    pub elapsed_fetches: AtomicUsize,
    pub elapsed: String,
}

impl StubOracle {
    pub fn new() -> Self {
        StubOracle {
            signatures: AtomicUsize::new(0),
            elapsed_fetches: AtomicUsize::new(0),
            elapsed: "1000".into(),
        }
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignatureOracle for StubOracle {
    async fn request_remote_signature(
        &self,
        _payload: &str,
        _user_id: Option<&str>,
    ) -> Result<String, OracleError> {
        self.signatures.fetch_add(1, Ordering::SeqCst);
        Ok("REMOTE".into())
    }

    async fn fetch_public_key_material(&self, user_id: &str) -> Result<Value, OracleError> {
        Ok(json!({"uid": user_id, "publicKey": "pk"}))
    }

    async fn fetch_elapsed_base(&self) -> Result<String, OracleError> {
        self.elapsed_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.elapsed.clone())
    }
}

/// `count` SOCKS5 proxies named `proxy0..`.
pub fn proxies(count: usize) -> Vec<ProxyConfig> {
    (0..count)
        .map(|i| ProxyConfig::socks5(&format!("proxy{}", i), 1080))
        .collect()
}

pub fn transport(
    factory: Arc<dyn DispatcherFactory>,
    config: &TransportConfig,
    oracle: Arc<StubOracle>,
) -> ResilientTransport {
    ResilientTransport::with_factory(
        config,
        DEVICE_ID,
        CredentialSigner::default(),
        oracle,
        factory,
    )
    .unwrap()
}

/// Client over a direct mock dispatcher.
pub fn client(
    direct: Arc<MockDispatcher>,
    config: ClientConfig,
    cache: Option<Arc<dyn SessionCache>>,
) -> Client {
    let factory = Arc::new(MockDispatcherFactory::new(direct));
    let transport = transport(factory, &config.transport, Arc::new(StubOracle::new()));
    Client::from_parts(config, transport, cache)
}

pub fn ok() -> Value {
    json!({"api:statuscode": 0})
}

pub fn login_response(sid: &str, uid: &str) -> Value {
    json!({
        "api:statuscode": 0,
        "sid": sid,
        "userProfile": {"uid": uid, "nickname": "tester", "status": 0, "role": 0}
    })
}
