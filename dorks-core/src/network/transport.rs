// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resilient Transport
//!
//! Signed HTTP requests with envelope validation and proxy rotation.
//!
//! Rotation state machine:
//! - `Direct`: no proxy. A transport fault rotates into the pool if one was
//!   configured, otherwise it is surfaced.
//! - `Proxied`: a fault consumes another random proxy and retries the call.
//!   When the pool is empty the direct dispatcher is reinstalled and the
//!   transport becomes `Exhausted`.
//! - `Exhausted`: direct, with no further fallback.
//!
//! API errors and malformed bodies are never retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::dispatcher::{
    Dispatcher, DispatcherFactory, Method, PreparedRequest, RawResponse,
    ReqwestDispatcherFactory,
};
use super::envelope;
use super::error::NetworkError;
use super::headers::{
    self, auth_value, base_headers, HeaderMap, AUID, CONTENT_LENGTH, CONTENT_TYPE, NDC_AUTH,
    NDC_DEVICE_ID, NDC_MESSAGE_SIGNATURE, NDC_MSG_SIG,
};
use super::proxy::{ProxyConfig, ProxyPool};
use crate::crypto::CredentialSigner;
use crate::oracle::SignatureOracle;

/// Default service host.
pub const DEFAULT_BASE_URL: &str = "https://service.aminoapps.com";

/// Versioned path prefix prepended to every request path.
pub const API_PREFIX: &str = "/api/v1";

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Service base URL without the version prefix.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Proxies tried, each at most once, after a transport fault.
    pub proxies: Vec<ProxyConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            proxies: Vec::new(),
        }
    }
}

impl TransportConfig {
    /// Creates a config with a proxy pool.
    pub fn with_proxies(mut self, proxies: Vec<ProxyConfig>) -> Self {
        self.proxies = proxies;
        self
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Routing mode of the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Direct,
    Proxied,
    Exhausted,
}

/// How the body of a request is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signing {
    /// Identity headers only.
    None,
    /// Local HMAC over the body.
    Local,
    /// Local HMAC plus a remote signature from the oracle.
    Full,
}

/// One logical request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub signing: Signing,
    pub overrides: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn get(path: &str) -> Self {
        RequestSpec {
            method: Method::Get,
            path: path.to_string(),
            body: Vec::new(),
            content_type: None,
            signing: Signing::None,
            overrides: Vec::new(),
        }
    }

    pub fn delete(path: &str) -> Self {
        RequestSpec {
            method: Method::Delete,
            ..RequestSpec::get(path)
        }
    }

    pub fn post(path: &str, body: Vec<u8>, signing: Signing) -> Self {
        RequestSpec {
            method: Method::Post,
            body,
            signing,
            ..RequestSpec::get(path)
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.overrides.push((name.to_string(), value.to_string()));
        self
    }
}

struct DispatchState {
    mode: TransportMode,
    active: Arc<dyn Dispatcher>,
    pool: ProxyPool,
    generation: u64,
    rotations: usize,
}

/// Signed HTTP transport with proxy failover.
pub struct ResilientTransport {
    base_url: String,
    signer: CredentialSigner,
    oracle: Arc<dyn SignatureOracle>,
    headers: RwLock<HeaderMap>,
    factory: Arc<dyn DispatcherFactory>,
    direct: Arc<dyn Dispatcher>,
    state: Mutex<DispatchState>,
}

impl ResilientTransport {
    /// Creates a transport using `reqwest` dispatchers.
    pub fn new(
        config: &TransportConfig,
        device_id: &str,
        signer: CredentialSigner,
        oracle: Arc<dyn SignatureOracle>,
    ) -> TransportResult<Self> {
        let factory = Arc::new(ReqwestDispatcherFactory::new(config.request_timeout()));
        Self::with_factory(config, device_id, signer, oracle, factory)
    }

    /// Creates a transport with a custom dispatcher factory.
    pub fn with_factory(
        config: &TransportConfig,
        device_id: &str,
        signer: CredentialSigner,
        oracle: Arc<dyn SignatureOracle>,
        factory: Arc<dyn DispatcherFactory>,
    ) -> TransportResult<Self> {
        let direct = factory.direct()?;

        Ok(ResilientTransport {
            base_url: format!("{}{}", config.base_url.trim_end_matches('/'), API_PREFIX),
            signer,
            oracle,
            headers: RwLock::new(base_headers(device_id)),
            factory,
            direct: direct.clone(),
            state: Mutex::new(DispatchState {
                mode: TransportMode::Direct,
                active: direct,
                pool: ProxyPool::new(config.proxies.clone()),
                generation: 0,
                rotations: 0,
            }),
        })
    }

    // === Headers ===

    /// Returns a base header value.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.read().get(name).cloned()
    }

    /// Sets a base header sent with every subsequent request.
    pub fn set_header(&self, name: &str, value: &str) {
        self.headers.write().insert(name.to_string(), value.to_string());
    }

    /// Installs the identity headers of an authenticated session.
    pub fn set_identity(&self, user_id: &str, session_id: &str, device_id: &str) {
        let mut headers = self.headers.write();
        headers.insert(AUID.into(), user_id.into());
        headers.insert(NDC_AUTH.into(), auth_value(session_id));
        headers.insert(NDC_DEVICE_ID.into(), device_id.into());
    }

    /// Removes the session headers.
    pub fn clear_identity(&self) {
        let mut headers = self.headers.write();
        headers.remove(AUID);
        headers.remove(NDC_AUTH);
    }

    /// Returns the device id currently presented.
    pub fn device_id(&self) -> Option<String> {
        self.header(NDC_DEVICE_ID)
    }

    /// Returns the signer shared with the realtime channel.
    pub fn signer(&self) -> &CredentialSigner {
        &self.signer
    }

    /// Returns the signing service client.
    pub fn oracle(&self) -> &Arc<dyn SignatureOracle> {
        &self.oracle
    }

    // === Rotation state ===

    pub fn mode(&self) -> TransportMode {
        self.state.lock().mode
    }

    /// Number of proxies installed so far.
    pub fn rotations(&self) -> usize {
        self.state.lock().rotations
    }

    /// Proxies left in the pool.
    pub fn remaining_proxies(&self) -> usize {
        self.state.lock().pool.len()
    }

    // === Send paths ===

    /// GET with identity headers.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        self.send(RequestSpec::get(path)).await
    }

    /// DELETE with identity headers.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        self.send(RequestSpec::delete(path)).await
    }

    /// Fully signed POST of a serialized JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> TransportResult<T> {
        let body = serialize(body)?;
        self.send(RequestSpec::post(path, body, Signing::Full)).await
    }

    /// POST signed only locally, for calls made before a session exists.
    pub async fn post_early<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> TransportResult<T> {
        let body = serialize(body)?;
        self.send(RequestSpec::post(path, body, Signing::Local)).await
    }

    /// Locally signed POST of a raw buffer.
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> TransportResult<T> {
        let spec = RequestSpec::post(path, body, Signing::Local).with_content_type(content_type);
        self.send(spec).await
    }

    /// Locally signed POST with an empty url-encoded body.
    pub async fn post_url_encoded<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let spec = RequestSpec::post(path, Vec::new(), Signing::Local)
            .with_content_type(headers::URL_ENCODED_CONTENT_TYPE);
        self.send(spec).await
    }

    /// Unsigned request with per-call header overrides.
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        overrides: &[(&str, &str)],
    ) -> TransportResult<T> {
        let mut spec = RequestSpec::get(path);
        spec.method = method;
        for (name, value) in overrides {
            spec = spec.with_header(name, value);
        }
        self.send(spec).await
    }

    /// Sends a request and decodes the validated payload.
    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> TransportResult<T> {
        let started = Instant::now();
        let response = self.execute(&spec).await?;
        let decoded = envelope::decode(&response.body);

        match &decoded {
            Ok(_) => info!(
                path = %spec.path,
                status_code = 0,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            ),
            Err(NetworkError::Api(e)) => info!(
                path = %spec.path,
                status_code = e.code(),
                "Request rejected"
            ),
            Err(e) => warn!(
                path = %spec.path,
                http_status = response.status,
                error = %e,
                "Undecodable response"
            ),
        }

        decoded
    }

    async fn execute(&self, spec: &RequestSpec) -> TransportResult<RawResponse> {
        // Reused if the call is retried through another proxy.
        let mut remote_signature: Option<String> = None;

        loop {
            let (dispatcher, generation) = {
                let state = self.state.lock();
                (state.active.clone(), state.generation)
            };

            let err = match self.attempt(&*dispatcher, spec, &mut remote_signature).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transport_fault() => err,
                Err(err) => return Err(err),
            };

            if !self.rotate(generation, &err) {
                return Err(err);
            }
        }
    }

    async fn attempt(
        &self,
        dispatcher: &dyn Dispatcher,
        spec: &RequestSpec,
        remote_signature: &mut Option<String>,
    ) -> TransportResult<RawResponse> {
        let mut headers = self.headers.read().clone();

        if spec.signing != Signing::None {
            headers.insert(CONTENT_LENGTH.into(), spec.body.len().to_string());
            headers.insert(NDC_MSG_SIG.into(), self.signer.sign_body(&spec.body));
        }
        if let Some(content_type) = &spec.content_type {
            headers.insert(CONTENT_TYPE.into(), content_type.clone());
        }
        if spec.signing == Signing::Full {
            let signature = match remote_signature.clone() {
                Some(signature) => signature,
                None => {
                    let payload = String::from_utf8_lossy(&spec.body);
                    let signature = self
                        .oracle
                        .request_remote_signature(&payload, headers.get(AUID).map(String::as_str))
                        .await?;
                    *remote_signature = Some(signature.clone());
                    signature
                }
            };
            headers.insert(NDC_MESSAGE_SIGNATURE.into(), signature);
        }
        for (name, value) in &spec.overrides {
            headers.insert(name.clone(), value.clone());
        }

        let request = PreparedRequest {
            method: spec.method,
            url: format!("{}{}", self.base_url, spec.path),
            headers,
            body: spec.body.clone(),
        };

        debug!(method = request.method.as_str(), path = %spec.path, "Dispatching request");
        dispatcher.dispatch(&request).await
    }

    /// Handles a transport fault seen on dispatcher `generation`.
    ///
    /// Returns true if the call should be retried.
    fn rotate(&self, generation: u64, err: &NetworkError) -> bool {
        let mut state = self.state.lock();

        // Another call already replaced the failing dispatcher.
        if state.generation != generation {
            return true;
        }

        loop {
            if state.mode == TransportMode::Exhausted {
                return false;
            }

            let Some(proxy) = state.pool.take_random() else {
                if !state.pool.was_configured() {
                    return false;
                }
                state.active = self.direct.clone();
                state.mode = TransportMode::Exhausted;
                state.generation += 1;
                warn!(
                    rotations = state.rotations,
                    error = %err,
                    "Proxy pool exhausted, falling back to direct connection"
                );
                return false;
            };

            match self.factory.proxied(&proxy) {
                Ok(dispatcher) => {
                    state.active = dispatcher;
                    state.mode = TransportMode::Proxied;
                    state.generation += 1;
                    state.rotations += 1;
                    warn!(
                        proxy = %proxy,
                        remaining = state.pool.len(),
                        error = %err,
                        "Transport fault, rotating proxy"
                    );
                    return true;
                }
                Err(e) => {
                    warn!(proxy = %proxy, error = %e, "Skipping unusable proxy");
                }
            }
        }
    }
}

fn serialize<B: Serialize + ?Sized>(body: &B) -> TransportResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| NetworkError::InvalidBody(e.to_string()))
}
