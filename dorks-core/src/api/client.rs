// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client Façade
//!
//! Entry point tying the signer, the signing service, the transport, the
//! session cache and the realtime channel together.

use std::future::Future;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::crypto::CredentialSigner;
use crate::network::headers::URL_ENCODED_CONTENT_TYPE;
use crate::network::{Method, NetworkError, RequestSpec, ResilientTransport, TransportResult};
use crate::oracle::{ElapsedRealtimeClock, HttpSignatureOracle, SignatureOracle};
use crate::realtime::{RealtimeChannel, RealtimeIdentity, ScopeProvider};
use crate::storage::{FileSessionCache, SessionCache};

use super::endpoint::Endpoint;
use super::error::{DorksError, DorksResult};
use super::models::User;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub device_id: String,
    pub user: User,
    /// Cache entry this session was stored under
    pub cache_key: Option<String>,
}

/// Community a client is scoped to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub ndc_id: Option<i64>,
}

struct Shared {
    config: ClientConfig,
    transport: ResilientTransport,
    clock: Arc<ElapsedRealtimeClock>,
    cache: Option<Arc<dyn SessionCache>>,
    session: RwLock<Option<Session>>,
    realtime: Mutex<Weak<RealtimeChannel<Client>>>,
}

/// Client for the backend service.
///
/// Cloning is cheap. Clones and community-scoped clients from
/// [`as_community`](Client::as_community) share one transport and session.
///
/// # Example
///
/// ```ignore
/// use dorks_core::{Client, ClientConfig};
///
/// let client = Client::new(ClientConfig::from_env()?)?;
/// client.login("me@example.com", "password").await?;
///
/// let community = client.as_community(12345);
/// let threads = community.joined_threads(0, 25).await?;
/// ```
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
    context: Context,
}

impl Client {
    /// Creates a client talking to the configured endpoints.
    pub fn new(config: ClientConfig) -> DorksResult<Self> {
        let signer = CredentialSigner::default();
        let oracle: Arc<dyn SignatureOracle> = Arc::new(HttpSignatureOracle::new(
            &config.oracle_url,
            &config.api_key,
            config.oracle_timeout,
        )?);

        let device_id = match &config.device_id {
            Some(device_id) => device_id.clone(),
            None => signer.derive_device_id()?,
        };

        let transport = ResilientTransport::new(&config.transport, &device_id, signer, oracle)?;
        let cache = open_cache(&config)?;

        Ok(Self::from_parts(config, transport, cache))
    }

    /// Creates a client from an existing transport and cache.
    pub fn from_parts(
        config: ClientConfig,
        transport: ResilientTransport,
        cache: Option<Arc<dyn SessionCache>>,
    ) -> Self {
        let clock = Arc::new(ElapsedRealtimeClock::new(transport.oracle().clone()));

        Client {
            shared: Arc::new(Shared {
                config,
                transport,
                clock,
                cache,
                session: RwLock::new(None),
                realtime: Mutex::new(Weak::new()),
            }),
            context: Context::default(),
        }
    }

    // === Context ===

    /// Returns a client scoped to community `ndc_id`.
    pub fn as_community(&self, ndc_id: i64) -> Client {
        Client {
            shared: self.shared.clone(),
            context: Context {
                ndc_id: Some(ndc_id),
            },
        }
    }

    /// Returns a client without a community scope.
    pub fn global(&self) -> Client {
        Client {
            shared: self.shared.clone(),
            context: Context::default(),
        }
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn ndc_id(&self) -> Option<i64> {
        self.context.ndc_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub fn transport(&self) -> &ResilientTransport {
        &self.shared.transport
    }

    pub fn clock(&self) -> &Arc<ElapsedRealtimeClock> {
        &self.shared.clock
    }

    pub(crate) fn cache(&self) -> Option<&Arc<dyn SessionCache>> {
        self.shared.cache.as_ref()
    }

    /// Device id presented on every request.
    pub fn device_id(&self) -> String {
        self.shared.transport.device_id().unwrap_or_default()
    }

    // === Session ===

    pub fn session(&self) -> Option<Session> {
        self.shared.session.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.session.read().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.shared
            .session
            .read()
            .as_ref()
            .map(|session| session.user.uid.clone())
    }

    pub(crate) fn install_session(&self, session: Session) {
        self.shared
            .transport
            .set_identity(&session.user.uid, &session.session_id, &session.device_id);
        *self.shared.session.write() = Some(session);
    }

    /// Drops the session, its identity headers and its cache entry.
    pub fn invalidate_session(&self) {
        let session = self.shared.session.write().take();
        self.shared.transport.clear_identity();

        let Some(session) = session else {
            return;
        };
        info!(uid = %session.user.uid, "Session invalidated");

        if let (Some(cache), Some(key)) = (self.cache(), &session.cache_key) {
            if let Err(e) = cache.delete(key) {
                warn!(error = %e, "Failed to drop cached session");
            }
        }
    }

    // === Requests ===

    /// Sends `endpoint` with path `params` and an optional JSON body.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> DorksResult<T> {
        let uid = self.user_id();
        let path = endpoint.render(self.context.ndc_id, uid.as_deref(), params)?;

        let spec = match (endpoint.method, body) {
            (Method::Get, _) => RequestSpec::get(&path),
            (Method::Delete, _) => RequestSpec::delete(&path),
            (Method::Post, Some(body)) => {
                let bytes = serde_json::to_vec(&body)
                    .map_err(|e| NetworkError::InvalidBody(e.to_string()))?;
                RequestSpec::post(&path, bytes, endpoint.signing)
            }
            (Method::Post, None) => RequestSpec::post(&path, Vec::new(), endpoint.signing)
                .with_content_type(URL_ENCODED_CONTENT_TYPE),
        };

        self.checked(self.shared.transport.send(spec)).await
    }

    /// Awaits a transport call, ending the session on authentication errors.
    pub(crate) async fn checked<T>(
        &self,
        call: impl Future<Output = TransportResult<T>>,
    ) -> DorksResult<T> {
        match call.await {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = DorksError::from(e);
                if err.is_auth_error() {
                    warn!(error = %err, "Authentication rejected");
                    self.invalidate_session();
                }
                Err(err)
            }
        }
    }

    // === Realtime ===

    /// Returns the realtime channel of the current session, creating it on first use.
    ///
    /// The channel is not connected until [`RealtimeChannel::start`] is called.
    pub fn realtime(&self) -> DorksResult<Arc<RealtimeChannel<Client>>> {
        let session = self.session().ok_or(DorksError::NotAuthenticated)?;

        let mut slot = self.shared.realtime.lock();
        if let Some(channel) = slot.upgrade() {
            if channel.identity().session_id == session.session_id {
                return Ok(channel);
            }
        }

        let channel = RealtimeChannel::new(
            self.shared.config.realtime.clone(),
            RealtimeIdentity {
                device_id: session.device_id,
                session_id: session.session_id,
                user_id: session.user.uid,
            },
            self.shared.transport.signer().clone(),
            self.shared.clock.clone(),
            Arc::new(CommunityScopes {
                shared: self.shared.clone(),
            }),
        );
        *slot = Arc::downgrade(&channel);

        Ok(channel)
    }
}

/// Hands realtime listeners a client scoped to the frame's community.
struct CommunityScopes {
    shared: Arc<Shared>,
}

impl ScopeProvider<Client> for CommunityScopes {
    fn scope(&self, ndc_id: i64) -> Client {
        Client {
            shared: self.shared.clone(),
            context: Context {
                ndc_id: (ndc_id != 0).then_some(ndc_id),
            },
        }
    }
}

fn open_cache(config: &ClientConfig) -> DorksResult<Option<Arc<dyn SessionCache>>> {
    let settings = &config.cache;
    if !settings.enabled {
        return Ok(None);
    }

    let cache = match &settings.path {
        Some(path) => FileSessionCache::open(path, settings.max_size, settings.max_age)?,
        None => FileSessionCache::in_memory(settings.max_size, settings.max_age),
    };
    Ok(Some(Arc::new(cache)))
}

/// Milliseconds since the Unix epoch, as sent in request bodies.
pub(crate) fn timestamp() -> u64 {
    crate::realtime::unix_millis() as u64
}

/// Default page size of list calls.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
