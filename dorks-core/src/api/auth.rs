// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Authentication flows.
//!
//! A login first consults the session cache and probes the cached session
//! with one account request. Only if that fails does it exchange the
//! credentials. Every successful login pushes the signing service's public
//! key bundle to the backend.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::crypto::decode_session;
use crate::network::headers::{auth_value, AUID, NDC_AUTH, NDC_DEVICE_ID};
use crate::network::{Method, ResponseEnvelope};
use crate::storage::{cache_key, CachedSession};

use super::client::{timestamp, Client, Session};
use super::endpoint;
use super::error::{DorksError, DorksResult};
use super::models::{AccountResponse, LoginResponse, User};

impl Client {
    /// Logs in with email and password, reusing a cached session when it is still valid.
    pub async fn login(&self, email: &str, password: &str) -> DorksResult<Session> {
        let key = cache_key(email, password);

        if let Some(cached) = self.cached_session(&key)? {
            match self.probe(&cached).await {
                Ok(()) => {
                    info!(uid = %cached.user.uid, "Reusing cached session");
                    let session = Session {
                        session_id: cached.session_id,
                        device_id: cached.device_id,
                        user: cached.user,
                        cache_key: Some(key),
                    };
                    return self.activate(session).await;
                }
                Err(DorksError::Api(e)) => {
                    info!(code = e.code(), "Cached session rejected");
                    if let Some(cache) = self.cache() {
                        if let Err(e) = cache.delete(&key) {
                            warn!(error = %e, "Failed to drop cached session");
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let mut session = self.exchange_credentials("email", email, password).await?;
        session.cache_key = Some(key.clone());

        if let Some(cache) = self.cache() {
            let entry = CachedSession {
                session_id: session.session_id.clone(),
                device_id: session.device_id.clone(),
                user: session.user.clone(),
                email: Some(email.to_string()),
            };
            if let Err(e) = cache.set(&key, entry) {
                warn!(error = %e, "Failed to cache session");
            }
        }

        self.activate(session).await
    }

    /// Logs in with a phone number and password. Phone logins are not cached.
    pub async fn login_phone(&self, phone: &str, password: &str) -> DorksResult<Session> {
        let session = self
            .exchange_credentials("phoneNumber", phone, password)
            .await?;
        self.activate(session).await
    }

    /// Logs in with an existing session token.
    pub async fn login_with_session(&self, session_id: &str, device_id: &str) -> DorksResult<Session> {
        let claims = decode_session(session_id)?;
        self.transport()
            .set_identity(&claims.user_id, session_id, device_id);

        let user = match self.account().await {
            Ok(user) => user,
            Err(e) => {
                self.transport().clear_identity();
                return Err(e);
            }
        };

        let session = Session {
            session_id: session_id.to_string(),
            device_id: device_id.to_string(),
            user,
            cache_key: None,
        };
        self.activate(session).await
    }

    /// Global account of the current identity.
    pub async fn account(&self) -> DorksResult<User> {
        let response: AccountResponse = self.call(endpoint::ACCOUNT, &[], None).await?;
        Ok(response.account)
    }

    /// Pushes the signing service's public key bundle for `user_id`.
    pub async fn update_public_key(&self, user_id: &str) -> DorksResult<ResponseEnvelope> {
        let material = self
            .transport()
            .oracle()
            .fetch_public_key_material(user_id)
            .await?;
        self.call(endpoint::PUBLIC_KEY, &[], Some(material)).await
    }

    /// Asks the backend to send a verification code to `email`.
    pub async fn request_security_validation(&self, email: &str) -> DorksResult<ResponseEnvelope> {
        let body = json!({
            "identity": email,
            "type": 1,
            "deviceID": self.device_id(),
            "timestamp": timestamp(),
        });
        self.call(endpoint::REQUEST_SECURITY_VALIDATION, &[], Some(body))
            .await
    }

    /// Submits the verification code sent to `email`.
    pub async fn check_security_validation(
        &self,
        email: &str,
        code: &str,
    ) -> DorksResult<ResponseEnvelope> {
        let body = json!({
            "validationContext": {
                "type": 1,
                "identity": email,
                "data": {"code": code},
            },
            "deviceID": self.device_id(),
            "timestamp": timestamp(),
        });
        self.call(endpoint::CHECK_SECURITY_VALIDATION, &[], Some(body))
            .await
    }

    /// Early-signed credential exchange. `identity_field` names the login identity.
    async fn exchange_credentials(
        &self,
        identity_field: &str,
        identity: &str,
        password: &str,
    ) -> DorksResult<Session> {
        let device_id = self.device_id();
        let mut body = json!({
            "v": 2,
            "secret": format!("0 {}", password),
            "deviceID": device_id,
            "clientType": 100,
            "action": "normal",
            "timestamp": timestamp(),
        });
        body[identity_field] = json!(identity);

        let response: LoginResponse = self.call(endpoint::LOGIN, &[], Some(body)).await?;
        info!(uid = %response.user_profile.uid, "Logged in");

        Ok(Session {
            session_id: response.sid,
            device_id,
            user: response.user_profile,
            cache_key: None,
        })
    }

    fn cached_session(&self, key: &str) -> DorksResult<Option<CachedSession>> {
        match self.cache() {
            Some(cache) => Ok(cache.get(key)?),
            None => Ok(None),
        }
    }

    /// Checks a cached session with one unsigned account request.
    async fn probe(&self, cached: &CachedSession) -> DorksResult<()> {
        let auth = auth_value(&cached.session_id);
        let overrides = [
            (NDC_AUTH, auth.as_str()),
            (NDC_DEVICE_ID, cached.device_id.as_str()),
            (AUID, cached.user.uid.as_str()),
        ];

        self.transport()
            .send_raw::<Value>(Method::Get, endpoint::ACCOUNT.path, &overrides)
            .await?;
        Ok(())
    }

    async fn activate(&self, session: Session) -> DorksResult<Session> {
        self.install_session(session.clone());
        self.update_public_key(&session.user.uid).await?;
        Ok(session)
    }
}
