// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP client for the signing service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    CredentialsResponse, ElapsedResponse, OracleError, SignatureOracle, SignatureRequest,
    SignatureResponse,
};

/// Signing service reached over plain HTTP with an API key.
pub struct HttpSignatureOracle {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpSignatureOracle {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpSignatureOracle {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/signature{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, OracleError> {
        if !response.status().is_success() {
            return Err(OracleError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| OracleError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SignatureOracle for HttpSignatureOracle {
    async fn request_remote_signature(
        &self,
        payload: &str,
        user_id: Option<&str>,
    ) -> Result<String, OracleError> {
        let response = self
            .client
            .post(self.url("/ecdsa"))
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json; charset=utf8")
            .json(&SignatureRequest { payload, user_id })
            .send()
            .await?;

        let signature: SignatureResponse = Self::decode(response).await?;
        debug!(bytes = payload.len(), "Obtained remote signature");
        Ok(signature.ecdsa)
    }

    async fn fetch_public_key_material(
        &self,
        user_id: &str,
    ) -> Result<serde_json::Value, OracleError> {
        let response = self
            .client
            .get(self.url(&format!("/credentials/{}", user_id)))
            .header(AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let bundle: CredentialsResponse = Self::decode(response).await?;
        Ok(bundle.credentials)
    }

    async fn fetch_elapsed_base(&self) -> Result<String, OracleError> {
        let response = self
            .client
            .get(self.url("/getElapsed"))
            .header(AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let elapsed: ElapsedResponse = Self::decode(response).await?;
        Ok(elapsed.elapsed_realtime)
    }
}
