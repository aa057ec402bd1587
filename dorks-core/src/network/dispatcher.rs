// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dispatchers
//!
//! A dispatcher puts one fully prepared request on the wire and returns the raw
//! response. The transport swaps dispatchers when it rotates proxies, so all
//! routing decisions live behind this seam.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::NetworkError;
use super::headers::{HeaderMap, CONTENT_LENGTH};
use super::proxy::ProxyConfig;

/// HTTP method used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Request with final headers and the exact body bytes that were signed.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl PreparedRequest {
    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response as received, before envelope validation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends prepared requests.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, request: &PreparedRequest) -> Result<RawResponse, NetworkError>;
}

/// Builds dispatchers for direct and proxied routes.
pub trait DispatcherFactory: Send + Sync {
    fn direct(&self) -> Result<Arc<dyn Dispatcher>, NetworkError>;

    fn proxied(&self, proxy: &ProxyConfig) -> Result<Arc<dyn Dispatcher>, NetworkError>;
}

/// Dispatcher backed by a `reqwest` client.
pub struct ReqwestDispatcher {
    client: Client,
}

impl ReqwestDispatcher {
    /// Creates a dispatcher, optionally routed through `proxy`.
    pub fn new(timeout: Duration, proxy: Option<&ProxyConfig>) -> Result<Self, NetworkError> {
        let mut builder = Client::builder().timeout(timeout);

        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy.to_url())
                .map_err(|e| NetworkError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        } else {
            builder = builder.no_proxy();
        }

        Ok(ReqwestDispatcher {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Dispatcher for ReqwestDispatcher {
    async fn dispatch(&self, request: &PreparedRequest) -> Result<RawResponse, NetworkError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            // reqwest derives the length from the body
            if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.method == Method::Post {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_connect() {
        NetworkError::ConnectionFailed(err.to_string())
    } else {
        NetworkError::Http(err)
    }
}

/// Builds `reqwest` dispatchers sharing one timeout.
#[derive(Debug, Clone)]
pub struct ReqwestDispatcherFactory {
    timeout: Duration,
}

impl ReqwestDispatcherFactory {
    pub fn new(timeout: Duration) -> Self {
        ReqwestDispatcherFactory { timeout }
    }
}

impl DispatcherFactory for ReqwestDispatcherFactory {
    fn direct(&self) -> Result<Arc<dyn Dispatcher>, NetworkError> {
        Ok(Arc::new(ReqwestDispatcher::new(self.timeout, None)?))
    }

    fn proxied(&self, proxy: &ProxyConfig) -> Result<Arc<dyn Dispatcher>, NetworkError> {
        Ok(Arc::new(ReqwestDispatcher::new(self.timeout, Some(proxy))?))
    }
}
