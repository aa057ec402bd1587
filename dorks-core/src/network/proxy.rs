// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proxy descriptors and the single-use proxy pool.

use std::fmt;

use rand::Rng;
use url::Url;

use super::error::NetworkError;

/// Outbound proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfig {
    /// SOCKS4 proxy.
    Socks4 {
        /// Proxy host address.
        host: String,
        /// Proxy port.
        port: u16,
    },
    /// SOCKS5 proxy.
    Socks5 {
        /// Proxy host address.
        host: String,
        /// Proxy port.
        port: u16,
        /// Optional username for authentication.
        username: Option<String>,
        /// Optional password for authentication.
        password: Option<String>,
        /// Resolve target hostnames on the proxy (`socks5h`).
        remote_dns: bool,
    },
    /// HTTP CONNECT proxy.
    HttpConnect {
        /// Proxy host address.
        host: String,
        /// Proxy port.
        port: u16,
        /// Optional username for authentication.
        username: Option<String>,
        /// Optional password for authentication.
        password: Option<String>,
    },
}

impl ProxyConfig {
    /// Creates a SOCKS5 proxy without authentication.
    pub fn socks5(host: &str, port: u16) -> Self {
        ProxyConfig::Socks5 {
            host: host.to_string(),
            port,
            username: None,
            password: None,
            remote_dns: false,
        }
    }

    /// Parses `scheme://[user:pass@]host:port`.
    ///
    /// A bare `host:port` is read as SOCKS5.
    pub fn parse(descriptor: &str) -> Result<Self, NetworkError> {
        let descriptor = descriptor.trim();
        let normalized = if descriptor.contains("://") {
            descriptor.to_string()
        } else {
            format!("socks5://{}", descriptor)
        };

        let url = Url::parse(&normalized)
            .map_err(|e| NetworkError::InvalidProxy(format!("{}: {}", descriptor, e)))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| NetworkError::InvalidProxy(format!("{}: missing host", descriptor)))?
            .to_string();
        let port = url
            .port()
            .ok_or_else(|| NetworkError::InvalidProxy(format!("{}: missing port", descriptor)))?;

        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let password = url.password().map(str::to_string);

        match url.scheme() {
            "socks4" | "socks4a" => Ok(ProxyConfig::Socks4 { host, port }),
            "socks5" | "socks5h" => Ok(ProxyConfig::Socks5 {
                host,
                port,
                username,
                password,
                remote_dns: url.scheme() == "socks5h",
            }),
            "http" | "https" => Ok(ProxyConfig::HttpConnect {
                host,
                port,
                username,
                password,
            }),
            other => Err(NetworkError::InvalidProxy(format!(
                "{}: unsupported scheme {}",
                descriptor, other
            ))),
        }
    }

    /// Renders the proxy as a URL understood by the HTTP client.
    pub fn to_url(&self) -> String {
        match self {
            ProxyConfig::Socks4 { host, port } => format!("socks4://{}:{}", host, port),
            ProxyConfig::Socks5 {
                host,
                port,
                username,
                password,
                remote_dns,
            } => {
                let scheme = if *remote_dns { "socks5h" } else { "socks5" };
                format!(
                    "{}://{}{}:{}",
                    scheme,
                    userinfo(username, password),
                    host,
                    port
                )
            }
            ProxyConfig::HttpConnect {
                host,
                port,
                username,
                password,
            } => format!("http://{}{}:{}", userinfo(username, password), host, port),
        }
    }

    /// Returns the proxy host.
    pub fn host(&self) -> &str {
        match self {
            ProxyConfig::Socks4 { host, .. }
            | ProxyConfig::Socks5 { host, .. }
            | ProxyConfig::HttpConnect { host, .. } => host,
        }
    }
}

fn userinfo(username: &Option<String>, password: &Option<String>) -> String {
    match (username, password) {
        (Some(user), Some(pass)) => format!("{}:{}@", user, pass),
        (Some(user), None) => format!("{}@", user),
        _ => String::new(),
    }
}

impl fmt::Display for ProxyConfig {
    /// Credentials are never displayed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyConfig::Socks4 { host, port } => write!(f, "socks4://{}:{}", host, port),
            ProxyConfig::Socks5 {
                host,
                port,
                remote_dns,
                ..
            } => {
                let scheme = if *remote_dns { "socks5h" } else { "socks5" };
                write!(f, "{}://{}:{}", scheme, host, port)
            }
            ProxyConfig::HttpConnect { host, port, .. } => write!(f, "http://{}:{}", host, port),
        }
    }
}

/// Finite pool of proxies. A proxy taken from the pool never returns to it.
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    proxies: Vec<ProxyConfig>,
    configured: usize,
}

impl ProxyPool {
    /// Creates a pool from a list of proxies.
    pub fn new(proxies: Vec<ProxyConfig>) -> Self {
        let configured = proxies.len();
        ProxyPool {
            proxies,
            configured,
        }
    }

    /// Parses a comma or newline separated list of descriptors.
    pub fn parse_list(list: &str) -> Result<Self, NetworkError> {
        let proxies = list
            .split([',', '\n'])
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ProxyConfig::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProxyPool::new(proxies))
    }

    /// Removes and returns a uniformly random proxy.
    pub fn take_random(&mut self) -> Option<ProxyConfig> {
        if self.proxies.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.proxies.len());
        Some(self.proxies.remove(index))
    }

    /// Number of proxies still available.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Returns true if the pool started with at least one proxy.
    pub fn was_configured(&self) -> bool {
        self.configured > 0
    }

    /// Number of proxies the pool started with.
    pub fn configured(&self) -> usize {
        self.configured
    }
}
