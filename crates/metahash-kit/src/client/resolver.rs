//! Endpoint discovery.
//!
//! Each network publishes its nodes under two DNS names, `tor.<base>` for
//! queries and `proxy.<base>` for submissions. Every address a name resolves
//! to becomes one candidate URL, tried in the order DNS returned them.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::net::Ipv6Addr;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::RpcError;
use crate::types::{NetworkConfig, Role};

/// Future returned by [`HostResolver::lookup`].
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = io::Result<Vec<String>>> + Send + 'a>>;

/// Maps a host name to the addresses serving it.
pub trait HostResolver: Send + Sync {
    /// Resolve `host` to IP address strings, in preference order.
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a>;
}

/// Resolver backed by the system DNS.
#[derive(Clone, Copy, Debug, Default)]
pub struct DnsResolver;

impl HostResolver for DnsResolver {
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let mut addresses: Vec<String> = Vec::new();
            for socket in tokio::net::lookup_host((host, 0)).await? {
                let ip = socket.ip().to_string();
                if !addresses.contains(&ip) {
                    addresses.push(ip);
                }
            }
            Ok(addresses)
        })
    }
}

/// Resolver answering from a fixed table.
///
/// Hosts without an entry get the default list.
///
/// ```
/// use metahash_kit::StaticResolver;
///
/// let resolver = StaticResolver::new(["10.0.0.1"])
///     .with_host("proxy.net-dev.metahashnetwork.com", ["10.0.0.2", "10.0.0.3"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    default: Vec<String>,
    hosts: HashMap<String, Vec<String>>,
}

impl StaticResolver {
    /// Resolve every host to `addresses`.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: addresses.into_iter().map(Into::into).collect(),
            hosts: HashMap::new(),
        }
    }

    /// Resolve `host` to `addresses` instead of the default.
    pub fn with_host<I, S>(mut self, host: impl Into<String>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts
            .insert(host.into(), addresses.into_iter().map(Into::into).collect());
        self
    }
}

impl HostResolver for StaticResolver {
    fn lookup<'a>(&'a self, host: &'a str) -> LookupFuture<'a> {
        let addresses = self.hosts.get(host).unwrap_or(&self.default).clone();
        Box::pin(async move { Ok(addresses) })
    }
}

/// Format one URL per address, preserving order.
///
/// IPv6 literals are bracketed. A leading `/` on `path` is ignored.
///
/// ```
/// use metahash_kit::build_urls;
///
/// let urls = build_urls(&["10.0.0.1".to_string(), "::1".to_string()], 5795, "fetch-balance");
/// assert_eq!(urls, ["http://10.0.0.1:5795/fetch-balance", "http://[::1]:5795/fetch-balance"]);
/// ```
pub fn build_urls(addresses: &[String], port: u16, path: &str) -> Vec<String> {
    let path = path.strip_prefix('/').unwrap_or(path);
    addresses
        .iter()
        .map(|address| {
            if address.parse::<Ipv6Addr>().is_ok() {
                format!("http://[{}]:{}/{}", address, port, path)
            } else {
                format!("http://{}:{}/{}", address, port, path)
            }
        })
        .collect()
}

/// Turns a [`NetworkConfig`] into candidate URLs for each role.
#[derive(Clone)]
pub struct Endpoints {
    config: NetworkConfig,
    resolver: Arc<dyn HostResolver>,
}

impl Endpoints {
    /// Create endpoints for `config`, resolving through `resolver`.
    pub fn new(config: NetworkConfig, resolver: Arc<dyn HostResolver>) -> Self {
        Self { config, resolver }
    }

    /// The network configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Addresses of the nodes serving `role`.
    ///
    /// Fails with [`RpcError::CannotResolve`] if the lookup comes back empty.
    pub async fn resolve_hosts(&self, role: Role) -> Result<Vec<String>, RpcError> {
        let host = self.config.host(role);
        let addresses = self
            .resolver
            .lookup(&host)
            .await
            .map_err(|source| RpcError::Resolve {
                host: host.clone(),
                source,
            })?;

        if addresses.is_empty() {
            return Err(RpcError::CannotResolve(host));
        }
        Ok(addresses)
    }

    /// Candidate URLs for `path` on the nodes serving `role`.
    pub async fn urls(&self, role: Role, path: &str) -> Result<Vec<String>, RpcError> {
        let addresses = self.resolve_hosts(role).await?;
        Ok(build_urls(&addresses, self.config.port(role), path))
    }
}

impl std::fmt::Debug for Endpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoints")
            .field("config", &self.config)
            .finish()
    }
}
