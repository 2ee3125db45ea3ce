//! Network identification for MetaHash.

use std::fmt;
use std::str::FromStr;

/// The MetaHash network the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Development network. Supports test-address funding.
    #[default]
    Dev,
    /// Production network.
    Prod,
}

impl Network {
    /// Returns true if this is the development network.
    pub fn is_dev(&self) -> bool {
        matches!(self, Network::Dev)
    }

    /// Returns true if this is the production network.
    pub fn is_prod(&self) -> bool {
        matches!(self, Network::Prod)
    }

    /// Returns the network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Dev => "dev",
            Network::Prod => "prod",
        }
    }

    /// Base DNS name the role prefixes are joined to.
    pub fn base_host(&self) -> &'static str {
        match self {
            Network::Dev => "net-dev.metahashnetwork.com",
            Network::Prod => "net-main.metahashnetwork.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "net-dev" => Ok(Network::Dev),
            "prod" | "main" | "net-main" => Ok(Network::Prod),
            other => Err(format!("Unknown network '{}', expected 'dev' or 'prod'", other)),
        }
    }
}

/// Which kind of node a request goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Read-side nodes answering balance and history queries.
    Tor,
    /// Write-side nodes accepting transactions.
    Proxy,
}

impl Role {
    /// DNS label put in front of the network base host.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::Tor => "tor",
            Role::Proxy => "proxy",
        }
    }

    /// Port the role listens on unless configured otherwise.
    pub fn default_port(&self) -> u16 {
        match self {
            Role::Tor => 5795,
            Role::Proxy => 9999,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Where a network's nodes are found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Which network this describes.
    pub network: Network,
    /// Base DNS name, e.g. `net-dev.metahashnetwork.com`.
    pub base_host: String,
    /// Port of the `tor.` nodes.
    pub tor_port: u16,
    /// Port of the `proxy.` nodes.
    pub proxy_port: u16,
}

impl NetworkConfig {
    /// Default configuration for `network`.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            base_host: network.base_host().to_string(),
            tor_port: Role::Tor.default_port(),
            proxy_port: Role::Proxy.default_port(),
        }
    }

    /// DNS name serving `role`, e.g. `proxy.net-dev.metahashnetwork.com`.
    pub fn host(&self, role: Role) -> String {
        format!("{}.{}", role.prefix(), self.base_host)
    }

    /// Port serving `role`.
    pub fn port(&self, role: Role) -> u16 {
        match role {
            Role::Tor => self.tor_port,
            Role::Proxy => self.proxy_port,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(Network::default())
    }
}
