//! Error types for metahash-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`RpcError`] — Resolution, transport and protocol errors
//!   - [`CodecError`] — Integer encoding precondition violations
//!   - [`ParseKeyError`] — Undecodable key material
//!   - [`SignatureError`] — Undecodable signatures
//!   - [`ParseAddressError`] — Invalid address format
//!   - [`SignerError`] — Signing operation failures
//!
//! # Error Handling Examples
//!
//! ```rust,no_run
//! use metahash_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let client = Metahash::dev().build();
//! let address: Address = "0x0099f4d2c76be3455f402b5d0538d84040c62669d565b26c33".parse()?;
//!
//! match client.balance(&address).await {
//!     Ok(balance) => println!("Received: {}", balance.received),
//!     Err(Error::Rpc(RpcError::NetworkUnreachable { attempts })) => {
//!         println!("none of the {} hosts answered", attempts);
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::types::Network;

/// Error encoding a value with the wire codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Cannot encode a negative number")]
    NegativeNumber,

    #[error("Number too big: {bits} bits exceeds the 512-bit maximum")]
    TooBig { bits: u64 },

    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Error decoding a private or public key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid DER key: {0}")]
    InvalidDer(String),
}

/// Error decoding a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid DER signature: {0}")]
    InvalidDer(String),
}

/// Error parsing an address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Address '{0}' is not valid hex")]
    InvalidHex(String),
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// Endpoint resolution, transport and protocol errors.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Resolution ───
    #[error("DNS lookup for {host} failed: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("DNS lookup for {0} returned no addresses")]
    CannotResolve(String),

    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network unreachable: all {attempts} endpoints failed at the transport level")]
    NetworkUnreachable { attempts: usize },

    #[error("Network error: {url} returned HTTP {status}")]
    Network {
        url: String,
        status: u16,
        body: String,
    },

    // ─── Protocol ───
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request rejected by the network: {message}")]
    Rejected { message: String },

    #[error("Method {method} is not supported on the {network} network")]
    UnsupportedMethod {
        method: &'static str,
        network: Network,
    },
}

impl RpcError {
    /// Create a network error from a non-success HTTP response.
    pub fn network(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        RpcError::Network {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Returns true if the request reached a server and was refused, either
    /// by HTTP status or by the application-level envelope.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RpcError::Network { .. } | RpcError::Rejected { .. })
    }

    /// HTTP status code, if the error came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RpcError::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for metahash-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("No signer configured. Call .signer() or .private_key() on MetahashBuilder.")]
    NoSigner,

    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    // ─── Encoding ───
    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    // ─── Signing ───
    #[error(transparent)]
    Signing(#[from] SignerError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),
}
