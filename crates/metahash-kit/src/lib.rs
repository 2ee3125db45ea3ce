//! A typed Rust client for the MetaHash network.
//!
//! **metahash-kit** covers what a wallet or service needs to move value on
//! MetaHash: P-256 keys and addresses, the signed transaction payload, and an
//! HTTP client that finds nodes through DNS and fails over between them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use metahash_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), metahash_kit::Error> {
//!     // Read-only client
//!     let client = Metahash::dev().build();
//!
//!     let address: Address = "0x0099f4d2c76be3455f402b5d0538d84040c62669d565b26c33".parse()?;
//!     let balance = client.balance(&address).await?;
//!     println!("Received: {}", balance.received);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Core Types
//!
//! - [`KeyPair`], [`PublicKey`], [`SecretKey`], [`Signature`] - P-256 keys exchanged as hex DER
//! - [`Address`] - `0x`-prefixed account identifier
//! - [`Transaction`], [`SignedTransaction`] - Value transfers and their signatures
//! - [`Balance`], [`HistoryRecord`] - What the nodes report
//!
//! # Offline Signing
//!
//! ```
//! use metahash_kit::*;
//!
//! let keypair = KeyPair::generate();
//! let to: Address = "0x009806da73b1589f38630649bdee48467946d118059efd6aab".parse().unwrap();
//!
//! let signed = Transaction::new(to, 126894, 55647, 255)
//!     .sign(&keypair, ProtocolVersion::V1)
//!     .unwrap();
//! assert!(signed.verify().unwrap());
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Error, RpcError};
pub use types::codec;
pub use types::*;

// Re-export client types
pub use client::{
    BalanceQuery, DnsResolver, Endpoints, HistoryQuery, HostResolver, HttpMethod, Metahash,
    MetahashBuilder, NoopObserver, RpcClient, Signer, StaticResolver, TracingObserver,
    TransactionQuery, TransportObserver, Verifier, build_urls,
};
