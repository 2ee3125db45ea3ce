//! Core types for the MetaHash network.
//!
//! Keys, addresses, transactions and the RPC records the nodes return,
//! together with the integer codec used to build signed payloads.

mod address;
pub mod codec;
mod key;
mod network;
mod rpc;
mod transaction;

pub use address::{ADDRESS_PREFIX, Address, AddressDerivation, MetahashAddress};
pub use key::{KeyPair, PublicKey, SecretKey, Signature};
pub use network::{Network, NetworkConfig, Role};
pub use rpc::{Balance, HistoryRecord, SendTxParams, SendTxResponse};
pub use transaction::{ProtocolVersion, SignedTransaction, Transaction, TxHash};

pub(crate) use rpc::{TransactionResult, error_message};
