//! Client module for interacting with the MetaHash network.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Metahash`] — The main client, the single entry point for all operations
//! - [`MetahashBuilder`] — Fluent builder for configuring the client
//! - [`RpcClient`] — Low-level client walking the endpoint ladder
//!
//! # Endpoints
//!
//! Node addresses come from DNS by default ([`DnsResolver`]). Tests and pinned
//! deployments can supply a [`StaticResolver`] or any [`HostResolver`].
//!
//! # Query Builders
//!
//! - [`BalanceQuery`] — Account snapshot
//! - [`HistoryQuery`] — Ledger entries, optionally paged
//! - [`TransactionQuery`] — A single transaction

mod metahash;
mod observer;
mod query;
mod resolver;
mod rpc;
mod signer;

pub use metahash::{Metahash, MetahashBuilder};
pub use observer::{NoopObserver, TracingObserver, TransportObserver};
pub use query::{BalanceQuery, HistoryQuery, TransactionQuery};
pub use resolver::{
    DnsResolver, Endpoints, HostResolver, LookupFuture, StaticResolver, build_urls,
};
pub use rpc::{
    DEFAULT_TIMEOUT, HttpMethod, METHOD_FETCH_BALANCE, METHOD_FETCH_HISTORY, METHOD_GET_TX,
    METHOD_SEND, RpcClient,
};
pub use signer::{Signer, Verifier};
