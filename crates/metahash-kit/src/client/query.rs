//! Query builders for fluent read operations.
//!
//! All query builders implement `IntoFuture` so they can be `.await`ed directly.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::types::{Address, Balance, HistoryRecord, TxHash};

use super::rpc::RpcClient;

// ============================================================================
// BalanceQuery
// ============================================================================

/// Query builder for getting an account snapshot.
///
/// # Example
///
/// ```rust,no_run
/// # use metahash_kit::*;
/// # async fn example() -> Result<(), metahash_kit::Error> {
/// let client = Metahash::dev().build();
/// let address: Address = "0x0099f4d2c76be3455f402b5d0538d84040c62669d565b26c33".parse()?;
///
/// let balance = client.balance(&address).await?;
/// println!("Received {}, spent {}", balance.received, balance.spent);
/// # Ok(())
/// # }
/// ```
pub struct BalanceQuery {
    rpc: Arc<RpcClient>,
    address: Address,
}

impl BalanceQuery {
    pub(crate) fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }
}

impl IntoFuture for BalanceQuery {
    type Output = Result<Balance, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { Ok(self.rpc.fetch_balance(&self.address).await?) })
    }
}

// ============================================================================
// HistoryQuery
// ============================================================================

/// Query builder for an account's ledger entries.
///
/// By default the node decides how many entries to return. Use
/// [`begin_tx`](Self::begin_tx) and [`count_txs`](Self::count_txs) to page.
///
/// # Example
///
/// ```rust,no_run
/// # use metahash_kit::*;
/// # async fn example() -> Result<(), metahash_kit::Error> {
/// let client = Metahash::dev().build();
/// let address: Address = "0x0099f4d2c76be3455f402b5d0538d84040c62669d565b26c33".parse()?;
///
/// let page = client.history(&address).begin_tx(100).count_txs(50).await?;
/// for record in page {
///     println!("{} -> {}: {}", record.from, record.to, record.value);
/// }
/// # Ok(())
/// # }
/// ```
pub struct HistoryQuery {
    rpc: Arc<RpcClient>,
    address: Address,
    begin_tx: Option<u64>,
    count_txs: Option<u64>,
}

impl HistoryQuery {
    pub(crate) fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self {
            rpc,
            address,
            begin_tx: None,
            count_txs: None,
        }
    }

    /// Skip the first `index` entries.
    pub fn begin_tx(mut self, index: u64) -> Self {
        self.begin_tx = Some(index);
        self
    }

    /// Return at most `count` entries.
    pub fn count_txs(mut self, count: u64) -> Self {
        self.count_txs = Some(count);
        self
    }
}

impl IntoFuture for HistoryQuery {
    type Output = Result<Vec<HistoryRecord>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let records = self
                .rpc
                .fetch_history(&self.address, self.begin_tx, self.count_txs)
                .await?;
            Ok(records)
        })
    }
}

// ============================================================================
// TransactionQuery
// ============================================================================

/// Query builder for a single transaction.
pub struct TransactionQuery {
    rpc: Arc<RpcClient>,
    hash: TxHash,
}

impl TransactionQuery {
    pub(crate) fn new(rpc: Arc<RpcClient>, hash: TxHash) -> Self {
        Self { rpc, hash }
    }
}

impl IntoFuture for TransactionQuery {
    type Output = Result<HistoryRecord, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { Ok(self.rpc.get_tx(&self.hash).await?) })
    }
}
