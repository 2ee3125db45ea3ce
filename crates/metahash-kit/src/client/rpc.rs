//! Low-level RPC client for MetaHash nodes.
//!
//! Every operation resolves the candidate URLs for its role and walks them in
//! order. A URL that fails before answering is skipped; the first URL that
//! answers decides the outcome, success or not.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::RpcError;
use crate::types::{
    Address, Balance, HistoryRecord, Role, SendTxParams, SendTxResponse, TransactionResult,
    TxHash, error_message,
};

use super::observer::{NoopObserver, TransportObserver};
use super::resolver::Endpoints;

/// Per-attempt timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Method name of transaction submission.
pub const METHOD_SEND: &str = "mhc_send";
/// Method name of the balance query.
pub const METHOD_FETCH_BALANCE: &str = "fetch-balance";
/// Method name of the history query.
pub const METHOD_FETCH_HISTORY: &str = "fetch-history";
/// Method name of the single-transaction query.
pub const METHOD_GET_TX: &str = "get-tx";

/// HTTP verb of a ladder request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Submission envelope.
#[derive(Serialize)]
struct SendRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a SendTxParams,
}

/// Query envelope.
#[derive(Serialize)]
struct QueryRequest<'a, P: Serialize> {
    id: u64,
    method: &'a str,
    params: P,
}

/// Query response. Nodes answer with either `result` or `error`.
#[derive(Deserialize)]
struct QueryResponse<T> {
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<serde_json::Value>,
    result: Option<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Paging parameters of `fetch-history`.
#[derive(Serialize)]
struct HistoryParams<'a> {
    address: &'a Address,
    #[serde(rename = "beginTx", skip_serializing_if = "Option::is_none")]
    begin_tx: Option<u64>,
    #[serde(rename = "countTxs", skip_serializing_if = "Option::is_none")]
    count_txs: Option<u64>,
}

/// Low-level RPC client for MetaHash.
pub struct RpcClient {
    endpoints: Endpoints,
    client: reqwest::Client,
    timeout: Duration,
    observer: Arc<dyn TransportObserver>,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for `endpoints` with the default timeout and no observer.
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_options(endpoints, DEFAULT_TIMEOUT, Arc::new(NoopObserver))
    }

    /// Create a client with a custom per-attempt timeout and observer.
    pub fn with_options(
        endpoints: Endpoints,
        timeout: Duration,
        observer: Arc<dyn TransportObserver>,
    ) -> Self {
        Self {
            endpoints,
            client: reqwest::Client::new(),
            timeout,
            observer,
            request_id: AtomicU64::new(0),
        }
    }

    /// The endpoints this client resolves against.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Try `urls` in order until one answers.
    ///
    /// Transport failures (refused connection, timeout, anything before a
    /// status line) move on to the next URL. A non-2xx answer fails at once
    /// with [`RpcError::Network`]; a 2xx answer returns its body. If no URL
    /// answers, or there are none, the result is
    /// [`RpcError::NetworkUnreachable`].
    pub async fn send(
        &self,
        urls: &[String],
        body: Option<Vec<u8>>,
        method: HttpMethod,
    ) -> Result<Vec<u8>, RpcError> {
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            self.observer.on_attempt(url, index + 1, total);

            let mut request = match method {
                HttpMethod::Get => self.client.get(url),
                HttpMethod::Post => self.client.post(url),
            }
            .timeout(self.timeout);

            if let Some(body) = &body {
                request = request
                    .header("Content-Type", "application/json")
                    .body(body.clone());
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(error) => {
                    self.observer.on_transport_failure(url, &error);
                    continue;
                }
            };

            let status = response.status();
            self.observer.on_response(url, status.as_u16());

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RpcError::network(url.clone(), status.as_u16(), body));
            }

            return Ok(response.bytes().await?.to_vec());
        }

        Err(RpcError::NetworkUnreachable { attempts: total })
    }

    /// Make a query against the `tor` nodes.
    pub async fn query<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let urls = self.endpoints.urls(Role::Tor, method).await?;
        let request = QueryRequest {
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let body = serde_json::to_vec(&request)?;
        let response = self.send(&urls, Some(body), HttpMethod::Post).await?;
        decode_query(method, &response)
    }

    /// Submit a signed transaction to the `proxy` nodes.
    ///
    /// Rejections are returned as they are; nothing is retried.
    pub async fn submit(&self, params: &SendTxParams) -> Result<TxHash, RpcError> {
        let urls = self.endpoints.urls(Role::Proxy, "").await?;
        let request = SendRequest {
            jsonrpc: "2.0",
            method: METHOD_SEND,
            params,
        };
        let body = serde_json::to_vec(&request)?;
        let response = self.send(&urls, Some(body), HttpMethod::Post).await?;
        let response: SendTxResponse = serde_json::from_slice(&response)?;
        response.into_tx_hash()
    }

    // ========================================================================
    // Typed queries
    // ========================================================================

    /// Account snapshot of `address`.
    pub async fn fetch_balance(&self, address: &Address) -> Result<Balance, RpcError> {
        self.query(
            METHOD_FETCH_BALANCE,
            serde_json::json!({ "address": address }),
        )
        .await
    }

    /// Ledger entries touching `address`, optionally paged.
    pub async fn fetch_history(
        &self,
        address: &Address,
        begin_tx: Option<u64>,
        count_txs: Option<u64>,
    ) -> Result<Vec<HistoryRecord>, RpcError> {
        self.query(
            METHOD_FETCH_HISTORY,
            HistoryParams {
                address,
                begin_tx,
                count_txs,
            },
        )
        .await
    }

    /// A single transaction by hash.
    pub async fn get_tx(&self, hash: &TxHash) -> Result<HistoryRecord, RpcError> {
        let result: TransactionResult = self
            .query(METHOD_GET_TX, serde_json::json!({ "hash": hash }))
            .await?;
        Ok(result.into_record())
    }

    /// Ask a development proxy to fund `address`.
    ///
    /// Only the dev network offers this. Elsewhere it fails with
    /// [`RpcError::UnsupportedMethod`] without sending anything.
    pub async fn add_test_address(&self, address: &Address) -> Result<(), RpcError> {
        let network = self.endpoints.config().network;
        if !network.is_dev() {
            return Err(RpcError::UnsupportedMethod {
                method: "add_test_address",
                network,
            });
        }

        let path = format!("?act=addWallet&p_addr={}", address);
        let urls = self.endpoints.urls(Role::Proxy, &path).await?;
        let response = self.send(&urls, None, HttpMethod::Get).await?;

        // The proxy answers in free form; only a JSON error member counts.
        if let Ok(serde_json::Value::Object(map)) =
            serde_json::from_slice::<serde_json::Value>(&response)
        {
            if let Some(message) = map.get("error").and_then(error_message) {
                return Err(RpcError::Rejected { message });
            }
        }
        Ok(())
    }
}

/// Unwrap a query response body.
fn decode_query<R: DeserializeOwned>(method: &str, body: &[u8]) -> Result<R, RpcError> {
    let response: QueryResponse<R> = serde_json::from_slice(body)?;

    if let Some(message) = response.error.as_ref().and_then(error_message) {
        return Err(RpcError::Rejected { message });
    }

    response
        .result
        .ok_or_else(|| RpcError::InvalidResponse(format!("Missing result in {} response", method)))
}

impl Clone for RpcClient {
    fn clone(&self) -> Self {
        Self {
            endpoints: self.endpoints.clone(),
            client: self.client.clone(),
            timeout: self.timeout,
            observer: self.observer.clone(),
            request_id: AtomicU64::new(0),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}
