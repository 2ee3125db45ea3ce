//! The main Metahash client.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::types::{
    Address, KeyPair, Network, NetworkConfig, ProtocolVersion, PublicKey, SendTxParams,
    SignedTransaction, Transaction, TxHash,
};

use super::observer::{NoopObserver, TransportObserver};
use super::query::{BalanceQuery, HistoryQuery, TransactionQuery};
use super::resolver::{DnsResolver, Endpoints, HostResolver};
use super::rpc::{DEFAULT_TIMEOUT, RpcClient};
use super::signer::{Signer, Verifier};

/// The main client for the MetaHash network.
///
/// This is the single entry point for all operations. Reads go to the
/// `tor` nodes and need no key; submissions go to the `proxy` nodes and need
/// a signer.
///
/// # Example
///
/// ```rust,no_run
/// use metahash_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let client = Metahash::dev()
///         .private_key("30770201010420e546b527f59adca85be22aef5ffccabe72c0f374b1bd01dbd91f0d74a773cca4a00a06082a8648ce3d030107a14403420004d08b01f54ed31f085ac27718c37dd12d5f17a8ccfbb26f2a973122356a66f2087eb0d9464cebe701ca640258083fe9f6516290a5f06750772b661113ca60f495")?
///         .build();
///
///     let to: Address = "0x009806da73b1589f38630649bdee48467946d118059efd6aab".parse()?;
///     let hash = client.submit(Transaction::new(to, 126894, 55647, 255)).await?;
///     println!("Submitted: {}", hash);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Metahash {
    rpc: Arc<RpcClient>,
    signer: Option<Arc<dyn Signer>>,
    protocol_version: ProtocolVersion,
}

impl Metahash {
    /// Create a builder for the development network.
    pub fn dev() -> MetahashBuilder {
        MetahashBuilder::new(Network::Dev)
    }

    /// Create a builder for the production network.
    pub fn prod() -> MetahashBuilder {
        MetahashBuilder::new(Network::Prod)
    }

    /// Create a builder for `network`.
    pub fn builder(network: Network) -> MetahashBuilder {
        MetahashBuilder::new(network)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `METAHASH_NETWORK` (optional): `"dev"` or `"prod"`. Defaults to `"dev"`.
    /// - `METAHASH_PRIVATE_KEY` (optional): hex DER private key for signing.
    ///
    /// Without a private key the client is read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if `METAHASH_NETWORK` names an unknown network or
    /// `METAHASH_PRIVATE_KEY` is not a valid key.
    pub fn from_env() -> Result<Metahash, Error> {
        let network = std::env::var("METAHASH_NETWORK").ok();
        let private_key = std::env::var("METAHASH_PRIVATE_KEY").ok();

        let network = match network.as_deref() {
            Some(name) => name.parse::<Network>().map_err(Error::Config)?,
            None => Network::Dev,
        };

        let mut builder = Metahash::builder(network);
        if let Some(key) = private_key {
            builder = builder.private_key(key.trim())?;
        }

        Ok(builder.build())
    }

    /// Get the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the network this client talks to.
    pub fn network(&self) -> Network {
        self.rpc.endpoints().config().network
    }

    /// The protocol version transactions are signed under.
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// The signer's public key, if a signer is configured.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.signer.as_ref().map(|s| s.public_key())
    }

    /// The signer's address, if a signer is configured.
    pub fn address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    // ========================================================================
    // Read Operations (Query Builders)
    // ========================================================================

    /// Get an account snapshot.
    pub fn balance(&self, address: &Address) -> BalanceQuery {
        BalanceQuery::new(self.rpc.clone(), address.clone())
    }

    /// Get an account's ledger entries.
    pub fn history(&self, address: &Address) -> HistoryQuery {
        HistoryQuery::new(self.rpc.clone(), address.clone())
    }

    /// Get a single transaction by hash.
    pub fn transaction(&self, hash: &TxHash) -> TransactionQuery {
        TransactionQuery::new(self.rpc.clone(), hash.clone())
    }

    // ========================================================================
    // Write Operations
    // ========================================================================

    /// Sign `tx` with the configured signer, without sending it.
    pub fn sign(&self, tx: Transaction) -> Result<SignedTransaction, Error> {
        let signer = self.signer.as_ref().ok_or(Error::NoSigner)?;
        tx.sign(signer.as_ref(), self.protocol_version)
    }

    /// Sign `tx` and submit it.
    ///
    /// A rejection from the network is returned as
    /// [`RpcError::Rejected`](crate::RpcError::Rejected) and never retried.
    pub async fn submit(&self, tx: Transaction) -> Result<TxHash, Error> {
        let signed = self.sign(tx)?;
        self.send_signed(&signed).await
    }

    /// Submit an already signed transaction.
    pub async fn send_signed(&self, signed: &SignedTransaction) -> Result<TxHash, Error> {
        let params = SendTxParams::from(signed);
        Ok(self.rpc.submit(&params).await?)
    }

    /// Fund `address` from the development faucet.
    ///
    /// Fails with [`RpcError::UnsupportedMethod`](crate::RpcError::UnsupportedMethod)
    /// on any network but [`Network::Dev`].
    pub async fn add_test_address(&self, address: &Address) -> Result<(), Error> {
        Ok(self.rpc.add_test_address(address).await?)
    }
}

impl std::fmt::Debug for Metahash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metahash")
            .field("rpc", &self.rpc)
            .field("address", &self.address())
            .field("protocol_version", &self.protocol_version)
            .finish()
    }
}

/// Builder for creating a [`Metahash`] client.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use metahash_kit::*;
///
/// // Read-only client against pinned nodes
/// let client = Metahash::dev()
///     .resolver(StaticResolver::new(["10.0.0.1", "10.0.0.2"]))
///     .timeout(Duration::from_secs(3))
///     .observer(TracingObserver)
///     .build();
///
/// // Client with a fresh key, signing under the older rules
/// let client = Metahash::prod()
///     .signer(KeyPair::generate())
///     .protocol_version(ProtocolVersion::V1Legacy)
///     .build();
/// ```
pub struct MetahashBuilder {
    config: NetworkConfig,
    resolver: Arc<dyn HostResolver>,
    signer: Option<Arc<dyn Signer>>,
    timeout: Duration,
    protocol_version: ProtocolVersion,
    observer: Arc<dyn TransportObserver>,
}

impl MetahashBuilder {
    fn new(network: Network) -> Self {
        Self {
            config: NetworkConfig::new(network),
            resolver: Arc::new(DnsResolver),
            signer: None,
            timeout: DEFAULT_TIMEOUT,
            protocol_version: ProtocolVersion::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Set the signer for transactions.
    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Set up signing from a hex DER private key.
    pub fn private_key(mut self, private_key: impl AsRef<str>) -> Result<Self, Error> {
        let keypair = KeyPair::import_private(private_key.as_ref())?;
        self.signer = Some(Arc::new(keypair));
        Ok(self)
    }

    /// Override the base DNS name the `tor.`/`proxy.` prefixes are joined to.
    pub fn base_host(mut self, base_host: impl Into<String>) -> Self {
        self.config.base_host = base_host.into();
        self
    }

    /// Override the port of the `tor` (query) nodes.
    pub fn tor_port(mut self, port: u16) -> Self {
        self.config.tor_port = port;
        self
    }

    /// Override the port of the `proxy` (submission) nodes.
    pub fn proxy_port(mut self, port: u16) -> Self {
        self.config.proxy_port = port;
        self
    }

    /// Resolve node addresses with `resolver` instead of the system DNS.
    pub fn resolver(mut self, resolver: impl HostResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the signing rules.
    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    /// Report ladder events to `observer`.
    pub fn observer(mut self, observer: impl TransportObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Build the client.
    pub fn build(self) -> Metahash {
        let endpoints = Endpoints::new(self.config, self.resolver);
        Metahash {
            rpc: Arc::new(RpcClient::with_options(
                endpoints,
                self.timeout,
                self.observer,
            )),
            signer: self.signer,
            protocol_version: self.protocol_version,
        }
    }
}

impl From<MetahashBuilder> for Metahash {
    fn from(builder: MetahashBuilder) -> Self {
        builder.build()
    }
}
