//! RPC request and response types.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use super::{Address, SignedTransaction, TxHash};
use crate::error::RpcError;

// ============================================================================
// Query results
// ============================================================================

/// Account snapshot returned by `fetch-balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The account.
    pub address: Address,
    /// Total ever received.
    #[serde(with = "decimal")]
    pub received: BigInt,
    /// Total ever spent.
    #[serde(with = "decimal")]
    pub spent: BigInt,
    /// Number of incoming transactions.
    #[serde(default)]
    pub count_received: u64,
    /// Number of outgoing transactions.
    #[serde(default)]
    pub count_spent: u64,
    /// Block of the latest change to this account.
    #[serde(default)]
    pub block_number: u64,
    /// Chain height when the snapshot was taken.
    #[serde(default, rename = "currentBlock")]
    pub current_block: u64,
}

/// One ledger entry, as returned by `fetch-history` and `get-tx`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Amount transferred.
    #[serde(with = "decimal")]
    pub value: BigInt,
    /// Hash of the transaction.
    #[serde(rename = "transaction")]
    pub hash: TxHash,
    /// Unix timestamp of the including block.
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// Block that included the transaction.
    #[serde(default, rename = "blockNumber")]
    pub block_number: Option<u64>,
    /// Fee paid by the sender.
    #[serde(default, with = "decimal::option")]
    pub fee: Option<BigInt>,
    /// Sender nonce.
    #[serde(default, with = "decimal::option")]
    pub nonce: Option<BigInt>,
    /// Attached payload.
    #[serde_as(as = "Option<Hex>")]
    pub data: Option<Vec<u8>>,
}

/// `get-tx` answers either with the record itself or wrapped in a
/// `transaction` member.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionResult {
    Wrapped { transaction: HistoryRecord },
    Bare(HistoryRecord),
}

impl TransactionResult {
    pub(crate) fn into_record(self) -> HistoryRecord {
        match self {
            TransactionResult::Wrapped { transaction } => transaction,
            TransactionResult::Bare(record) => record,
        }
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Parameters of an `mhc_send` request.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendTxParams {
    /// Recipient, `0x`-prefixed.
    pub to: String,
    /// Decimal value.
    pub value: String,
    /// Decimal fee.
    pub fee: String,
    /// Decimal nonce.
    pub nonce: String,
    /// Hex payload, empty when absent.
    #[serde_as(as = "Hex")]
    pub data: Vec<u8>,
    /// Hex DER public key of the signer.
    pub pubkey: String,
    /// Hex DER signature.
    pub sign: String,
}

impl From<&SignedTransaction> for SendTxParams {
    fn from(signed: &SignedTransaction) -> Self {
        let tx = signed.transaction();
        Self {
            to: tx.to.to_string(),
            value: tx.value.to_string(),
            fee: tx.fee.to_string(),
            nonce: tx.nonce.to_string(),
            data: tx.data.clone(),
            pubkey: signed.public_key().to_hex(),
            sign: signed.signature().to_hex(),
        }
    }
}

/// Response to an `mhc_send` request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendTxResponse {
    #[serde(default)]
    pub result: String,
    /// Transaction hash on success.
    #[serde(default)]
    pub params: String,
    /// Server error text; a string in practice, anything in theory.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl SendTxResponse {
    /// Accepted only when there is no error, `result` is `"ok"` and a hash
    /// came back in `params`.
    pub fn into_tx_hash(self) -> Result<TxHash, RpcError> {
        if let Some(message) = self.error.as_ref().and_then(error_message) {
            return Err(RpcError::Rejected { message });
        }
        if self.result != "ok" {
            return Err(RpcError::Rejected {
                message: format!("unexpected result '{}'", self.result),
            });
        }
        if self.params.is_empty() {
            return Err(RpcError::Rejected {
                message: "no transaction hash in response".to_string(),
            });
        }
        Ok(TxHash::new(self.params))
    }
}

/// Text of a server `error` member, or `None` if it is empty.
pub(crate) fn error_message(error: &serde_json::Value) -> Option<String> {
    match error {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => match map.get("message") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            _ => Some(error.to_string()),
        },
        other => Some(other.to_string()),
    }
}

// ============================================================================
// Big integer serde helpers
// ============================================================================

/// Big integers go out as decimal strings and come in as strings or numbers.
pub(crate) mod decimal {
    use num_bigint::BigInt;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigInt, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        parse(&value).map_err(D::Error::custom)
    }

    fn parse(value: &serde_json::Value) -> Result<BigInt, String> {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => return Err(format!("expected a decimal integer, got {}", other)),
        };
        text.trim()
            .parse()
            .map_err(|_| format!("'{}' is not a decimal integer", text))
    }

    pub mod option {
        use num_bigint::BigInt;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<BigInt>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => s.serialize_str(&value.to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigInt>, D::Error> {
            match serde_json::Value::deserialize(d)? {
                serde_json::Value::Null => Ok(None),
                value => super::parse(&value).map(Some).map_err(D::Error::custom),
            }
        }
    }
}
