//! Transaction types and the signing protocol.
//!
//! The signed payload is the codec encoding of, in order: the recipient
//! address bytes, value, fee, nonce and data. Which fee and data go into that
//! payload depends on the [`ProtocolVersion`].

use std::fmt::{self, Display};

use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::client::Signer;
use crate::error::Error;

use super::codec::Buffer;
use super::{Address, PublicKey, Signature};

/// Signing rules understood by the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ProtocolVersion {
    /// Signs the transaction's fee and data.
    #[default]
    V1,
    /// Earlier rules: the fee slot is signed as zero and data as empty,
    /// whatever the transaction carries.
    V1Legacy,
}

impl ProtocolVersion {
    /// Returns true if the real fee is part of the signed payload.
    pub fn signs_fee(&self) -> bool {
        matches!(self, ProtocolVersion::V1)
    }

    /// Returns true if the real data is part of the signed payload.
    pub fn signs_data(&self) -> bool {
        matches!(self, ProtocolVersion::V1)
    }

    /// Version identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::V1 => "v1",
            ProtocolVersion::V1Legacy => "v1-legacy",
        }
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier the network assigns to an accepted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wrap a hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TxHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An unsigned value transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Recipient.
    pub to: Address,
    /// Amount transferred.
    pub value: BigInt,
    /// Fee offered.
    pub fee: BigInt,
    /// Sender nonce.
    pub nonce: BigInt,
    /// Optional payload; empty when absent.
    pub data: Vec<u8>,
}

impl Transaction {
    /// Create a transaction without data.
    pub fn new(
        to: Address,
        value: impl Into<BigInt>,
        fee: impl Into<BigInt>,
        nonce: impl Into<BigInt>,
    ) -> Self {
        Self {
            to,
            value: value.into(),
            fee: fee.into(),
            nonce: nonce.into(),
            data: Vec::new(),
        }
    }

    /// Attach a data payload.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// The bytes that get signed under `version`.
    ///
    /// Fails if value, fee or nonce is negative or wider than 512 bits.
    pub fn canonical_payload(&self, version: ProtocolVersion) -> Result<Vec<u8>, Error> {
        let zero = BigInt::zero();
        let fee = if version.signs_fee() { &self.fee } else { &zero };
        let data: &[u8] = if version.signs_data() { &self.data } else { &[] };

        let mut buffer = Buffer::new();
        buffer.append_bytes(self.to.as_bytes());
        buffer.append_integer(&self.value)?;
        buffer.append_integer(fee)?;
        buffer.append_integer(&self.nonce)?;
        buffer.append_bytes(data);
        Ok(buffer.into_data())
    }

    /// Sign this transaction.
    pub fn sign(
        self,
        signer: &dyn Signer,
        version: ProtocolVersion,
    ) -> Result<SignedTransaction, Error> {
        let payload = self.canonical_payload(version)?;
        let signature = signer.sign(&payload)?;
        Ok(SignedTransaction {
            transaction: self,
            public_key: signer.public_key().clone(),
            signature,
            version,
        })
    }
}

/// A transaction with its signature and the key that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    public_key: PublicKey,
    signature: Signature,
    version: ProtocolVersion,
}

impl SignedTransaction {
    /// The unsigned transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Public key of the signer.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The signature over the canonical payload.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Protocol version the signature was made under.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Re-encode the payload and check the signature against it.
    pub fn verify(&self) -> Result<bool, Error> {
        let payload = self.transaction.canonical_payload(self.version)?;
        Ok(self.public_key.verify(&payload, &self.signature)?)
    }
}
