//! Account addresses.
//!
//! An address is a hex string behind a `0x` marker. The first byte is the
//! network version (`0x00` today). Addresses are derived from public keys by
//! an [`AddressDerivation`]; [`MetahashAddress`] implements the current rule.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ParseAddressError;

use super::PublicKey;

/// Display marker in front of the hex body.
pub const ADDRESS_PREFIX: &str = "0x";

/// Network account identifier.
///
/// Parsing accepts the body with or without the `0x` marker; display always
/// includes it.
///
/// ```
/// use metahash_kit::Address;
///
/// let address: Address = "0x009806da73b1589f38630649bdee48467946d118059efd6aab".parse().unwrap();
/// assert_eq!(address.as_bytes()[0], 0x00);
/// assert_eq!(address.to_string(), "0x009806da73b1589f38630649bdee48467946d118059efd6aab");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address(Vec<u8>);

impl Address {
    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ParseAddressError> {
        if bytes.is_empty() {
            return Err(ParseAddressError::Empty);
        }
        Ok(Self(bytes))
    }

    /// The raw address bytes (the hex body, decoded).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The network version byte.
    pub fn version(&self) -> u8 {
        self.0[0]
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix(ADDRESS_PREFIX).unwrap_or(s);
        if body.is_empty() {
            return Err(ParseAddressError::Empty);
        }
        let bytes = hex::decode(body).map_err(|_| ParseAddressError::InvalidHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ADDRESS_PREFIX, hex::encode(&self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Rule mapping a public key to its address.
pub trait AddressDerivation: Send + Sync {
    /// Derive the address of `public_key`.
    fn derive(&self, public_key: &PublicKey) -> Address;
}

impl<F> AddressDerivation for F
where
    F: Fn(&PublicKey) -> Address + Send + Sync,
{
    fn derive(&self, public_key: &PublicKey) -> Address {
        self(public_key)
    }
}

/// Version-0 MetaHash addresses.
///
/// `0x00 || RIPEMD160(SHA256(point))` over the uncompressed public point,
/// followed by the first four bytes of a double SHA-256 of those 21 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetahashAddress;

impl MetahashAddress {
    /// Network version byte written in front of the key hash.
    pub const VERSION: u8 = 0x00;
}

impl AddressDerivation for MetahashAddress {
    fn derive(&self, public_key: &PublicKey) -> Address {
        let key_hash = Ripemd160::digest(Sha256::digest(public_key.to_uncompressed_point()));

        let mut bytes = Vec::with_capacity(25);
        bytes.push(Self::VERSION);
        bytes.extend_from_slice(&key_hash);

        let checksum = Sha256::digest(Sha256::digest(&bytes));
        bytes.extend_from_slice(&checksum[..4]);
        Address(bytes)
    }
}
