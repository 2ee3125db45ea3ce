//! Cryptographic key types for MetaHash.
//!
//! Keys live on NIST P-256 (secp256r1). Everything is exchanged as hex-encoded
//! DER: SEC1 `ECPrivateKey` for secret keys, `SubjectPublicKeyInfo` for public
//! keys and `SEQUENCE { r, s }` for signatures.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use p256::ecdsa::signature::{DigestVerifier, RandomizedDigestSigner};
use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::NistP256;
use p256::pkcs8::{AssociatedOid, DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rand::rngs::OsRng;
use sec1::der::Encode;
use sec1::{EcParameters, EcPrivateKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{ParseKeyError, SignatureError, SignerError};

fn decode_hex_key(s: &str) -> Result<Vec<u8>, ParseKeyError> {
    hex::decode(s).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))
}

/// P-256 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(p256::PublicKey);

impl PublicKey {
    /// Decode a hex-encoded `SubjectPublicKeyInfo`.
    pub fn from_hex(s: &str) -> Result<Self, ParseKeyError> {
        let der = decode_hex_key(s)?;
        Self::from_der(&der)
    }

    /// Decode a DER `SubjectPublicKeyInfo`.
    pub fn from_der(der: &[u8]) -> Result<Self, ParseKeyError> {
        p256::PublicKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| ParseKeyError::InvalidDer(e.to_string()))
    }

    /// DER `SubjectPublicKeyInfo` bytes.
    pub fn to_der(&self) -> Vec<u8> {
        self.0
            .to_public_key_der()
            .expect("P-256 public key encoding should never fail")
            .as_bytes()
            .to_vec()
    }

    /// Hex-encoded `SubjectPublicKeyInfo`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_der())
    }

    /// Uncompressed SEC1 point (`0x04 || x || y`, 65 bytes).
    pub fn to_uncompressed_point(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Verify `signature` over `payload`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match,
    /// and an error only when the signature bytes are not valid DER.
    pub fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SignatureError> {
        let signature = signature.to_ecdsa()?;
        let verifying_key = VerifyingKey::from(&self.0);
        Ok(verifying_key
            .verify_digest(Sha256::new_with_prefix(payload), &signature)
            .is_ok())
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// P-256 secret key.
#[derive(Clone)]
pub struct SecretKey(p256::SecretKey);

impl SecretKey {
    /// Generate a new random key from the OS random source.
    pub fn generate() -> Self {
        Self(p256::SecretKey::random(&mut OsRng))
    }

    /// Decode a hex-encoded SEC1 `ECPrivateKey`.
    ///
    /// PKCS#8 `PrivateKeyInfo` is accepted as well, since some tooling exports
    /// P-256 keys that way.
    pub fn from_hex(s: &str) -> Result<Self, ParseKeyError> {
        let der = decode_hex_key(s)?;
        Self::from_der(&der)
    }

    /// Decode a DER SEC1 `ECPrivateKey` (or PKCS#8 `PrivateKeyInfo`).
    pub fn from_der(der: &[u8]) -> Result<Self, ParseKeyError> {
        match p256::SecretKey::from_sec1_der(der) {
            Ok(key) => Ok(Self(key)),
            Err(sec1_err) => p256::SecretKey::from_pkcs8_der(der)
                .map(Self)
                .map_err(|_| ParseKeyError::InvalidDer(sec1_err.to_string())),
        }
    }

    /// DER SEC1 `ECPrivateKey` bytes, including the curve OID and public key.
    ///
    /// This is the layout of Go's `x509.MarshalECPrivateKey`; the `[0]`
    /// namedCurve parameters are always present.
    pub fn to_der(&self) -> Vec<u8> {
        let private_key = self.0.to_bytes();
        let public_key = self.0.public_key().to_encoded_point(false);
        EcPrivateKey {
            private_key: private_key.as_slice(),
            parameters: Some(EcParameters::NamedCurve(NistP256::OID)),
            public_key: Some(public_key.as_bytes()),
        }
        .to_der()
        .expect("P-256 secret key encoding should never fail")
    }

    /// Hex-encoded SEC1 `ECPrivateKey`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_der())
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    /// Sign a payload: SHA-256 digest, ECDSA with fresh randomness.
    pub fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError> {
        let signing_key = SigningKey::from(&self.0);
        let signature: p256::ecdsa::Signature = signing_key
            .try_sign_digest_with_rng(&mut OsRng, Sha256::new_with_prefix(payload))
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        Ok(Signature(signature.to_der().as_bytes().to_vec()))
    }
}

impl FromStr for SecretKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Detached DER-encoded ECDSA signature.
///
/// Parsing from a string checks both the hex and the DER structure;
/// [`Signature::from_der_bytes`] defers the DER check to verification.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw DER bytes without validating them.
    pub fn from_der_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw DER bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex-encoded DER.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Verify this signature against a payload and public key.
    pub fn verify(&self, payload: &[u8], public_key: &PublicKey) -> Result<bool, SignatureError> {
        public_key.verify(payload, self)
    }

    fn to_ecdsa(&self) -> Result<p256::ecdsa::Signature, SignatureError> {
        p256::ecdsa::Signature::from_der(&self.0)
            .map_err(|e| SignatureError::InvalidDer(e.to_string()))
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| SignatureError::InvalidHex(e.to_string()))?;
        let signature = Self(bytes);
        signature.to_ecdsa()?;
        Ok(signature)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// KeyPair
// ============================================================================

/// A secret key bundled with its public key.
///
/// Key material is fixed at construction; there is no way to swap it out
/// afterwards.
///
/// # Example
///
/// ```rust
/// use metahash_kit::KeyPair;
///
/// let keypair = KeyPair::generate();
/// let signature = keypair.sign(b"payload").unwrap();
/// assert!(keypair.verify(b"payload", &signature).unwrap());
///
/// let restored = KeyPair::import_private(&keypair.export_private()).unwrap();
/// assert_eq!(restored.export_private(), keypair.export_private());
/// ```
#[derive(Clone)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a random key pair.
    pub fn generate() -> Self {
        Self::from_secret_key(SecretKey::generate())
    }

    /// Create a key pair from an existing secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            secret_key,
            public_key,
        }
    }

    /// Import a hex-encoded DER private key.
    pub fn import_private(hex: &str) -> Result<Self, ParseKeyError> {
        SecretKey::from_hex(hex).map(Self::from_secret_key)
    }

    /// Export the private key as hex-encoded SEC1 DER.
    pub fn export_private(&self) -> String {
        self.secret_key.to_hex()
    }

    /// Export the public key as hex-encoded `SubjectPublicKeyInfo`.
    pub fn export_public(&self) -> String {
        self.public_key.to_hex()
    }

    /// The secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// The public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Sign a payload.
    pub fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError> {
        self.secret_key.sign(payload)
    }

    /// Verify a signature against this pair's public key.
    pub fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SignatureError> {
        self.public_key.verify(payload, signature)
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"***")
            .finish()
    }
}
