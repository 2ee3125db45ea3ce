//! Verifier and signer capabilities.
//!
//! Verification needs only a public key, signing needs the private one. The
//! two are split into traits so a handle that can only verify never carries
//! private material:
//!
//! - [`Verifier`] - public key, signature checks, address
//! - [`Signer`] - everything a `Verifier` does, plus signing and private export
//!
//! [`PublicKey`] implements `Verifier`; [`KeyPair`] implements both.
//!
//! # Example
//!
//! ```rust
//! use metahash_kit::{KeyPair, Signer, Verifier};
//!
//! let keypair = KeyPair::generate();
//! let signature = Signer::sign(&keypair, b"payload").unwrap();
//!
//! let public = keypair.public_key().clone();
//! assert!(Verifier::verify(&public, b"payload", &signature).unwrap());
//! assert_eq!(public.address(), keypair.address());
//! ```

use std::sync::Arc;

use crate::error::{SignatureError, SignerError};
use crate::types::{
    Address, AddressDerivation, KeyPair, MetahashAddress, PublicKey, Signature,
};

// ============================================================================
// Verifier Trait
// ============================================================================

/// Anything that holds a public key and can check signatures made with the
/// matching private key.
pub trait Verifier: Send + Sync {
    /// The public key.
    fn public_key(&self) -> &PublicKey;

    /// Check `signature` over `payload`.
    ///
    /// `Ok(false)` means the signature decoded but does not match.
    fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SignatureError> {
        self.public_key().verify(payload, signature)
    }

    /// Hex DER (SubjectPublicKeyInfo) encoding of the public key.
    fn export_public(&self) -> String {
        self.public_key().to_hex()
    }

    /// Address under the current network rule.
    fn address(&self) -> Address {
        self.address_with(&MetahashAddress)
    }

    /// Address under a caller-supplied derivation rule.
    fn address_with(&self, derivation: &dyn AddressDerivation) -> Address {
        derivation.derive(self.public_key())
    }
}

/// Trait for signing transaction payloads.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use metahash_kit::{PublicKey, SecretKey, Signature, Signer, Verifier, SignerError};
///
/// struct HsmSigner {
///     public_key: PublicKey,
///     // handle to the device
/// }
///
/// impl Verifier for HsmSigner {
///     fn public_key(&self) -> &PublicKey {
///         &self.public_key
///     }
/// }
///
/// impl Signer for HsmSigner {
///     fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError> {
///         // ask the device
///     }
///
///     fn export_private(&self) -> Option<String> {
///         None
///     }
/// }
/// ```
pub trait Signer: Verifier {
    /// Sign `payload` (SHA-256, then ECDSA P-256 with fresh randomness).
    fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError>;

    /// Hex DER private key, if the signer is willing to reveal it.
    fn export_private(&self) -> Option<String>;
}

// ============================================================================
// Implementations
// ============================================================================

impl Verifier for PublicKey {
    fn public_key(&self) -> &PublicKey {
        self
    }
}

impl Verifier for KeyPair {
    fn public_key(&self) -> &PublicKey {
        KeyPair::public_key(self)
    }
}

impl Signer for KeyPair {
    fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError> {
        KeyPair::sign(self, payload)
    }

    fn export_private(&self) -> Option<String> {
        Some(KeyPair::export_private(self))
    }
}

/// Implement `Verifier` for `Arc<dyn Signer>` for convenience.
impl Verifier for Arc<dyn Signer> {
    fn public_key(&self) -> &PublicKey {
        (**self).public_key()
    }

    fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SignatureError> {
        (**self).verify(payload, signature)
    }
}

/// Implement `Signer` for `Arc<dyn Signer>` for convenience.
impl Signer for Arc<dyn Signer> {
    fn sign(&self, payload: &[u8]) -> Result<Signature, SignerError> {
        (**self).sign(payload)
    }

    fn export_private(&self) -> Option<String> {
        (**self).export_private()
    }
}
