//! Integration tests for keys, addresses and offline signing.
//!
//! Everything here runs without a node.

use std::sync::Arc;

use metahash_kit::codec::{Buffer, decode_integer, encode_integer};
use metahash_kit::*;
use num_bigint::BigInt;

use crate::common::{RECIPIENT, TEST_ADDRESS, TEST_PRIVATE_KEY};

const TEST_PUBLIC_KEY: &str = "3059301306072a8648ce3d020106082a8648ce3d03010703420004d08b01f54ed31f085ac27718c37dd12d5f17a8ccfbb26f2a973122356a66f2087eb0d9464cebe701ca640258083fe9f6516290a5f06750772b661113ca60f495";

// =============================================================================
// Known key vector
// =============================================================================

#[test]
fn test_known_key_vector() {
    let keypair = KeyPair::import_private(TEST_PRIVATE_KEY).unwrap();

    assert_eq!(keypair.export_private(), TEST_PRIVATE_KEY);
    assert_eq!(keypair.export_public(), TEST_PUBLIC_KEY);
    assert_eq!(keypair.address().to_string(), TEST_ADDRESS);

    let public: PublicKey = TEST_PUBLIC_KEY.parse().unwrap();
    assert_eq!(public.address(), keypair.address());
}

#[test]
fn test_generated_keys_round_trip() {
    let keypair = KeyPair::generate();
    let restored = KeyPair::import_private(&keypair.export_private()).unwrap();

    assert_eq!(restored.export_private(), keypair.export_private());
    assert_eq!(restored.export_public(), keypair.export_public());
    assert_eq!(restored.address(), keypair.address());
    assert_eq!(keypair.address().version(), MetahashAddress::VERSION);
    assert_eq!(keypair.address().as_bytes().len(), 25);
}

// =============================================================================
// Capability split
// =============================================================================

#[test]
fn test_public_only_handle_verifies() {
    let keypair = KeyPair::import_private(TEST_PRIVATE_KEY).unwrap();
    let signature = Signer::sign(&keypair, b"transfer").unwrap();

    let verifier: Arc<dyn Verifier> = Arc::new(keypair.public_key().clone());
    assert!(verifier.verify(b"transfer", &signature).unwrap());
    assert!(!verifier.verify(b"transfer!", &signature).unwrap());
    assert_eq!(verifier.address().to_string(), TEST_ADDRESS);
}

#[test]
fn test_malformed_signature_is_an_error() {
    let keypair = KeyPair::generate();

    assert!(matches!(
        "not hex".parse::<Signature>(),
        Err(error::SignatureError::InvalidHex(_))
    ));
    assert!(matches!(
        "3006020101020101ff".parse::<Signature>(),
        Err(error::SignatureError::InvalidDer(_))
    ));

    // A well-formed signature from another key verifies as false, not as an error
    let other = KeyPair::generate().sign(b"payload").unwrap();
    assert!(!keypair.verify(b"payload", &other).unwrap());
}

// =============================================================================
// Offline signing
// =============================================================================

#[test]
fn test_offline_sign_then_submit_shape() {
    let keypair = KeyPair::import_private(TEST_PRIVATE_KEY).unwrap();
    let to: Address = RECIPIENT.parse().unwrap();

    let tx = Transaction::new(to, 126894, 55647, 255);
    assert_eq!(
        hex::encode(tx.canonical_payload(ProtocolVersion::V1).unwrap()),
        "009806da73b1589f38630649bdee48467946d118059efd6aabfbaeef0100fa5fd9faff0000"
    );

    let signed = tx.sign(&keypair, ProtocolVersion::V1).unwrap();
    assert!(signed.verify().unwrap());

    let params = SendTxParams::from(&signed);
    assert_eq!(params.to, RECIPIENT);
    assert_eq!(params.pubkey, TEST_PUBLIC_KEY);
    assert_eq!(params.sign, signed.signature().to_string());
}

#[test]
fn test_signing_is_randomized() {
    let keypair = KeyPair::generate();
    let tx = Transaction::new(RECIPIENT.parse().unwrap(), 1, 1, 1);

    let first = tx.clone().sign(&keypair, ProtocolVersion::V1).unwrap();
    let second = tx.sign(&keypair, ProtocolVersion::V1).unwrap();
    assert_ne!(first.signature(), second.signature());
    assert!(first.verify().unwrap());
    assert!(second.verify().unwrap());
}

#[test]
fn test_concurrent_signing() {
    let keypair = Arc::new(KeyPair::generate());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let keypair = keypair.clone();
            std::thread::spawn(move || {
                let payload = format!("payload {}", i);
                let signature = keypair.sign(payload.as_bytes()).unwrap();
                keypair.verify(payload.as_bytes(), &signature).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

// =============================================================================
// Codec through the public API
// =============================================================================

#[test]
fn test_codec_public_api() {
    let mut buffer = Buffer::new();
    buffer.append_hex(&RECIPIENT[2..]).unwrap();
    buffer.append_integer(&BigInt::from(126894)).unwrap();
    buffer.append_integer(&BigInt::from(55647)).unwrap();
    buffer.append_integer(&BigInt::from(255)).unwrap();
    buffer.append_bytes(&[]);

    let tx = Transaction::new(RECIPIENT.parse().unwrap(), 126894, 55647, 255);
    assert_eq!(
        buffer.data(),
        tx.canonical_payload(ProtocolVersion::V1).unwrap().as_slice()
    );

    let encoded = encode_integer(&BigInt::from(4294967296u64)).unwrap();
    assert_eq!(decode_integer(&encoded).unwrap(), (BigInt::from(4294967296u64), 9));
}
