//! Cryptographic primitives for the workbench
//!
//! This module provides the black-box operations the components call into:
//! - ECDSA key generation and signing (compact + DER output)
//! - BIP-340 Schnorr key generation and signing
//! - Taproot output tweaking for Bitcoin and Liquid (elements) tag families
//! - The `CryptoProvider` seam that components are written against

pub mod ecdsa;
pub mod provider;
pub mod schnorr;
pub mod taproot;

pub use ecdsa::{EcdsaSignature, EcdsaSigner};
pub use provider::{CryptoProvider, KeyMaterial, Secp256k1Provider};
pub use schnorr::{tagged_hash, SchnorrSigner};
pub use taproot::{TapLeaf, TaprootError, TaprootOutput, TaprootTweaker};

use bitcoin::secp256k1::SecretKey;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

/// Errors raised by the key and signature primitives
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptoError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}

/// Reduce an arbitrary message to the 32-byte digest that gets signed.
///
/// Messages that are already 32 bytes are treated as a digest and signed
/// as-is; anything else is SHA-256 hashed first.
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    if message.len() == 32 {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(message);
        arr
    } else {
        let mut hasher = Sha256::new();
        hasher.update(message);
        hasher.finalize().into()
    }
}

/// Draw a fresh secret key from the operating system RNG
pub fn random_secret_key() -> SecretKey {
    let mut rng = OsRng;
    loop {
        let mut secret_bytes = [0u8; 32];
        rng.fill_bytes(&mut secret_bytes);
        let parsed = SecretKey::from_slice(&secret_bytes);
        secret_bytes.zeroize();
        // Out-of-range scalars are astronomically rare; just draw again.
        if let Ok(secret_key) = parsed {
            return secret_key;
        }
    }
}

/// Parse a 32-byte secret scalar
pub(crate) fn parse_secret_key(private_key: &[u8]) -> Result<SecretKey, CryptoError> {
    if private_key.len() != 32 {
        return Err(CryptoError::InvalidPrivateKey(
            format!("Private key must be 32 bytes, got {}", private_key.len())
        ));
    }
    SecretKey::from_slice(private_key)
        .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
}
