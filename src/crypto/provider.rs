//! Crypto Provider Seam
//!
//! Components never call the curve code directly; they go through a
//! `CryptoProvider`. `Secp256k1Provider` binds to the real primitives in
//! this crate, tests bind to deterministic stubs.

use super::ecdsa::{EcdsaSignature, EcdsaSigner};
use super::schnorr::SchnorrSigner;
use super::taproot::{TapLeaf, TaprootError, TaprootOutput, TaprootTweaker};
use super::CryptoError;
use crate::types::TaprootVersion;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw key pair bytes as returned by the key primitives
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    private_key: Vec<u8>,
    public_key: Vec<u8>,
    uncompressed_public_key: Vec<u8>,
}

impl KeyMaterial {
    pub fn new(private_key: Vec<u8>, public_key: Vec<u8>, uncompressed_public_key: Vec<u8>) -> Self {
        Self {
            private_key,
            public_key,
            uncompressed_public_key,
        }
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn uncompressed_public_key(&self) -> &[u8] {
        &self.uncompressed_public_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &hex::encode(&self.public_key))
            .field("uncompressed_public_key", &hex::encode(&self.uncompressed_public_key))
            .finish()
    }
}

/// The external script/crypto library, one method per primitive
pub trait CryptoProvider {
    /// Tweak `inner_key` with a tree built from `leaf_scripts`, all tagged
    /// with `leaf_version`, in the hashing domain selected by `version`.
    fn tap_root(
        &self,
        inner_key: &[u8],
        leaf_scripts: &[Vec<u8>],
        leaf_version: u8,
        version: TaprootVersion,
    ) -> Result<TaprootOutput, TaprootError>;

    fn generate_ecdsa_keypair(&self) -> Result<KeyMaterial, CryptoError>;

    fn ecdsa_public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError>;

    fn ecdsa_sign(&self, message: &[u8], private_key: &[u8]) -> Result<EcdsaSignature, CryptoError>;

    fn generate_schnorr_keypair(&self) -> Result<KeyMaterial, CryptoError>;

    fn schnorr_public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError>;

    fn schnorr_sign(&self, message: &[u8], private_key: &[u8]) -> Result<[u8; 64], CryptoError>;
}

/// Production provider backed by libsecp256k1
#[derive(Default)]
pub struct Secp256k1Provider {
    ecdsa: EcdsaSigner,
    schnorr: SchnorrSigner,
    tweaker: TaprootTweaker,
}

impl Secp256k1Provider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CryptoProvider for Secp256k1Provider {
    fn tap_root(
        &self,
        inner_key: &[u8],
        leaf_scripts: &[Vec<u8>],
        leaf_version: u8,
        version: TaprootVersion,
    ) -> Result<TaprootOutput, TaprootError> {
        let leaves = leaf_scripts
            .iter()
            .map(|script| TapLeaf::new(leaf_version, script.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        self.tweaker.tap_root(inner_key, &leaves, version)
    }

    fn generate_ecdsa_keypair(&self) -> Result<KeyMaterial, CryptoError> {
        Ok(self.ecdsa.generate_keypair())
    }

    fn ecdsa_public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
        self.ecdsa.public_key(private_key)
    }

    fn ecdsa_sign(&self, message: &[u8], private_key: &[u8]) -> Result<EcdsaSignature, CryptoError> {
        self.ecdsa.sign(message, private_key)
    }

    fn generate_schnorr_keypair(&self) -> Result<KeyMaterial, CryptoError> {
        Ok(self.schnorr.generate_keypair())
    }

    fn schnorr_public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
        self.schnorr.public_key(private_key)
    }

    fn schnorr_sign(&self, message: &[u8], private_key: &[u8]) -> Result<[u8; 64], CryptoError> {
        self.schnorr.sign(message, private_key)
    }
}
