//! BIP-340 Schnorr Signatures
//!
//! Key generation, public key derivation and signing for the Schnorr
//! side of the signature workbench, plus the tagged hash used by the
//! taproot primitive.
//!
//! - Tagged hashes for domain separation
//! - X-only public keys (32 bytes instead of 33)
//! - 64-byte signatures, no DER form
//!
//! Reference: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki

use super::provider::KeyMaterial;
use super::{message_digest, parse_secret_key, random_secret_key, CryptoError};
use bitcoin::secp256k1::{All, Keypair, Message, Secp256k1, SecretKey};

// MARK: - Tagged Hash Functions

/// BIP-340 tagged hash computation
///
/// tagged_hash(tag, msg) = SHA256(SHA256(tag) || SHA256(tag) || msg)
pub fn tagged_hash(tag: &str, msg: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let tag_hash = {
        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        hasher.finalize()
    };

    let mut hasher = Sha256::new();
    hasher.update(&tag_hash);
    hasher.update(&tag_hash);
    hasher.update(msg);

    hasher.finalize().into()
}

/// Taproot tags for both hashing domains
pub mod tags {
    pub const TAP_TWEAK: &str = "TapTweak";
    pub const TAP_LEAF: &str = "TapLeaf";
    pub const TAP_BRANCH: &str = "TapBranch";

    pub const TAP_TWEAK_ELEMENTS: &str = "TapTweak/elements";
    pub const TAP_LEAF_ELEMENTS: &str = "TapLeaf/elements";
    pub const TAP_BRANCH_ELEMENTS: &str = "TapBranch/elements";
}

// MARK: - Schnorr Signer

/// BIP-340 Schnorr signer
pub struct SchnorrSigner {
    secp: Secp256k1<All>,
}

impl Default for SchnorrSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl SchnorrSigner {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Generate a fresh random keypair
    pub fn generate_keypair(&self) -> KeyMaterial {
        let secret_key = random_secret_key();
        self.key_material(&secret_key)
    }

    /// Derive x-only and uncompressed public keys from a private key
    pub fn public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
        let secret_key = parse_secret_key(private_key)?;
        Ok(self.key_material(&secret_key))
    }

    fn key_material(&self, secret_key: &SecretKey) -> KeyMaterial {
        let keypair = Keypair::from_secret_key(&self.secp, secret_key);
        let (x_only_pubkey, _parity) = keypair.x_only_public_key();

        KeyMaterial::new(
            secret_key.secret_bytes().to_vec(),
            x_only_pubkey.serialize().to_vec(),
            keypair.public_key().serialize_uncompressed().to_vec(),
        )
    }

    /// Sign a message with BIP-340 Schnorr
    ///
    /// Uses deterministic nonce generation (no auxiliary randomness), so the
    /// same key and message always give the same signature.
    pub fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<[u8; 64], CryptoError> {
        let secret_key = parse_secret_key(private_key)?;
        let keypair = Keypair::from_secret_key(&self.secp, &secret_key);
        let msg = Message::from_digest(message_digest(message));

        let sig = self.secp.sign_schnorr_no_aux_rand(&msg, &keypair);
        let bytes: [u8; 64] = *sig.as_ref();

        Ok(bytes)
    }
}

#[cfg(test)]
impl SchnorrSigner {
    /// Verify a BIP-340 Schnorr signature against an x-only public key
    pub(crate) fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, CryptoError> {
        use bitcoin::secp256k1::{schnorr::Signature as SchnorrSignature, XOnlyPublicKey};

        let sig = SchnorrSignature::from_slice(signature)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let pubkey = XOnlyPublicKey::from_slice(public_key)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        let msg = Message::from_digest(message_digest(message));

        Ok(self.secp.verify_schnorr(&sig, &msg, &pubkey).is_ok())
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_hash_domains_differ() {
        let a = tagged_hash(tags::TAP_LEAF, b"abc");
        let b = tagged_hash(tags::TAP_LEAF_ELEMENTS, b"abc");
        assert_ne!(a, b);
        assert_eq!(a, tagged_hash("TapLeaf", b"abc"));
    }

    #[test]
    fn test_public_key_shapes() {
        let signer = SchnorrSigner::new();
        let keys = signer.public_key(&[42u8; 32]).unwrap();

        assert_eq!(keys.private_key().len(), 32);
        assert_eq!(keys.public_key().len(), 32);
        assert_eq!(keys.uncompressed_public_key().len(), 65);
        assert_eq!(keys.uncompressed_public_key()[0], 0x04);
        // x-only key is the x coordinate of the full point
        assert_eq!(keys.public_key(), &keys.uncompressed_public_key()[1..33]);
    }

    #[test]
    fn test_sign_is_deterministic_and_verifies() {
        let signer = SchnorrSigner::new();
        let keys = signer.public_key(&[7u8; 32]).unwrap();
        let message = [0xAB; 32];

        let sig1 = signer.sign(&message, keys.private_key()).unwrap();
        let sig2 = signer.sign(&message, keys.private_key()).unwrap();
        assert_eq!(sig1, sig2);

        assert!(signer.verify(&message, &sig1, keys.public_key()).unwrap());
        assert!(!signer.verify(&[0xAC; 32], &sig1, keys.public_key()).unwrap());
    }

    #[test]
    fn test_sign_rejects_invalid_key() {
        let signer = SchnorrSigner::new();
        assert!(matches!(
            signer.sign(&[1u8; 32], &[0u8; 32]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_generate_keypair() {
        let signer = SchnorrSigner::new();
        let a = signer.generate_keypair();
        let b = signer.generate_keypair();
        assert_ne!(a.private_key(), b.private_key());
        assert_eq!(a.public_key().len(), 32);
    }
}
