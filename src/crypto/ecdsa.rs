//! secp256k1 ECDSA
//!
//! Key generation and signing for the ECDSA side of the signature
//! workbench. Signatures are RFC6979 deterministic and low-S normalized,
//! reported both as 64-byte compact `r || s` and as DER.

use super::provider::KeyMaterial;
use super::{message_digest, parse_secret_key, random_secret_key, CryptoError};
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

/// ECDSA signature in both encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// Compact r,s (64 bytes)
    pub compact: [u8; 64],
    /// DER encoded
    pub der: Vec<u8>,
}

/// secp256k1 ECDSA signer
pub struct EcdsaSigner {
    secp: Secp256k1<All>,
}

impl Default for EcdsaSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl EcdsaSigner {
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

    /// Derive compressed and uncompressed public keys from a private key
    pub fn public_key(&self, private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
        let secret_key = parse_secret_key(private_key)?;
        Ok(self.key_material(&secret_key))
    }

    fn key_material(&self, secret_key: &SecretKey) -> KeyMaterial {
        let pk = PublicKey::from_secret_key(&self.secp, secret_key);

        KeyMaterial::new(
            secret_key.secret_bytes().to_vec(),
            pk.serialize().to_vec(),
            pk.serialize_uncompressed().to_vec(),
        )
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<EcdsaSignature, CryptoError> {
        let sk = parse_secret_key(private_key)?;
        let msg = Message::from_digest(message_digest(message));

        let sig = self.secp.sign_ecdsa(&msg, &sk);

        Ok(EcdsaSignature {
            compact: sig.serialize_compact(),
            der: sig.serialize_der().to_vec(),
        })
    }
}

#[cfg(test)]
impl EcdsaSigner {
    /// Verify a compact signature against a compressed or uncompressed key
    pub(crate) fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, CryptoError> {
        if signature.len() != 64 {
            return Err(CryptoError::SigningFailed(
                format!("Signature must be 64 bytes, got {}", signature.len())
            ));
        }

        let pk = PublicKey::from_slice(public_key)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        let sig = bitcoin::secp256k1::ecdsa::Signature::from_compact(signature)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let msg = Message::from_digest(message_digest(message));

        Ok(self.secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
    }
}
