//! Signature Workbench
//!
//! Key generation/import and message signing for ECDSA and BIP-340
//! Schnorr. One algorithm is active at a time and switching it wipes all
//! key material and signatures, so keys are never carried across schemes.
//!
//! Failures from the key or signature primitives are kept as user-facing
//! error strings. Signing without a key is a caller error and returns
//! `ErrorCode::PreconditionFailed`.

use crate::crypto::{CryptoProvider, KeyMaterial, Secp256k1Provider};
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::utils::sanitize::{strip_whitespace, valid_hex};
use crate::{log_debug, log_warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Hex length of an importable private key (32 bytes)
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

const MODULE: &str = "signature";

// =============================================================================
// Types
// =============================================================================

/// Signature scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Ecdsa,
    Schnorr,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Ecdsa => write!(f, "ECDSA"),
            Algorithm::Schnorr => write!(f, "SCHNORR"),
        }
    }
}

/// Where the next key pair comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// Draw a fresh random key
    #[default]
    Generate,
    /// Derive from a typed private key
    Import,
}

/// Hex-encoded key pair owned by the workbench session
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    private_key: String,
    public_key: String,
    uncompressed_public_key: String,
}

impl KeyPair {
    fn from_material(keys: &KeyMaterial) -> Self {
        Self {
            private_key: hex::encode(keys.private_key()),
            public_key: hex::encode(keys.public_key()),
            uncompressed_public_key: hex::encode(keys.uncompressed_public_key()),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// 33-byte compressed key for ECDSA, 32-byte x-only key for Schnorr
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn uncompressed_public_key(&self) -> &str {
        &self.uncompressed_public_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .field("uncompressed_public_key", &self.uncompressed_public_key)
            .finish()
    }
}

/// Signature produced by the active algorithm.
///
/// Only the two constructors exist, so a DER encoding is present exactly
/// when the signature is ECDSA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    signature: String,
    der_encoded: Option<String>,
}

impl SignatureResult {
    pub fn ecdsa(compact: &[u8], der: &[u8]) -> Self {
        Self {
            signature: hex::encode(compact),
            der_encoded: Some(hex::encode(der)),
        }
    }

    pub fn schnorr(signature: &[u8]) -> Self {
        Self {
            signature: hex::encode(signature),
            der_encoded: None,
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn der_encoded(&self) -> Option<&str> {
        self.der_encoded.as_deref()
    }
}

// =============================================================================
// Workbench
// =============================================================================

/// Session state for key handling and signing
pub struct SignatureWorkbench<P: CryptoProvider = Secp256k1Provider> {
    provider: P,
    algorithm: Algorithm,
    key_source: KeySource,
    private_key_input: Zeroizing<String>,
    key_pair: Option<KeyPair>,
    message: String,
    signature: Option<SignatureResult>,
    keys_error: Option<String>,
    sign_error: Option<String>,
}

impl Default for SignatureWorkbench<Secp256k1Provider> {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureWorkbench<Secp256k1Provider> {
    pub fn new() -> Self {
        Self::with_provider(Secp256k1Provider::new())
    }
}

impl<P: CryptoProvider> SignatureWorkbench<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            algorithm: Algorithm::default(),
            key_source: KeySource::default(),
            private_key_input: Zeroizing::new(String::new()),
            key_pair: None,
            message: String::new(),
            signature: None,
            keys_error: None,
            sign_error: None,
        }
    }

    // MARK: - Selection

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Select the active algorithm. Always clears the session, even when
    /// the same algorithm is selected again.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        self.clear();
    }

    pub fn key_source(&self) -> KeySource {
        self.key_source
    }

    pub fn set_key_source(&mut self, source: KeySource) {
        self.key_source = source;
        self.clear();
    }

    pub fn private_key_input(&self) -> &str {
        &self.private_key_input
    }

    pub fn set_private_key_input(&mut self, value: &str) {
        self.private_key_input = Zeroizing::new(value.to_string());
    }

    // MARK: - Keys

    /// Whether the key action may run. Import mode needs a well-formed key.
    pub fn can_generate(&self) -> bool {
        match self.key_source {
            KeySource::Generate => true,
            KeySource::Import => is_importable(&self.private_key_input),
        }
    }

    /// Run the key action for the current key source
    pub fn submit_keys(&mut self) {
        match self.key_source {
            KeySource::Generate => self.generate(),
            KeySource::Import => {
                let input = self.private_key_input.clone();
                self.import_private_key(&input);
            }
        }
    }

    /// Replace the key pair with a fresh random one
    pub fn generate(&mut self) {
        let generated = match self.algorithm {
            Algorithm::Ecdsa => self.provider.generate_ecdsa_keypair(),
            Algorithm::Schnorr => self.provider.generate_schnorr_keypair(),
        };

        self.signature = None;
        self.sign_error = None;

        match generated {
            Ok(keys) => {
                self.key_pair = Some(KeyPair::from_material(&keys));
                self.keys_error = None;
                log_debug!(MODULE, "Generated key pair", algorithm = self.algorithm);
            }
            Err(e) => {
                log_warn!(MODULE, "Key generation failed", algorithm = self.algorithm, error = e);
                self.key_pair = None;
                self.keys_error = Some(e.to_string());
            }
        }
    }

    /// Derive the key pair from a 64-char hex private key.
    ///
    /// Badly shaped input is rejected before the provider is called. On
    /// any failure the key pair is left unset.
    pub fn import_private_key(&mut self, private_key_hex: &str) {
        self.key_pair = None;
        self.signature = None;
        self.sign_error = None;

        if !is_importable(private_key_hex) {
            log_warn!(MODULE, "Rejected private key shape", length = private_key_hex.len());
            self.keys_error = Some(format!(
                "Private key must be {} hex characters",
                PRIVATE_KEY_HEX_LEN
            ));
            return;
        }

        let derived = match hex::decode(private_key_hex) {
            Ok(bytes) => {
                let bytes = Zeroizing::new(bytes);
                match self.algorithm {
                    Algorithm::Ecdsa => self.provider.ecdsa_public_key(&bytes),
                    Algorithm::Schnorr => self.provider.schnorr_public_key(&bytes),
                }
            }
            Err(e) => {
                self.keys_error = Some(e.to_string());
                return;
            }
        };

        match derived {
            Ok(keys) => {
                self.key_pair = Some(KeyPair::from_material(&keys));
                self.keys_error = None;
                log_debug!(MODULE, "Imported private key", algorithm = self.algorithm);
            }
            Err(e) => {
                log_warn!(MODULE, "Public key derivation failed", algorithm = self.algorithm, error = e);
                self.keys_error = Some(e.to_string());
            }
        }
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    pub fn keys_error(&self) -> Option<&str> {
        self.keys_error.as_deref()
    }

    // MARK: - Signing

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Set the hex message to sign; whitespace is dropped
    pub fn set_message(&mut self, value: &str) {
        self.message = strip_whitespace(value);
    }

    /// Whether `sign` may be called
    pub fn can_sign(&self) -> bool {
        self.key_pair.is_some()
    }

    /// Sign the current message with the held private key.
    ///
    /// Returns `PreconditionFailed` when no key is present. Signer failures
    /// are stored in `sign_error` and still return `Ok`.
    pub fn sign(&mut self) -> WorkbenchResult<()> {
        let private_key = match &self.key_pair {
            Some(keys) => Zeroizing::new(hex::decode(keys.private_key())?),
            None => {
                return Err(WorkbenchError::precondition("Unknown private key")
                    .with_details("sign requested before a key pair exists"));
            }
        };

        let outcome = hex::decode(&self.message)
            .map_err(WorkbenchError::from)
            .and_then(|message| self.sign_with(&message, &private_key));

        match outcome {
            Ok(result) => {
                self.signature = Some(result);
                self.sign_error = None;
            }
            Err(e) => {
                log_warn!(MODULE, "Signing failed", algorithm = self.algorithm, error = e);
                self.signature = None;
                self.sign_error = Some(e.message);
            }
        }

        Ok(())
    }

    fn sign_with(&self, message: &[u8], private_key: &[u8]) -> WorkbenchResult<SignatureResult> {
        match self.algorithm {
            Algorithm::Ecdsa => {
                let sig = self.provider.ecdsa_sign(message, private_key)?;
                Ok(SignatureResult::ecdsa(&sig.compact, &sig.der))
            }
            Algorithm::Schnorr => {
                let sig = self.provider.schnorr_sign(message, private_key)?;
                Ok(SignatureResult::schnorr(&sig))
            }
        }
    }

    pub fn signature(&self) -> Option<&SignatureResult> {
        self.signature.as_ref()
    }

    pub fn sign_error(&self) -> Option<&str> {
        self.sign_error.as_deref()
    }

    /// Wipe keys, signature, message and errors. The typed private key
    /// input is kept.
    pub fn clear(&mut self) {
        self.key_pair = None;
        self.signature = None;
        self.message.clear();
        self.keys_error = None;
        self.sign_error = None;
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

fn is_importable(private_key_hex: &str) -> bool {
    private_key_hex.len() == PRIVATE_KEY_HEX_LEN && valid_hex(private_key_hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CryptoError, EcdsaSignature, TaprootError, TaprootOutput};
    use crate::error::ErrorCode;
    use crate::types::TaprootVersion;
    use std::cell::Cell;

    /// Deterministic provider that counts derivation calls
    #[derive(Default)]
    struct StubProvider {
        derivations: Cell<usize>,
        reject_keys: bool,
        reject_signing: bool,
    }

    impl StubProvider {
        fn keys(&self, compressed_len: usize) -> KeyMaterial {
            KeyMaterial::new(vec![0x01; 32], vec![0x02; compressed_len], vec![0x04; 65])
        }
    }

    impl CryptoProvider for StubProvider {
        fn tap_root(
            &self,
            _inner_key: &[u8],
            _leaf_scripts: &[Vec<u8>],
            _leaf_version: u8,
            _version: TaprootVersion,
        ) -> Result<TaprootOutput, TaprootError> {
            unimplemented!()
        }

        fn generate_ecdsa_keypair(&self) -> Result<KeyMaterial, CryptoError> {
            Ok(self.keys(33))
        }

        fn ecdsa_public_key(&self, _private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
            self.derivations.set(self.derivations.get() + 1);
            if self.reject_keys {
                return Err(CryptoError::InvalidPrivateKey("out of range".into()));
            }
            Ok(self.keys(33))
        }

        fn ecdsa_sign(&self, _message: &[u8], _private_key: &[u8]) -> Result<EcdsaSignature, CryptoError> {
            if self.reject_signing {
                return Err(CryptoError::SigningFailed("stub".into()));
            }
            Ok(EcdsaSignature {
                compact: [0xAB; 64],
                der: vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
            })
        }

        fn generate_schnorr_keypair(&self) -> Result<KeyMaterial, CryptoError> {
            Ok(self.keys(32))
        }

        fn schnorr_public_key(&self, _private_key: &[u8]) -> Result<KeyMaterial, CryptoError> {
            self.derivations.set(self.derivations.get() + 1);
            if self.reject_keys {
                return Err(CryptoError::InvalidPrivateKey("out of range".into()));
            }
            Ok(self.keys(32))
        }

        fn schnorr_sign(&self, _message: &[u8], _private_key: &[u8]) -> Result<[u8; 64], CryptoError> {
            if self.reject_signing {
                return Err(CryptoError::SigningFailed("stub".into()));
            }
            Ok([0xCD; 64])
        }
    }

    fn stub_workbench() -> SignatureWorkbench<StubProvider> {
        SignatureWorkbench::with_provider(StubProvider::default())
    }

    #[test]
    fn test_ecdsa_sign_has_der() {
        let mut bench = stub_workbench();
        bench.generate();
        bench.set_message("deadbeef");
        bench.sign().unwrap();

        let sig = bench.signature().unwrap();
        assert_eq!(sig.signature(), "ab".repeat(64));
        assert_eq!(sig.der_encoded(), Some("3006020101020101"));
    }

    #[test]
    fn test_schnorr_sign_has_no_der() {
        let mut bench = stub_workbench();
        bench.set_algorithm(Algorithm::Schnorr);
        bench.generate();
        assert_eq!(bench.key_pair().unwrap().public_key().len(), 64);

        bench.set_message("deadbeef");
        bench.sign().unwrap();
        assert_eq!(bench.signature().unwrap().der_encoded(), None);
    }

    #[test]
    fn test_algorithm_switch_clears_session() {
        let mut bench = stub_workbench();
        bench.generate();
        bench.set_message("00");
        bench.sign().unwrap();
        assert!(bench.signature().is_some());

        bench.set_algorithm(Algorithm::Ecdsa);
        assert!(bench.key_pair().is_none());
        assert!(bench.signature().is_none());
        assert_eq!(bench.message(), "");
    }

    #[test]
    fn test_sign_without_key_is_precondition_failure() {
        let mut bench = stub_workbench();
        assert!(!bench.can_sign());
        let err = bench.sign().unwrap_err();
        assert_eq!(err.code, ErrorCode::PreconditionFailed);
    }

    #[test]
    fn test_import_rejects_bad_shape_without_derivation() {
        let mut bench = stub_workbench();
        bench.set_key_source(KeySource::Import);

        let too_short = "ab".repeat(31);
        let non_hex = format!("{}zz", "ab".repeat(31));
        for input in [too_short.as_str(), non_hex.as_str(), ""] {
            bench.set_private_key_input(input);
            assert!(!bench.can_generate());
            bench.submit_keys();
            assert!(bench.key_pair().is_none());
            assert!(bench.keys_error().is_some());
        }
        assert_eq!(bench.provider().derivations.get(), 0);
    }

    #[test]
    fn test_import_derivation_failure_fails_closed() {
        let mut bench = SignatureWorkbench::with_provider(StubProvider {
            reject_keys: true,
            ..Default::default()
        });
        bench.generate();
        assert!(bench.key_pair().is_some());

        bench.import_private_key(&"ff".repeat(32));
        assert_eq!(bench.provider().derivations.get(), 1);
        assert!(bench.key_pair().is_none());
        assert!(bench.keys_error().unwrap().contains("out of range"));
    }

    #[test]
    fn test_signer_failure_is_stored() {
        let mut bench = SignatureWorkbench::with_provider(StubProvider {
            reject_signing: true,
            ..Default::default()
        });
        bench.generate();
        bench.set_message("01");
        assert!(bench.sign().is_ok());
        assert!(bench.signature().is_none());
        assert!(bench.sign_error().is_some());
    }

    #[test]
    fn test_non_hex_message_is_sign_error() {
        let mut bench = stub_workbench();
        bench.generate();
        bench.set_message("xyz");
        bench.sign().unwrap();
        assert!(bench.sign_error().is_some());
    }

    #[test]
    fn test_message_whitespace_stripped() {
        let mut bench = stub_workbench();
        bench.set_message(" de ad\n be\tef ");
        assert_eq!(bench.message(), "deadbeef");
    }

    #[test]
    fn test_clear_keeps_private_key_input() {
        let mut bench = stub_workbench();
        bench.set_key_source(KeySource::Import);
        bench.set_private_key_input(&"11".repeat(32));
        bench.submit_keys();
        assert!(bench.key_pair().is_some());

        bench.clear();
        assert!(bench.key_pair().is_none());
        assert_eq!(bench.private_key_input(), "11".repeat(32));
        assert!(bench.can_generate());
    }

    #[test]
    fn test_key_pair_debug_redacts() {
        let mut bench = stub_workbench();
        bench.generate();
        let debug = format!("{:?}", bench.key_pair().unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&"01".repeat(32)));
    }

    #[test]
    fn test_real_provider_signatures_verify() {
        use crate::crypto::{EcdsaSigner, SchnorrSigner};

        let mut bench = SignatureWorkbench::new();
        bench.import_private_key(&"07".repeat(32));
        bench.set_message(&"aa".repeat(32));
        bench.sign().unwrap();

        let keys = bench.key_pair().unwrap();
        let sig = bench.signature().unwrap();
        assert!(EcdsaSigner::new()
            .verify(
                &hex::decode(bench.message()).unwrap(),
                &hex::decode(sig.signature()).unwrap(),
                &hex::decode(keys.public_key()).unwrap(),
            )
            .unwrap());

        bench.set_algorithm(Algorithm::Schnorr);
        bench.import_private_key(&"07".repeat(32));
        bench.set_message("cafe");
        bench.sign().unwrap();

        let keys = bench.key_pair().unwrap();
        let sig = bench.signature().unwrap();
        assert!(SchnorrSigner::new()
            .verify(
                &hex::decode("cafe").unwrap(),
                &hex::decode(sig.signature()).unwrap(),
                &hex::decode(keys.public_key()).unwrap(),
            )
            .unwrap());
    }
}
