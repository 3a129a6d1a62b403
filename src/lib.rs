//! Tapscript Workbench Core
//!
//! Computation and validation layer behind an interactive Bitcoin/Liquid
//! script workbench. Raw hex typed by the user is shape-checked here
//! before any cryptographic primitive runs.
//!
//! # Architecture
//!
//! This crate provides:
//! - **tweak**: Taproot output derivation (tweaked key, scriptPubKey, bech32m)
//! - **signature**: ECDSA/Schnorr key generation, import and message signing
//! - **template**: Raw transaction template editing with persisted restore
//! - **crypto**: secp256k1 primitives behind the `CryptoProvider` seam
//! - **storage**: Key-value persistence backends
//!
//! # Security
//!
//! Private keys are held in `zeroize` wrappers and wiped when dropped.
//! Log lines redact key material automatically.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapscript_workbench::{Network, TaprootTweakEngine};
//!
//! let mut engine = TaprootTweakEngine::new(Network::Bitcoin);
//! engine.set_compiled_script("0x51");
//! println!("Address: {}", engine.result().bech32());
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod signature;
pub mod storage;
pub mod template;
pub mod tweak;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use config::WorkbenchConfig;
pub use error::{ErrorCode, WorkbenchError, WorkbenchResult};
pub use types::*;

pub use crypto::{CryptoProvider, Secp256k1Provider};
pub use signature::{Algorithm, KeyPair, KeySource, SignatureResult, SignatureWorkbench};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use template::{
    TemplateListener, TemplateValidation, TransactionTemplateStore, TxInput, TxOutput, TxTemplate,
};
pub use tweak::{
    compute_tweak, InnerKeySpec, KeyPath, TapleafSpec, TapleafVersion, TaprootResult,
    TaprootTweakEngine, INVALID_RESULT, UNKNOWN_DISCRETE_LOG_KEY,
};
