//! Unified error types for the workbench
//!
//! Crate-level failures flow through `WorkbenchError`. Component
//! boundaries (tweak engine, signature workbench, template store) absorb
//! primitive failures themselves, so this type mostly surfaces caller
//! mistakes, configuration problems and storage setup errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all workbench operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl WorkbenchError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::PreconditionFailed, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }
}

impl fmt::Display for WorkbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WorkbenchError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidPrivateKey,
    InvalidPublicKey,

    // Caller errors
    PreconditionFailed,

    // Crypto errors
    CryptoError,
    SigningFailed,
    TaprootError,

    // Persistence
    StorageError,

    // Encoding errors
    JsonError,
    HexError,

    // Setup
    ConfigError,
}

/// Result type alias for workbench operations
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

// Conversions from common error types

impl From<serde_json::Error> for WorkbenchError {
    fn from(e: serde_json::Error) -> Self {
        WorkbenchError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for WorkbenchError {
    fn from(e: hex::FromHexError) -> Self {
        WorkbenchError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for WorkbenchError {
    fn from(e: std::io::Error) -> Self {
        WorkbenchError::new(ErrorCode::StorageError, e.to_string())
    }
}

impl From<bitcoin::secp256k1::Error> for WorkbenchError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        WorkbenchError::new(ErrorCode::CryptoError, format!("Secp256k1 error: {}", e))
    }
}

impl From<crate::crypto::CryptoError> for WorkbenchError {
    fn from(e: crate::crypto::CryptoError) -> Self {
        let code = match e {
            crate::crypto::CryptoError::InvalidPrivateKey(_) => ErrorCode::InvalidPrivateKey,
            crate::crypto::CryptoError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            crate::crypto::CryptoError::SigningFailed(_) => ErrorCode::SigningFailed,
            _ => ErrorCode::CryptoError,
        };
        WorkbenchError::new(code, e.to_string())
    }
}

impl From<crate::crypto::TaprootError> for WorkbenchError {
    fn from(e: crate::crypto::TaprootError) -> Self {
        WorkbenchError::new(ErrorCode::TaprootError, e.to_string())
    }
}

impl From<crate::storage::StorageError> for WorkbenchError {
    fn from(e: crate::storage::StorageError) -> Self {
        WorkbenchError::new(ErrorCode::StorageError, e.to_string())
    }
}
