//! Shared types for the workbench
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Network Types
// =============================================================================

/// Script VM network the workbench targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Bitcoin,
    Liquid,
}

impl Network {
    /// Default tapleaf version for tapscript on this network
    pub fn default_tapleaf_version(&self) -> u8 {
        match self {
            Network::Bitcoin => 0xc0,
            Network::Liquid => 0xc4,
        }
    }

    /// Default tapleaf version as the `0x`-prefixed text shown to users
    pub fn default_tapleaf_hex(&self) -> &'static str {
        match self {
            Network::Bitcoin => "0xc0",
            Network::Liquid => "0xc4",
        }
    }

    /// Tagged-hash family used by the taproot primitive
    pub fn taproot_version(&self) -> TaprootVersion {
        match self {
            Network::Bitcoin => TaprootVersion::Bitcoin,
            Network::Liquid => TaprootVersion::Liquid,
        }
    }

    /// Human-readable part of segwit v1 addresses
    pub fn bech32_hrp(&self) -> &'static str {
        self.taproot_version().bech32_hrp()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Bitcoin => write!(f, "bitcoin"),
            Network::Liquid => write!(f, "liquid"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Network::Bitcoin),
            "liquid" | "elements" => Ok(Network::Liquid),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Version tag selecting the taproot hashing domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaprootVersion {
    Bitcoin,
    Liquid,
}

impl TaprootVersion {
    /// Human-readable part of segwit v1 addresses (unconfidential for Liquid)
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            TaprootVersion::Bitcoin => "bc",
            TaprootVersion::Liquid => "ex",
        }
    }
}
