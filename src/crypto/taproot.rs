//! Taproot Output Tweaking (BIP-341)
//!
//! Turns an internal key and a list of leaf scripts into a tweaked output
//! key, its `OP_1 <key>` scriptPubKey and a bech32m address. Both hashing
//! domains are supported: plain Bitcoin tags and the `/elements` tags used
//! by Liquid.
//!
//! Reference: https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki

use super::schnorr::{tagged_hash, tags};
use crate::types::TaprootVersion;
use bech32::{u5, ToBase32, Variant};
use bitcoin::secp256k1::{All, PublicKey, Scalar, Secp256k1, XOnlyPublicKey};
use thiserror::Error;

// MARK: - Taproot Constants

/// Default TapScript leaf version on Bitcoin
pub const TAPSCRIPT_LEAF_VERSION: u8 = 0xc0;

/// Default TapScript leaf version on Liquid
pub const ELEMENTS_TAPSCRIPT_LEAF_VERSION: u8 = 0xc4;

/// Witness version for taproot outputs
const SEGWIT_V1: u8 = 0x01;

/// OP_1 OP_PUSHBYTES_32
const P2TR_PREFIX: [u8; 2] = [0x51, 0x20];

// MARK: - Taproot Errors

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaprootError {
    #[error("Invalid internal key: {0}")]
    InvalidInternalKey(String),

    #[error("Invalid leaf version: {0:#04x}")]
    InvalidLeafVersion(u8),

    #[error("Tweak failed: {0}")]
    TweakFailed(String),

    #[error("Address encoding failed: {0}")]
    AddressEncoding(String),
}

// MARK: - Taproot Types

/// TapLeaf - a single script in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapLeaf {
    pub version: u8,
    pub script: Vec<u8>,
}

impl TapLeaf {
    /// Create a leaf, rejecting versions BIP-341 reserves
    pub fn new(version: u8, script: Vec<u8>) -> Result<Self, TaprootError> {
        // Leaf versions must be even and must not collide with the annex tag.
        if version & 0x01 != 0 || version == 0x50 {
            return Err(TaprootError::InvalidLeafVersion(version));
        }
        Ok(Self { version, script })
    }

    /// Calculate the leaf hash
    ///
    /// TapLeaf hash = tagged_hash(leaf_tag, version || compact_size(script) || script)
    pub fn hash(&self, tag_version: TaprootVersion) -> [u8; 32] {
        let mut data = Vec::with_capacity(1 + 9 + self.script.len());
        data.push(self.version);

        // Compact size encoding
        let len = self.script.len();
        if len < 253 {
            data.push(len as u8);
        } else if len <= 0xFFFF {
            data.push(253);
            data.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            data.push(254);
            data.extend_from_slice(&(len as u32).to_le_bytes());
        }

        data.extend_from_slice(&self.script);

        tagged_hash(leaf_tag(tag_version), &data)
    }
}

/// Result of tweaking an internal key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaprootOutput {
    /// Tweaked x-only output key
    pub tweak: [u8; 32],
    /// `OP_1 <tweak>`
    pub script_pubkey: Vec<u8>,
    /// Segwit v1 bech32m address
    pub bech32: String,
}

fn leaf_tag(version: TaprootVersion) -> &'static str {
    match version {
        TaprootVersion::Bitcoin => tags::TAP_LEAF,
        TaprootVersion::Liquid => tags::TAP_LEAF_ELEMENTS,
    }
}

fn branch_tag(version: TaprootVersion) -> &'static str {
    match version {
        TaprootVersion::Bitcoin => tags::TAP_BRANCH,
        TaprootVersion::Liquid => tags::TAP_BRANCH_ELEMENTS,
    }
}

fn tweak_tag(version: TaprootVersion) -> &'static str {
    match version {
        TaprootVersion::Bitcoin => tags::TAP_TWEAK,
        TaprootVersion::Liquid => tags::TAP_TWEAK_ELEMENTS,
    }
}

// MARK: - Taproot Functions

/// Calculate TapBranch hash from two child hashes
///
/// The children are sorted lexicographically before hashing.
pub fn tap_branch_hash(left: &[u8; 32], right: &[u8; 32], version: TaprootVersion) -> [u8; 32] {
    let (first, second) = if left < right {
        (left, right)
    } else {
        (right, left)
    };

    let mut data = [0u8; 64];
    data[..32].copy_from_slice(first);
    data[32..].copy_from_slice(second);

    tagged_hash(branch_tag(version), &data)
}

/// Calculate the tweak scalar
///
/// tweak = tagged_hash(tweak_tag, internal_key || merkle_root), or just the
/// internal key when there is no script tree.
pub fn tap_tweak_hash(
    internal_key: &XOnlyPublicKey,
    merkle_root: Option<&[u8; 32]>,
    version: TaprootVersion,
) -> [u8; 32] {
    let key = internal_key.serialize();
    match merkle_root {
        Some(root) => {
            let mut data = [0u8; 64];
            data[..32].copy_from_slice(&key);
            data[32..].copy_from_slice(root);
            tagged_hash(tweak_tag(version), &data)
        }
        None => tagged_hash(tweak_tag(version), &key),
    }
}

/// Encode a segwit v1 witness program as a bech32m address
pub fn segwit_v1_address(hrp: &str, program: &[u8; 32]) -> Result<String, TaprootError> {
    let witness_version =
        u5::try_from_u8(SEGWIT_V1).map_err(|e| TaprootError::AddressEncoding(e.to_string()))?;

    let mut data = vec![witness_version];
    data.extend(program.to_base32());

    bech32::encode(hrp, data, Variant::Bech32m)
        .map_err(|e| TaprootError::AddressEncoding(e.to_string()))
}

/// Taproot key tweaker
pub struct TaprootTweaker {
    secp: Secp256k1<All>,
}

impl Default for TaprootTweaker {
    fn default() -> Self {
        Self::new()
    }
}

impl TaprootTweaker {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Parse an internal key given as 32-byte x-only or 33-byte compressed
    pub fn parse_internal_key(&self, bytes: &[u8]) -> Result<XOnlyPublicKey, TaprootError> {
        match bytes.len() {
            32 => XOnlyPublicKey::from_slice(bytes)
                .map_err(|e| TaprootError::InvalidInternalKey(e.to_string())),
            33 => PublicKey::from_slice(bytes)
                .map(|pk| pk.x_only_public_key().0)
                .map_err(|e| TaprootError::InvalidInternalKey(e.to_string())),
            n => Err(TaprootError::InvalidInternalKey(format!(
                "Expected 32 or 33 bytes, got {}",
                n
            ))),
        }
    }

    /// Build a Merkle root from a list of TapLeaves
    ///
    /// Creates a balanced binary tree from the leaves; an odd node at any
    /// level is promoted unchanged.
    pub fn build_merkle_root(&self, leaves: &[TapLeaf], version: TaprootVersion) -> Option<[u8; 32]> {
        if leaves.is_empty() {
            return None;
        }

        let mut hashes: Vec<[u8; 32]> = leaves.iter().map(|l| l.hash(version)).collect();

        while hashes.len() > 1 {
            hashes = hashes
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => tap_branch_hash(left, right, version),
                    other => other[0],
                })
                .collect();
        }

        hashes.first().copied()
    }

    /// Tweak an internal key with the given leaves
    ///
    /// output_key = internal_key + tweak * G
    pub fn tap_root(
        &self,
        internal_key: &[u8],
        leaves: &[TapLeaf],
        version: TaprootVersion,
    ) -> Result<TaprootOutput, TaprootError> {
        let internal = self.parse_internal_key(internal_key)?;
        let merkle_root = self.build_merkle_root(leaves, version);

        let tweak_hash = tap_tweak_hash(&internal, merkle_root.as_ref(), version);
        let scalar = Scalar::from_be_bytes(tweak_hash)
            .map_err(|e| TaprootError::TweakFailed(e.to_string()))?;

        let (output_key, _parity) = internal
            .add_tweak(&self.secp, &scalar)
            .map_err(|e| TaprootError::TweakFailed(e.to_string()))?;

        let tweak = output_key.serialize();

        let mut script_pubkey = Vec::with_capacity(34);
        script_pubkey.extend_from_slice(&P2TR_PREFIX);
        script_pubkey.extend_from_slice(&tweak);

        let bech32 = segwit_v1_address(version.bech32_hrp(), &tweak)?;

        Ok(TaprootOutput {
            tweak,
            script_pubkey,
            bech32,
        })
    }
}

// MARK: - Tests
