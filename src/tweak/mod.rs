//! Taproot Tweak Engine
//!
//! Turns the compiled script plus the user's inner-key and tapleaf
//! selections into a taproot output (tweaked key, scriptPubKey, bech32m
//! address). Every change to a tracked input recomputes the whole result.
//!
//! Shape checks run before the primitive is called. A short custom key or
//! a short custom tapleaf gives the `Invalid` sentinel; inputs that are
//! simply not filled in yet give `Empty`. Failures raised by the primitive
//! itself also collapse to `Invalid` and are never propagated.

use crate::crypto::{CryptoProvider, Secp256k1Provider};
use crate::error::WorkbenchResult;
use crate::types::Network;
use crate::utils::sanitize::{strip_hex_prefix, validate_hex};
use crate::{log_debug, log_warn};
use serde::{Deserialize, Serialize};

/// Compressed form of the BIP-341 NUMS point H: a key with no known
/// discrete logarithm, for outputs that should only be spent by script.
pub const UNKNOWN_DISCRETE_LOG_KEY: &str =
    "0250929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac0";

/// Marker shown in every result field when computation failed
pub const INVALID_RESULT: &str = "Invalid result";

/// Shortest custom key accepted before calling the primitive (32 bytes)
const MIN_INNER_KEY_CHARS: usize = 64;

/// Shortest custom tapleaf text accepted (`0x` plus one byte)
const MIN_TAPLEAF_CHARS: usize = 4;

const MODULE: &str = "taproot";

// =============================================================================
// Selections and inputs
// =============================================================================

/// Key-path selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPath {
    #[default]
    UnknownDiscreteLog,
    Custom,
}

/// Tapleaf version selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapleafVersion {
    #[default]
    Default,
    Custom,
}

/// Inner key source with its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerKeySpec {
    UnknownDiscreteLog,
    Custom(String),
}

impl InnerKeySpec {
    /// Hex of the key the primitive will be called with
    pub fn resolve(&self) -> &str {
        match self {
            InnerKeySpec::UnknownDiscreteLog => UNKNOWN_DISCRETE_LOG_KEY,
            InnerKeySpec::Custom(hex) => hex,
        }
    }
}

/// Tapleaf version source with its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapleafSpec {
    Default,
    /// Raw user text, usually `0x`-prefixed (e.g. `"0xc0"`)
    Custom(String),
}

// =============================================================================
// Result
// =============================================================================

/// Derived taproot output.
///
/// The three displayed fields always come from the same state, so a
/// partially-updated or mixed result cannot be observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaprootResult {
    /// Not computable yet
    #[default]
    Empty,
    /// Rejected by a shape check or by the primitive
    Invalid,
    Computed {
        tweak: String,
        script_pubkey: String,
        bech32: String,
    },
}

impl TaprootResult {
    pub fn tweak(&self) -> &str {
        match self {
            TaprootResult::Empty => "",
            TaprootResult::Invalid => INVALID_RESULT,
            TaprootResult::Computed { tweak, .. } => tweak,
        }
    }

    pub fn script_pubkey(&self) -> &str {
        match self {
            TaprootResult::Empty => "",
            TaprootResult::Invalid => INVALID_RESULT,
            TaprootResult::Computed { script_pubkey, .. } => script_pubkey,
        }
    }

    pub fn bech32(&self) -> &str {
        match self {
            TaprootResult::Empty => "",
            TaprootResult::Invalid => INVALID_RESULT,
            TaprootResult::Computed { bech32, .. } => bech32,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, TaprootResult::Invalid)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaprootResult::Empty)
    }
}

// =============================================================================
// Pure computation
// =============================================================================

/// Compute the taproot output for one set of inputs.
///
/// `script` is the compiled script hex; a leading `0x` is tolerated.
/// A custom tapleaf version is hashed into the leaf as given, so it changes
/// the output rather than only gating the computation.
/// Identical inputs always give identical output.
pub fn compute_tweak<P: CryptoProvider + ?Sized>(
    provider: &P,
    script: &str,
    inner_key: &InnerKeySpec,
    tapleaf: &TapleafSpec,
    network: Network,
) -> TaprootResult {
    // A partial custom key is always rejected, never padded.
    if let InnerKeySpec::Custom(key) = inner_key {
        if !key.is_empty() && key.len() < MIN_INNER_KEY_CHARS {
            return TaprootResult::Invalid;
        }
    }

    let ready = match tapleaf {
        TapleafSpec::Custom(text) if text.len() < MIN_TAPLEAF_CHARS => {
            return TaprootResult::Invalid;
        }
        TapleafSpec::Custom(text) => strip_hex_prefix(text).len() >= 2,
        TapleafSpec::Default => inner_key.resolve().len() >= MIN_INNER_KEY_CHARS,
    };

    if !ready {
        return TaprootResult::Empty;
    }

    match run_primitive(provider, script, inner_key.resolve(), tapleaf, network) {
        Ok(result) => {
            log_debug!(MODULE, "Computed taproot output", network = network, tweak = result.tweak());
            result
        }
        Err(e) => {
            log_warn!(MODULE, "Taproot computation rejected", network = network, error = e);
            TaprootResult::Invalid
        }
    }
}

fn run_primitive<P: CryptoProvider + ?Sized>(
    provider: &P,
    script: &str,
    inner_key: &str,
    tapleaf: &TapleafSpec,
    network: Network,
) -> WorkbenchResult<TaprootResult> {
    let key_bytes = hex::decode(inner_key)?;
    let script_bytes = hex::decode(strip_hex_prefix(script))?;
    let leaf_version = resolve_leaf_version(tapleaf, network)?;

    let output = provider.tap_root(
        &key_bytes,
        &[script_bytes],
        leaf_version,
        network.taproot_version(),
    )?;

    Ok(TaprootResult::Computed {
        tweak: hex::encode(output.tweak),
        script_pubkey: hex::encode(&output.script_pubkey),
        bech32: output.bech32,
    })
}

fn resolve_leaf_version(tapleaf: &TapleafSpec, network: Network) -> WorkbenchResult<u8> {
    match tapleaf {
        TapleafSpec::Default => Ok(network.default_tapleaf_version()),
        TapleafSpec::Custom(text) => {
            let bytes = validate_hex(text, Some(1))?;
            Ok(bytes[0])
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Holds the tracked inputs and the derived result, recomputing on every change
pub struct TaprootTweakEngine<P: CryptoProvider = Secp256k1Provider> {
    provider: P,
    network: Network,
    script: String,
    key_path: KeyPath,
    inner_key_input: String,
    tapleaf_version: TapleafVersion,
    tapleaf_input: String,
    result: TaprootResult,
}

impl TaprootTweakEngine<Secp256k1Provider> {
    pub fn new(network: Network) -> Self {
        Self::with_provider(Secp256k1Provider::new(), network)
    }
}

impl<P: CryptoProvider> TaprootTweakEngine<P> {
    pub fn with_provider(provider: P, network: Network) -> Self {
        let mut engine = Self {
            provider,
            network,
            script: String::new(),
            key_path: KeyPath::default(),
            inner_key_input: String::new(),
            tapleaf_version: TapleafVersion::default(),
            tapleaf_input: String::new(),
            result: TaprootResult::Empty,
        };
        engine.recompute();
        engine
    }

    /// Set the compiler output (`0x`-prefixed hex)
    pub fn set_compiled_script(&mut self, compiled: &str) {
        self.script = strip_hex_prefix(compiled).to_string();
        self.recompute();
    }

    pub fn set_network(&mut self, network: Network) {
        self.network = network;
        self.recompute();
    }

    pub fn select_key_path(&mut self, key_path: KeyPath) {
        self.key_path = key_path;
        self.recompute();
    }

    pub fn set_inner_key_input(&mut self, value: &str) {
        self.inner_key_input = value.to_string();
        self.recompute();
    }

    pub fn select_tapleaf_version(&mut self, version: TapleafVersion) {
        self.tapleaf_version = version;
        self.recompute();
    }

    pub fn set_tapleaf_input(&mut self, value: &str) {
        self.tapleaf_input = value.to_string();
        self.recompute();
    }

    /// Current inner key spec built from the selection and typed value
    pub fn inner_key(&self) -> InnerKeySpec {
        match self.key_path {
            KeyPath::UnknownDiscreteLog => InnerKeySpec::UnknownDiscreteLog,
            KeyPath::Custom => InnerKeySpec::Custom(self.inner_key_input.clone()),
        }
    }

    /// Current tapleaf spec built from the selection and typed value
    pub fn tapleaf(&self) -> TapleafSpec {
        match self.tapleaf_version {
            TapleafVersion::Default => TapleafSpec::Default,
            TapleafVersion::Custom => TapleafSpec::Custom(self.tapleaf_input.clone()),
        }
    }

    /// Text for the inner key field
    pub fn inner_key_display(&self) -> &str {
        match self.key_path {
            KeyPath::UnknownDiscreteLog => UNKNOWN_DISCRETE_LOG_KEY,
            KeyPath::Custom => &self.inner_key_input,
        }
    }

    /// Text for the tapleaf field
    pub fn tapleaf_display(&self) -> &str {
        match self.tapleaf_version {
            TapleafVersion::Default => self.network.default_tapleaf_hex(),
            TapleafVersion::Custom => &self.tapleaf_input,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn result(&self) -> &TaprootResult {
        &self.result
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Replace the held result from the current inputs
    pub fn recompute(&mut self) {
        self.result = compute_tweak(
            &self.provider,
            &self.script,
            &self.inner_key(),
            &self.tapleaf(),
            self.network,
        );
    }
}
