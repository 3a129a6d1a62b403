//! Transaction template records
//!
//! Field values are kept as raw hex text exactly as typed, including
//! values that do not validate yet. The serialized form is the persisted
//! slot format.

use serde::{Deserialize, Serialize};

/// One spent outpoint with its prevout data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// 32-byte previous transaction id
    #[serde(default)]
    pub previous_tx_id: String,
    /// 4-byte output index
    #[serde(default)]
    pub vout: String,
    /// 4-byte sequence
    #[serde(default)]
    pub sequence: String,
    #[serde(default)]
    pub script_pub_key: String,
    /// 8-byte amount
    #[serde(default)]
    pub amount: String,
    /// 32-byte asset id (Liquid only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
}

impl TxInput {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.previous_tx_id.is_empty()
            && self.vout.is_empty()
            && self.sequence.is_empty()
            && self.script_pub_key.is_empty()
            && self.amount.is_empty()
            && asset_id_is_empty(&self.asset_id)
    }
}

/// One created output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    #[serde(default)]
    pub script_pub_key: String,
    /// 8-byte amount
    #[serde(default)]
    pub amount: String,
    /// 32-byte asset id (Liquid only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
}

impl TxOutput {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.script_pub_key.is_empty() && self.amount.is_empty() && asset_id_is_empty(&self.asset_id)
    }
}

/// Scratchpad transaction.
///
/// `inputs` and `outputs` are never empty and `current_input_index`
/// always points into `inputs`. The store maintains this; restored
/// payloads are checked with `is_well_formed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxTemplate {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// 4-byte version
    #[serde(default)]
    pub version: String,
    /// 4-byte locktime
    #[serde(default)]
    pub timelock: String,
    #[serde(default)]
    pub current_input_index: usize,
}

impl Default for TxTemplate {
    fn default() -> Self {
        Self::blank()
    }
}

impl TxTemplate {
    /// One blank input, one blank output, everything else empty
    pub fn blank() -> Self {
        Self {
            inputs: vec![TxInput::blank()],
            outputs: vec![TxOutput::blank()],
            version: String::new(),
            timelock: String::new(),
            current_input_index: 0,
        }
    }

    /// Still at the initial value, untouched by the user
    pub fn is_pristine(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].is_blank()
            && self.outputs.len() == 1
            && self.outputs[0].is_blank()
            && self.version.is_empty()
            && self.timelock.is_empty()
            && self.current_input_index == 0
    }

    pub fn is_well_formed(&self) -> bool {
        !self.inputs.is_empty()
            && !self.outputs.is_empty()
            && self.current_input_index < self.inputs.len()
    }

    pub fn current_input(&self) -> Option<&TxInput> {
        self.inputs.get(self.current_input_index)
    }
}

fn asset_id_is_empty(asset_id: &Option<String>) -> bool {
    asset_id.as_deref().map_or(true, str::is_empty)
}
