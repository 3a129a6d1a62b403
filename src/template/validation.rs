//! Advisory field validation for transaction templates
//!
//! Nothing here blocks saving. Each check yields an optional inline
//! message for the field; `None` means the field is acceptable (empty
//! fields are always acceptable).

use super::types::{TxInput, TxOutput, TxTemplate};
use crate::utils::sanitize::is_fixed_hex_or_empty;
use serde::Serialize;

pub const AMOUNT_HEX_LEN: usize = 16;
pub const ASSET_ID_HEX_LEN: usize = 64;
pub const VERSION_HEX_LEN: usize = 8;
pub const TIMELOCK_HEX_LEN: usize = 8;

pub const AMOUNT_ERROR: &str = "Amount must be 8 bytes (16 hex characters)";
pub const ASSET_ID_ERROR: &str = "Asset id must be 32 bytes (64 hex characters)";
pub const VERSION_ERROR: &str = "Version must be 4 bytes (8 hex characters)";
pub const TIMELOCK_ERROR: &str = "Timelock must be 4 bytes (8 hex characters)";

/// Messages for one input or output record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordValidation {
    pub amount: Option<&'static str>,
    pub asset_id: Option<&'static str>,
}

impl RecordValidation {
    pub fn is_valid(&self) -> bool {
        self.amount.is_none() && self.asset_id.is_none()
    }
}

/// Per-field messages for a whole template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateValidation {
    pub inputs: Vec<RecordValidation>,
    pub outputs: Vec<RecordValidation>,
    pub version: Option<&'static str>,
    pub timelock: Option<&'static str>,
}

impl TemplateValidation {
    pub fn is_valid(&self) -> bool {
        self.version.is_none()
            && self.timelock.is_none()
            && self.inputs.iter().all(RecordValidation::is_valid)
            && self.outputs.iter().all(RecordValidation::is_valid)
    }
}

pub fn check_amount(amount: &str) -> Option<&'static str> {
    (!is_fixed_hex_or_empty(amount, AMOUNT_HEX_LEN)).then_some(AMOUNT_ERROR)
}

pub fn check_asset_id(asset_id: Option<&str>) -> Option<&'static str> {
    let asset_id = asset_id.unwrap_or_default();
    (!is_fixed_hex_or_empty(asset_id, ASSET_ID_HEX_LEN)).then_some(ASSET_ID_ERROR)
}

pub fn check_version(version: &str) -> Option<&'static str> {
    (!is_fixed_hex_or_empty(version, VERSION_HEX_LEN)).then_some(VERSION_ERROR)
}

pub fn check_timelock(timelock: &str) -> Option<&'static str> {
    (!is_fixed_hex_or_empty(timelock, TIMELOCK_HEX_LEN)).then_some(TIMELOCK_ERROR)
}

pub fn validate_input(input: &TxInput) -> RecordValidation {
    RecordValidation {
        amount: check_amount(&input.amount),
        asset_id: check_asset_id(input.asset_id.as_deref()),
    }
}

pub fn validate_output(output: &TxOutput) -> RecordValidation {
    RecordValidation {
        amount: check_amount(&output.amount),
        asset_id: check_asset_id(output.asset_id.as_deref()),
    }
}

pub fn validate_template(template: &TxTemplate) -> TemplateValidation {
    TemplateValidation {
        inputs: template.inputs.iter().map(validate_input).collect(),
        outputs: template.outputs.iter().map(validate_output).collect(),
        version: check_version(&template.version),
        timelock: check_timelock(&template.timelock),
    }
}
