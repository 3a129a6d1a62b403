//! Hex Input Sanitization
//!
//! Shape checks for the raw hexadecimal strings users type into the
//! workbench. These run before any cryptographic primitive is touched.

use crate::error::{WorkbenchError, WorkbenchResult};

/// Check that a string is well-formed hex: even length, hex digits only.
///
/// The empty string is valid (a field that has not been filled in yet).
pub fn valid_hex(input: &str) -> bool {
    input.len() % 2 == 0 && input.chars().all(|c| c.is_ascii_hexdigit())
}

/// Strip a leading `0x` if present
pub fn strip_hex_prefix(input: &str) -> &str {
    input.strip_prefix("0x").unwrap_or(input)
}

/// Remove every whitespace character from user input
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Check that a field is either empty or exactly `expected_chars` of valid hex
pub fn is_fixed_hex_or_empty(input: &str, expected_chars: usize) -> bool {
    input.is_empty() || (input.len() == expected_chars && valid_hex(input))
}

/// Validate and decode a hex string
pub fn validate_hex(input: &str, expected_bytes: Option<usize>) -> WorkbenchResult<Vec<u8>> {
    let clean = strip_hex_prefix(input);

    if !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WorkbenchError::invalid_input("Invalid hexadecimal string"));
    }

    if clean.len() % 2 != 0 {
        return Err(WorkbenchError::invalid_input(
            "Hex string must have even number of characters"
        ));
    }

    let bytes = hex::decode(clean)
        .map_err(|e| WorkbenchError::invalid_input(format!("Failed to decode hex: {}", e)))?;

    if let Some(expected) = expected_bytes {
        if bytes.len() != expected {
            return Err(WorkbenchError::invalid_input(format!(
                "Expected {} bytes, got {}",
                expected,
                bytes.len()
            )));
        }
    }

    Ok(bytes)
}
