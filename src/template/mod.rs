//! Transaction Template
//!
//! Scratchpad for raw transaction assembly:
//! - Input/output records kept as raw hex text
//! - Advisory per-field validation
//! - Persistence to a single key-value slot with pristine-only restore

pub mod store;
pub mod types;
pub mod validation;

pub use store::{TemplateListener, TransactionTemplateStore, DEFAULT_TEMPLATE_KEY};
pub use types::{TxInput, TxOutput, TxTemplate};
pub use validation::{validate_template, RecordValidation, TemplateValidation};
