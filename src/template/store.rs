//! Transaction template store
//!
//! Keeps the in-memory template and mirrors it to a single key-value slot.
//! Every edit replaces the affected record wholesale. Persistence is
//! best-effort: read, write and evict failures are logged and absorbed.

use super::types::{TxInput, TxOutput, TxTemplate};
use super::validation::{validate_template, TemplateValidation};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::{log_debug, log_info, log_warn};

/// Slot the template is persisted under
pub const DEFAULT_TEMPLATE_KEY: &str = "txData";

const MODULE: &str = "template";

/// Receives the template when the user saves or clears it
pub trait TemplateListener {
    fn on_save(&mut self, template: &TxTemplate);

    fn on_clear(&mut self);
}

/// Editable transaction template backed by a key-value slot
pub struct TransactionTemplateStore<S: KeyValueStore = MemoryStore> {
    store: S,
    key: String,
    template: TxTemplate,
    listener: Option<Box<dyn TemplateListener>>,
}

impl<S: KeyValueStore> TransactionTemplateStore<S> {
    /// Open on the default slot and restore any saved template
    pub fn open(store: S) -> Self {
        Self::open_with_key(store, DEFAULT_TEMPLATE_KEY)
    }

    pub fn open_with_key(store: S, key: impl Into<String>) -> Self {
        let mut this = Self {
            store,
            key: key.into(),
            template: TxTemplate::blank(),
            listener: None,
        };
        this.restore();
        this
    }

    pub fn with_listener(mut self, listener: Box<dyn TemplateListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Load the persisted template if the in-memory one is still pristine.
    ///
    /// Returns whether a template was restored. Unreadable, unparsable and
    /// malformed payloads all count as nothing restored.
    pub fn restore(&mut self) -> bool {
        if !self.template.is_pristine() {
            return false;
        }

        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                log_warn!(MODULE, "Failed to read saved template", key = self.key, error = e);
                return false;
            }
        };

        let template: TxTemplate = match serde_json::from_str(&raw) {
            Ok(template) => template,
            Err(e) => {
                log_warn!(MODULE, "Ignoring unparsable saved template", key = self.key, error = e);
                return false;
            }
        };

        if !template.is_well_formed() {
            log_warn!(
                MODULE,
                "Ignoring malformed saved template",
                inputs = template.inputs.len(),
                outputs = template.outputs.len(),
                current_input_index = template.current_input_index
            );
            return false;
        }

        log_info!(
            MODULE,
            "Restored saved template",
            inputs = template.inputs.len(),
            outputs = template.outputs.len()
        );
        self.template = template;
        true
    }

    pub fn template(&self) -> &TxTemplate {
        &self.template
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // MARK: - Inputs

    /// Replace the input at `index`, optionally making it the current one
    pub fn update_input(&mut self, index: usize, input: TxInput, select_as_current: bool) {
        match self.template.inputs.get_mut(index) {
            Some(slot) => {
                *slot = input;
                if select_as_current {
                    self.template.current_input_index = index;
                }
            }
            None => ignore_index("update_input", index, self.template.inputs.len()),
        }
    }

    pub fn add_input(&mut self) {
        self.template.inputs.push(TxInput::blank());
    }

    /// Remove an input. The last remaining input is never removed.
    pub fn remove_input(&mut self, index: usize) {
        let len = self.template.inputs.len();
        if len <= 1 {
            return;
        }
        if index >= len {
            ignore_index("remove_input", index, len);
            return;
        }

        self.template.inputs.remove(index);

        let mut current = self.template.current_input_index;
        if index < current {
            current -= 1;
        }
        self.template.current_input_index = current.min(len - 2);
    }

    pub fn select_input(&mut self, index: usize) {
        if index < self.template.inputs.len() {
            self.template.current_input_index = index;
        } else {
            ignore_index("select_input", index, self.template.inputs.len());
        }
    }

    // MARK: - Outputs

    pub fn update_output(&mut self, index: usize, output: TxOutput) {
        match self.template.outputs.get_mut(index) {
            Some(slot) => *slot = output,
            None => ignore_index("update_output", index, self.template.outputs.len()),
        }
    }

    pub fn add_output(&mut self) {
        self.template.outputs.push(TxOutput::blank());
    }

    /// Remove an output. The last remaining output is never removed.
    pub fn remove_output(&mut self, index: usize) {
        let len = self.template.outputs.len();
        if len <= 1 {
            return;
        }
        if index >= len {
            ignore_index("remove_output", index, len);
            return;
        }
        self.template.outputs.remove(index);
    }

    // MARK: - Header

    pub fn set_version(&mut self, version: &str) {
        self.template.version = version.to_string();
    }

    pub fn set_timelock(&mut self, timelock: &str) {
        self.template.timelock = timelock.to_string();
    }

    /// Advisory messages for the current template
    pub fn validate(&self) -> TemplateValidation {
        validate_template(&self.template)
    }

    // MARK: - Persistence

    /// Persist the template as-is (invalid fields included) and notify the listener
    pub fn save(&mut self) {
        match serde_json::to_string(&self.template) {
            Ok(json) => match self.store.set(&self.key, &json) {
                Ok(()) => log_debug!(MODULE, "Saved template", key = self.key, bytes = json.len()),
                Err(e) => log_warn!(MODULE, "Failed to persist template", key = self.key, error = e),
            },
            Err(e) => log_warn!(MODULE, "Failed to serialize template", error = e),
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_save(&self.template);
        }
    }

    /// Reset to the blank template, evict the saved copy and notify the listener
    pub fn clear(&mut self) {
        self.template = TxTemplate::blank();

        match self.store.remove(&self.key) {
            Ok(()) => log_info!(MODULE, "Cleared template", key = self.key),
            Err(e) => log_warn!(MODULE, "Failed to evict saved template", key = self.key, error = e),
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_clear();
        }
    }
}

fn ignore_index(operation: &str, index: usize, len: usize) {
    log_warn!(MODULE, "Ignoring out-of-range index", operation = operation, index = index, len = len);
}
