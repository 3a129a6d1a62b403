//! Workbench Configuration
//!
//! Settings supplied by the embedding application:
//! - Target network for the taproot engine
//! - Where the template slot is persisted (memory or a directory)
//! - Debug logging

use crate::error::{WorkbenchError, WorkbenchResult};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::template::{TransactionTemplateStore, DEFAULT_TEMPLATE_KEY};
use crate::tweak::TaprootTweakEngine;
use crate::types::Network;
use crate::utils::logging;
use std::path::PathBuf;

pub const ENV_NETWORK: &str = "TAPSCRIPT_NETWORK";
pub const ENV_STORAGE_DIR: &str = "TAPSCRIPT_STORAGE_DIR";
pub const ENV_DEBUG: &str = "TAPSCRIPT_DEBUG";

/// Workbench settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbenchConfig {
    /// Network the taproot engine derives outputs for
    pub network: Network,
    /// Directory for persisted templates; `None` keeps them in memory
    pub storage_dir: Option<PathBuf>,
    /// Slot the template is saved under
    pub template_key: String,
    /// Emit debug-level log lines
    pub debug_logging: bool,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            storage_dir: None,
            template_key: DEFAULT_TEMPLATE_KEY.to_string(),
            debug_logging: false,
        }
    }
}

impl WorkbenchConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> WorkbenchResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> WorkbenchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_NETWORK) {
            config.network = raw.parse().map_err(|e: String| {
                WorkbenchError::config_error(format!("Invalid {}", ENV_NETWORK)).with_details(e)
            })?;
        }

        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            if !dir.trim().is_empty() {
                config.storage_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(raw) = lookup(ENV_DEBUG) {
            config.debug_logging = parse_flag(&raw).ok_or_else(|| {
                WorkbenchError::config_error(format!("Invalid {}", ENV_DEBUG))
                    .with_details(format!("got '{}'", raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WorkbenchResult<()> {
        if self.template_key.trim().is_empty() {
            return Err(WorkbenchError::config_error("Template key must not be empty"));
        }
        Ok(())
    }

    /// Apply the debug flag to the global logger
    pub fn apply_logging(&self) {
        if self.debug_logging {
            logging::enable_debug();
        } else {
            logging::disable_debug();
        }
    }

    /// Tweak engine for the configured network
    pub fn tweak_engine(&self) -> TaprootTweakEngine {
        TaprootTweakEngine::new(self.network)
    }

    /// Template store on the configured backend, restored from its slot
    pub fn open_template_store(
        &self,
    ) -> WorkbenchResult<TransactionTemplateStore<Box<dyn KeyValueStore>>> {
        self.validate()?;

        let backend: Box<dyn KeyValueStore> = match &self.storage_dir {
            Some(dir) => Box::new(FileStore::open(dir)?),
            None => Box::new(MemoryStore::new()),
        };

        Ok(TransactionTemplateStore::open_with_key(backend, self.template_key.clone()))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
