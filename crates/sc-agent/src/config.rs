//! Agent configuration
//!
//! ```toml
//! ordinal_relation_count = 10
//! log_profile = "production"
//! ```

use std::path::Path;

use sc_core::keynodes::DEFAULT_ORDINAL_RELATION_COUNT;
use sc_core::logging_facility::Profile;
use serde::Deserialize;

use crate::errors::{config_error, io_error, Result};

/// Upper bound for `ordinal_relation_count`; each relation is a keynode
pub const MAX_ORDINAL_RELATION_COUNT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Number of `rrel_*` keynodes; commands take at most one less parameter
    pub ordinal_relation_count: usize,
    pub log_profile: Profile,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ordinal_relation_count: DEFAULT_ORDINAL_RELATION_COUNT,
            log_profile: Profile::Development,
        }
    }
}

impl AgentConfig {
    /// # Errors
    ///
    /// Returns `ConfigInvalid` on malformed TOML, unknown keys, or values
    /// rejected by `validate`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AgentConfig =
            toml::from_str(text).map_err(|e| config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read, otherwise as `from_toml_str`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// Returns `ConfigInvalid` when `ordinal_relation_count` is zero or above
    /// `MAX_ORDINAL_RELATION_COUNT`.
    pub fn validate(&self) -> Result<()> {
        if self.ordinal_relation_count == 0 {
            return Err(config_error("ordinal_relation_count must be at least 1"));
        }
        if self.ordinal_relation_count > MAX_ORDINAL_RELATION_COUNT {
            return Err(config_error(format!(
                "ordinal_relation_count must be at most {}, got {}",
                MAX_ORDINAL_RELATION_COUNT, self.ordinal_relation_count
            )));
        }
        Ok(())
    }
}
