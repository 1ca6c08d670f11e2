//! Validation settings.
//!
//! Deserialized from the `hdlint` config file; every field has a default so
//! a partial (or empty) file is fine.
//!
//! ```toml
//! max_bytes = 65536
//! debounce_ms = 250
//! python = "python3"
//!
//! [validate]
//! json = true
//! yaml = true
//! xml = false
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::validators::DEFAULT_INTERPRETER;

/// Default body size ceiling (64KB).
pub const DEFAULT_MAX_BYTES: usize = 64 * 1024;

/// Default quiet period before a natural revalidation pass.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Settings for scanning, dispatch, and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Bodies larger than this many bytes are skipped.
    pub max_bytes: usize,
    /// Debounce interval for the scheduler, in milliseconds.
    pub debounce_ms: u64,
    /// Interpreter for the Python checker.
    pub python: String,
    /// Per-validator enable flags. Keys not listed are enabled.
    pub validate: BTreeMap<String, bool>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            python: DEFAULT_INTERPRETER.to_string(),
            validate: BTreeMap::new(),
        }
    }
}

impl ValidationConfig {
    /// Whether the validator with `key` should run.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.validate.get(key).copied().unwrap_or(true)
    }

    /// Turn a validator on or off.
    pub fn set_enabled(&mut self, key: impl Into<String>, enabled: bool) {
        self.validate.insert(key.into(), enabled);
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_bytes, 65536);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.python, "python3");
        assert!(config.is_enabled("json"));
        assert!(config.is_enabled("anything"));
    }

    #[test]
    fn toggling() {
        let mut config = ValidationConfig::default();
        config.set_enabled("xml", false);
        assert!(!config.is_enabled("xml"));
        assert!(config.is_enabled("yaml"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ValidationConfig =
            serde_json::from_str(r#"{"max_bytes": 10, "validate": {"yaml": false}}"#).unwrap();
        assert_eq!(config.max_bytes, 10);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(!config.is_enabled("yaml"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = serde_json::from_str::<ValidationConfig>(r#"{"max_byte": 10}"#);
        assert!(result.is_err());
    }
}
