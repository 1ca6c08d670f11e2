//! Config file loading and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hdlint_kernel::ValidationConfig;

use crate::cli::ConfigArgs;
use crate::paths;

/// A config file that exists but could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Parse a TOML config file.
pub fn load_file(path: &Path) -> Result<ValidationConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: &Path) -> Result<ValidationConfig, ConfigError> {
    if path.exists() {
        load_file(path)
    } else {
        tracing::debug!("no config at {}, using defaults", path.display());
        Ok(ValidationConfig::default())
    }
}

impl ConfigArgs {
    /// Build the effective config: file (explicit or default), then flags.
    ///
    /// An explicit `--config` must exist; the default location may not.
    pub fn resolve(&self) -> Result<ValidationConfig> {
        let mut config = match &self.config {
            Some(path) => load_file(path).context("failed to load --config")?,
            None => load_or_default(&paths::config_file())
                .context("failed to load default config")?,
        };

        if let Some(max_bytes) = self.max_bytes {
            config.max_bytes = max_bytes;
        }
        for key in &self.disable {
            config.set_enabled(key.clone(), false);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_file() {
        let file = write_config(
            r#"
max_bytes = 1024
debounce_ms = 100
python = "/usr/bin/python3.12"

[validate]
xml = false
"#,
        );
        let config = load_file(file.path()).unwrap();

        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.python, "/usr/bin/python3.12");
        assert!(!config.is_enabled("xml"));
        assert!(config.is_enabled("json"));
    }

    #[test]
    fn empty_file_is_defaults() {
        let file = write_config("");
        assert_eq!(load_file(file.path()).unwrap(), ValidationConfig::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write_config("max_bytes = \"lots\"");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let file = write_config("max_size = 10");
        assert!(matches!(
            load_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_default_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn missing_explicit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            config: Some(dir.path().join("nope.toml")),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"), "got {err:#}");
    }

    #[test]
    fn flags_override_file() {
        let file = write_config("max_bytes = 1024\n[validate]\nyaml = true\n");
        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            max_bytes: Some(8),
            disable: vec!["yaml".into(), "python".into()],
        };
        let config = args.resolve().unwrap();

        assert_eq!(config.max_bytes, 8);
        assert!(!config.is_enabled("yaml"));
        assert!(!config.is_enabled("python"));
        assert!(config.is_enabled("json"));
    }
}
