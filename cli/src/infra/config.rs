//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{ProvisionConfig, collect_keys, validate_config_key};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ENVPROV_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "envprov.yaml";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
///
/// Lookup order: explicit path (`--config`), `$ENVPROV_CONFIG`,
/// `./envprov.yaml`, then `<config dir>/envprov/config.yaml`.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    fn candidates(&self) -> Vec<(PathBuf, bool)> {
        if let Some(path) = &self.explicit {
            return vec![(path.clone(), true)];
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return vec![(PathBuf::from(val), true)];
        }
        let mut out = vec![(PathBuf::from(LOCAL_CONFIG_FILE), false)];
        if let Some(dir) = dirs::config_dir() {
            out.push((dir.join("envprov").join("config.yaml"), false));
        }
        out
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        let Some(path) = self.path() else {
            tracing::debug!("no config file, using defaults");
            return Ok(ProvisionConfig::default());
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config = parse(&content).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn path(&self) -> Option<PathBuf> {
        for (path, required) in self.candidates() {
            // An explicitly named file is returned even when absent so that
            // `load` reports it instead of silently falling back.
            if required || path.is_file() {
                return Some(path);
            }
        }
        None
    }
}

/// Parse YAML config text, rejecting unknown keys.
///
/// # Errors
///
/// Returns an error for malformed YAML, unknown keys, or type mismatches.
pub fn parse(content: &str) -> Result<ProvisionConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content).context("cannot parse YAML")?;
    if raw.is_null() {
        return Ok(ProvisionConfig::default());
    }
    for key in collect_keys(&raw) {
        validate_config_key(&key)?;
    }
    serde_yaml::from_value(raw).context("cannot parse config")
}
