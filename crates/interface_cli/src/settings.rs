//! Runtime settings
//!
//! Thresholds come from an optional TOML or JSON file, overridden by
//! `VERIFY_`-prefixed environment variables, for example
//! `VERIFY_REJECT_THRESHOLD=15`. Anything not set keeps its default.

use std::collections::HashMap;
use std::path::Path;

use domain_verification::{ConfigurationError, Thresholds, VerificationConfig};
use serde::Deserialize;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "VERIFY";

/// Settings for the binary itself
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl CliSettings {
    /// Loads settings from the environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}

/// Loads thresholds from `path` (if any) layered under the process environment
pub fn load_thresholds(path: Option<&Path>) -> Result<VerificationConfig, ConfigurationError> {
    load_thresholds_with_env(path, None)
}

/// Like [`load_thresholds`], reading overrides from `env` instead of the process
/// environment when it is given
pub fn load_thresholds_with_env(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<VerificationConfig, ConfigurationError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).source(env));

    let thresholds: Thresholds = builder
        .build()
        .and_then(|settings| settings.try_deserialize())
        .map_err(|e| ConfigurationError::Load(e.to_string()))?;

    tracing::debug!(?thresholds, "Loaded verification thresholds");
    VerificationConfig::new(thresholds)
}
