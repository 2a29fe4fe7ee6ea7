//! Configuration Loader
//!
//! Environment-aware layering of defaults, config files and environment
//! variables on top of the `config` crate.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::PluginConfig;
use crate::error::Result;

/// Environment variable prefix; nesting uses a double underscore,
/// e.g. `INTERACTION__STATUS_SERVICE__BASE_URL`
pub const ENV_PREFIX: &str = "INTERACTION";

/// Explicit config file location
pub const CONFIG_PATH_VAR: &str = "INTERACTION_CONFIG_PATH";

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["config/interaction.toml", "interaction.toml"];

/// Builder for a layered [`PluginConfig`]
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    environment: Option<String>,
    env_source: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this file instead of searching the default locations
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Override the detected environment name
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Read overrides from this map instead of the process environment
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Build and validate the configuration
    pub fn load(self) -> Result<PluginConfig> {
        let environment = self
            .environment
            .clone()
            .unwrap_or_else(detect_environment);

        let mut builder = Config::builder().add_source(Config::try_from(&PluginConfig::default())?);

        if let Some(path) = self.resolve_config_path() {
            debug!(
                path = %path.display(),
                environment = %environment,
                "Loading interaction plugin configuration file"
            );
            builder = builder.add_source(File::from(path.clone()).required(true));

            if let Some(overlay) = environment_overlay(&path, &environment) {
                debug!(path = %overlay.display(), "Applying environment overlay");
                builder = builder.add_source(File::from(overlay).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(self.env_source),
        );

        let config: PluginConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(config = %config.sanitized(), "Configuration loaded successfully");
        Ok(config)
    }

    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .map(Path::to_path_buf)
    }
}

/// `config/interaction.toml` + `production` → `config/interaction.production.toml`
fn environment_overlay(path: &Path, environment: &str) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let extension = path.extension()?.to_str()?;
    let overlay = path.with_file_name(format!("{stem}.{environment}.{extension}"));
    overlay.is_file().then_some(overlay)
}

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    std::env::var("INTERACTION_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}
