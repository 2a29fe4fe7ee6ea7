//! # Plugin Configuration
//!
//! Settings for reaching the Execution Status Service, the polling cadence and
//! log output. Values are layered by [`ConfigLoader`]: built-in defaults, then
//! an optional TOML/YAML/JSON file (plus an environment-specific overlay),
//! then `INTERACTION__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interaction_plugin::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! println!("status service: {}", config.status_service.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::polling;
use crate::error::{InteractionError, Result};

pub use loader::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Where and how to reach the Execution Status Service
    pub status_service: StatusServiceConfig,

    /// Interaction wait behaviour
    pub interaction: InteractionConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// Connection settings for the Execution Status Service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusServiceConfig {
    /// Base URL of the workflow backend (e.g. "<http://localhost:8080>")
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Value for the `Authorization` header, if the backend requires one
    pub auth_token: Option<String>,
}

impl Default for StatusServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 30000,
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Seconds between two reads of the step while waiting
    pub poll_interval_seconds: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: polling::DEFAULT_POLL_INTERVAL_SECONDS,
        }
    }
}

impl InteractionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// Console log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Explicit filter directive; falls back to an environment-based level
    pub level: Option<String>,
}

impl PluginConfig {
    /// Reject values that would make the plugin misbehave at runtime
    pub fn validate(&self) -> Result<()> {
        let base_url = self.status_service.base_url.trim();
        if base_url.is_empty() {
            return Err(InteractionError::config_error(
                "status_service.base_url must not be empty",
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(InteractionError::config_error(format!(
                "status_service.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }
        if self.status_service.timeout_ms == 0 {
            return Err(InteractionError::config_error(
                "status_service.timeout_ms must be greater than zero",
            ));
        }
        if self.interaction.poll_interval_seconds == 0 {
            return Err(InteractionError::config_error(
                "interaction.poll_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }

    /// JSON view of the configuration with credentials masked, for logging
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::json!(self);
        if let Some(token) = self.status_service.auth_token.as_deref() {
            let chars: Vec<char> = token.chars().collect();
            let masked = if chars.len() > 4 {
                let head: String = chars[..2].iter().collect();
                let tail: String = chars[chars.len() - 2..].iter().collect();
                format!("[MASKED: {head}***{tail}]")
            } else {
                "[MASKED]".to_string()
            };
            value["status_service"]["auth_token"] = serde_json::Value::String(masked);
        }
        value
    }
}
