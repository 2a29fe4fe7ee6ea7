//! # Interaction Plugin Error Types
//!
//! Every failure of an interaction step surfaces as an [`InteractionError`].
//! Status-service failures are terminal for the invocation: nothing here is
//! retried, the host retries the whole step if it wants resilience.

use crate::models::PluginResponse;
use thiserror::Error;
use uuid::Uuid;

/// Plugin operation result type
pub type Result<T> = std::result::Result<T, InteractionError>;

#[derive(Debug, Error)]
pub enum InteractionError {
    /// A step write against the status service failed
    #[error("Failed to persist step update ({stage}): {source}")]
    Persistence {
        stage: &'static str,
        #[source]
        source: Box<InteractionError>,
    },

    /// Reading the step back while polling failed
    #[error("Failed to fetch step during polling: {source}")]
    Fetch {
        #[source]
        source: Box<InteractionError>,
    },

    #[cfg(feature = "http-client")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Status service error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Step not found: {step_id}")]
    StepNotFound { step_id: Uuid },

    #[error("Invalid interaction transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl InteractionError {
    /// Wrap a status-service failure raised while writing the step
    pub fn persistence(stage: &'static str, source: InteractionError) -> Self {
        Self::Persistence {
            stage,
            source: Box::new(source),
        }
    }

    /// Wrap a status-service failure raised while polling the step
    pub fn fetch(source: InteractionError) -> Self {
        Self::Fetch {
            source: Box::new(source),
        }
    }

    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The failure result a host sees for this error
    pub fn to_response(&self) -> PluginResponse {
        PluginResponse::failure()
    }

    /// Whether retrying the whole step could plausibly succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Persistence { source, .. } | Self::Fetch { source } => source.is_transient(),
            #[cfg(feature = "http-client")]
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<config::ConfigError> for InteractionError {
    fn from(error: config::ConfigError) -> Self {
        InteractionError::Configuration(error.to_string())
    }
}
