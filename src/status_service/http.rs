//! # HTTP Status Service Client
//!
//! REST client for the workflow backend's execution endpoints.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | update step | `PUT  /api/v1/executions/{execution_id}/steps/{step_id}` (patch body) |
//! | get step | `GET  /api/v1/executions/{execution_id}/steps/{step_id}` |
//! | set execution status | `PUT  /api/v1/executions/{execution_id}` (execution body) |

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

use super::ExecutionStatusService;
use crate::config::StatusServiceConfig;
use crate::error::{InteractionError, Result};
use crate::models::{Execution, ExecutionStep, StepPatch};
use crate::state_machine::ExecutionStatus;

/// Step payloads come back either bare or wrapped in `{"result": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum StepBody {
    Wrapped { result: ExecutionStep },
    Bare(ExecutionStep),
}

impl StepBody {
    fn into_step(self) -> ExecutionStep {
        match self {
            Self::Wrapped { result } => result,
            Self::Bare(step) => step,
        }
    }
}

/// HTTP client for the Execution Status Service
#[derive(Clone)]
pub struct HttpStatusService {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl std::fmt::Debug for HttpStatusService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatusService")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl HttpStatusService {
    /// Create a client from the status service configuration
    ///
    /// Fails on a malformed base URL or an auth token that is not a valid
    /// header value.
    pub fn new(config: &StatusServiceConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| InteractionError::config_error(format!("Invalid base URL: {e}")))?;
        // keep any path prefix when joining relative endpoint paths
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut client_builder = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("interaction-plugin/{}", env!("CARGO_PKG_VERSION")));

        if let Some(token) = config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            let mut default_headers = reqwest::header::HeaderMap::new();
            default_headers.insert(
                reqwest::header::AUTHORIZATION,
                token.parse().map_err(|e| {
                    InteractionError::config_error(format!("Invalid auth token: {e}"))
                })?,
            );
            client_builder = client_builder.default_headers(default_headers);
            debug!("Configured status service authorization header");
        }

        let client = client_builder
            .build()
            .map_err(|e| InteractionError::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| InteractionError::config_error(format!("Failed to construct URL: {e}")))
    }

    fn step_url(&self, execution_id: Uuid, step_id: Uuid) -> Result<Url> {
        self.endpoint(&format!("api/v1/executions/{execution_id}/steps/{step_id}"))
    }

    fn execution_url(&self, execution_id: Uuid) -> Result<Url> {
        self.endpoint(&format!("api/v1/executions/{execution_id}"))
    }

    /// Turn a non-2xx response into an API error
    async fn ensure_success(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(status = %status, error = %error_text, "Failed operation: {}", operation);
        Err(InteractionError::api_error(status.as_u16(), error_text))
    }
}

#[async_trait]
impl ExecutionStatusService for HttpStatusService {
    async fn update_step(&self, execution_id: Uuid, patch: &StepPatch) -> Result<()> {
        let url = self.step_url(execution_id, patch.id)?;
        debug!(url = %url, step_id = %patch.id, status = ?patch.status, "Updating step");

        let response = self.client.put(url).json(patch).send().await?;
        Self::ensure_success(response, "update_step").await?;
        Ok(())
    }

    async fn get_step(&self, execution_id: Uuid, step_id: Uuid) -> Result<ExecutionStep> {
        let url = self.step_url(execution_id, step_id)?;
        debug!(url = %url, step_id = %step_id, "Fetching step");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(InteractionError::StepNotFound { step_id });
        }
        let response = Self::ensure_success(response, "get_step").await?;

        let body = response.bytes().await?;
        let step = serde_json::from_slice::<StepBody>(&body)?.into_step();
        Ok(step)
    }

    async fn set_execution_status(
        &self,
        execution: &Execution,
        status: ExecutionStatus,
    ) -> Result<()> {
        let url = self.execution_url(execution.id)?;
        debug!(url = %url, execution_id = %execution.id, status = %status, "Updating execution status");

        let response = self
            .client
            .put(url)
            .json(&execution.with_status(status))
            .send()
            .await?;
        Self::ensure_success(response, "set_execution_status").await?;
        Ok(())
    }
}
