//! # Execution Status Service
//!
//! The external store that owns step and execution records. The interaction
//! controller reads and writes it only through [`ExecutionStatusService`].
//!
//! ## Implementations
//!
//! - [`HttpStatusService`]: REST client for the workflow backend
//! - [`crate::test_helpers::InMemoryStatusService`]: in-process store with
//!   scripted human decisions, for tests and dry runs

#[cfg(feature = "http-client")]
pub mod http;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Execution, ExecutionStep, StepPatch};
use crate::state_machine::ExecutionStatus;

#[cfg(feature = "http-client")]
pub use http::HttpStatusService;

/// Read/write access to step and execution state
///
/// Every method is a single remote call. Implementations do not retry;
/// the caller decides what a failure means.
#[async_trait]
pub trait ExecutionStatusService: Send + Sync + 'static {
    /// Apply a partial update to a step. Fields left unset are not touched.
    async fn update_step(&self, execution_id: Uuid, patch: &StepPatch) -> Result<()>;

    /// Fetch the current snapshot of a step
    async fn get_step(&self, execution_id: Uuid, step_id: Uuid) -> Result<ExecutionStep>;

    /// Replace the coarse status of an execution
    async fn set_execution_status(
        &self,
        execution: &Execution,
        status: ExecutionStatus,
    ) -> Result<()>;

    /// Flag the execution as blocked on a human decision
    async fn set_to_interaction_required(&self, execution: &Execution) -> Result<()> {
        self.set_execution_status(execution, ExecutionStatus::InteractionWaiting)
            .await
    }

    /// Flag the execution as running again
    async fn set_to_running(&self, execution: &Execution) -> Result<()> {
        self.set_execution_status(execution, ExecutionStatus::Running)
            .await
    }
}

#[async_trait]
impl<S: ExecutionStatusService + ?Sized> ExecutionStatusService for Arc<S> {
    async fn update_step(&self, execution_id: Uuid, patch: &StepPatch) -> Result<()> {
        (**self).update_step(execution_id, patch).await
    }

    async fn get_step(&self, execution_id: Uuid, step_id: Uuid) -> Result<ExecutionStep> {
        (**self).get_step(execution_id, step_id).await
    }

    async fn set_execution_status(
        &self,
        execution: &Execution,
        status: ExecutionStatus,
    ) -> Result<()> {
        (**self).set_execution_status(execution, status).await
    }

    async fn set_to_interaction_required(&self, execution: &Execution) -> Result<()> {
        (**self).set_to_interaction_required(execution).await
    }

    async fn set_to_running(&self, execution: &Execution) -> Result<()> {
        (**self).set_to_running(execution).await
    }
}
