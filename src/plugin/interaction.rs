//! # Interaction Controller
//!
//! Parks a workflow step until a human approves or rejects it, or until the
//! configured timeout auto-approves it.
//!
//! ## Flow
//!
//! ```text
//! announce waiting ──→ execution: interactionWaiting ──→ poll step every 5s
//!                                                          │
//!            ┌─────────── interacted / timeout ───────────┘
//!            ▼
//! execution: running ──→ persist approved | rejected ──→ result to host
//! ```
//!
//! Every step write goes through the [`InteractionStateMachine`] so the
//! persisted record always matches the phase the controller is in. Any step
//! read or write failure ends the invocation immediately; execution status
//! flips are best effort and only logged when they fail.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::descriptor::INTERACTION_DESCRIPTOR;
use super::traits::ActionPlugin;
use crate::config::InteractionConfig;
use crate::constants::{polling, response};
use crate::error::{InteractionError, Result};
use crate::logging::{log_error, log_step_operation};
use crate::models::{
    AlertHandlerRequest, ExecuteTaskRequest, ExecutionStep, PluginDescriptor, PluginResponse,
};
use crate::state_machine::{InteractionEvent, InteractionPhase, InteractionStateMachine};
use crate::status_service::ExecutionStatusService;

/// How the poll loop ended
#[derive(Debug, Clone, PartialEq)]
enum WaitOutcome {
    /// A decision was read back from the step record
    Decided(InteractionEvent),
    /// The timeout elapsed and the auto-approval was persisted
    TimedOut,
    /// `interacted` was set without either outcome flag
    Undecided,
}

/// The interaction-wait action
#[derive(Debug, Clone)]
pub struct InteractionPlugin<S> {
    status_service: S,
    poll_interval: Duration,
}

impl<S: ExecutionStatusService> InteractionPlugin<S> {
    pub fn new(status_service: S) -> Self {
        Self {
            status_service,
            poll_interval: polling::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn from_config(status_service: S, config: &InteractionConfig) -> Self {
        Self::new(status_service).with_poll_interval(config.poll_interval())
    }

    /// Override the delay between two step reads
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn status_service(&self) -> &S {
        &self.status_service
    }

    /// Drive one step from "not yet waiting" to its final outcome
    #[instrument(
        skip(self, request),
        fields(execution_id = %request.execution.id, step_id = %request.step.id)
    )]
    pub async fn execute(&self, request: &ExecuteTaskRequest) -> Result<PluginResponse> {
        let execution = &request.execution;
        let timeout_seconds = request.step.action.timeout_seconds();
        let mut machine = InteractionStateMachine::new(request.step.id, timeout_seconds);

        info!(timeout_seconds, "Starting interaction step");

        self.persist(&mut machine, execution.id, InteractionEvent::BeginWaiting)
            .await?;

        if let Err(e) = self
            .status_service
            .set_to_interaction_required(execution)
            .await
        {
            warn!(error = %e, "Failed to flag execution as waiting for interaction");
        }

        let outcome = self.wait_for_interaction(&mut machine, execution.id).await?;

        if let Err(e) = self.status_service.set_to_running(execution).await {
            warn!(error = %e, "Failed to flag execution as running again");
        }

        match outcome {
            WaitOutcome::Decided(InteractionEvent::Reject) => {
                self.persist(&mut machine, execution.id, InteractionEvent::Reject)
                    .await?;
                info!("Interaction rejected, canceling execution");
                Ok(PluginResponse::failure().with_data(response::STATUS, response::CANCELED))
            }
            WaitOutcome::Decided(_) | WaitOutcome::TimedOut => {
                self.persist(&mut machine, execution.id, InteractionEvent::Approve)
                    .await?;
                info!(phase = %machine.phase(), "Interaction approved, continuing");
                Ok(PluginResponse::success())
            }
            WaitOutcome::Undecided => {
                warn!("Step marked as interacted without approval or rejection, continuing");
                Ok(PluginResponse::success())
            }
        }
    }

    /// Poll the step until a human acts or the timeout elapses.
    ///
    /// The timeout is compared against the loop start once per iteration, so
    /// it resolves on the first poll at or after the deadline.
    async fn wait_for_interaction(
        &self,
        machine: &mut InteractionStateMachine,
        execution_id: Uuid,
    ) -> Result<WaitOutcome> {
        let timeout = Duration::from_secs(machine.timeout_seconds());
        let started = Instant::now();
        let mut polls: u64 = 0;

        loop {
            polls += 1;
            let step = self
                .status_service
                .get_step(execution_id, machine.step_id())
                .await
                .map_err(|e| {
                    error!(error = %e, polls, "Error getting step data");
                    InteractionError::fetch(e)
                })?;

            if step.interacted {
                debug!(
                    polls,
                    approved = step.interaction_approved,
                    rejected = step.interaction_rejected,
                    "Interaction received"
                );
                return Ok(Self::classify(&step));
            }

            if !timeout.is_zero() && started.elapsed() >= timeout {
                debug!(
                    polls,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Timeout reached while waiting for user interaction"
                );
                self.persist(machine, execution_id, InteractionEvent::TimeOut)
                    .await?;
                return Ok(WaitOutcome::TimedOut);
            }

            sleep(self.poll_interval).await;
        }
    }

    fn classify(step: &ExecutionStep) -> WaitOutcome {
        match InteractionEvent::from_snapshot(step) {
            Some(event) => WaitOutcome::Decided(event),
            None => WaitOutcome::Undecided,
        }
    }

    /// Persist the patch for `event`, then advance the machine
    async fn persist(
        &self,
        machine: &mut InteractionStateMachine,
        execution_id: Uuid,
        event: InteractionEvent,
    ) -> Result<InteractionPhase> {
        let transition = machine.transition(event)?;

        self.status_service
            .update_step(execution_id, &transition.patch)
            .await
            .map_err(|e| {
                log_error(
                    "interaction_controller",
                    "update_step",
                    &e.to_string(),
                    Some(event.event_type()),
                );
                InteractionError::persistence(event.event_type(), e)
            })?;

        log_step_operation(
            event.event_type(),
            execution_id,
            machine.step_id(),
            transition.to.step_status().as_str(),
            None,
        );

        machine.commit(&transition)
    }
}

#[async_trait]
impl<S: ExecutionStatusService> ActionPlugin for InteractionPlugin<S> {
    fn info(&self) -> PluginDescriptor {
        INTERACTION_DESCRIPTOR
    }

    async fn execute_task(&self, request: &ExecuteTaskRequest) -> Result<PluginResponse> {
        self.execute(request).await
    }

    /// Interaction steps cannot be triggered by alerts
    async fn handle_alert(&self, _request: &AlertHandlerRequest) -> Result<PluginResponse> {
        warn!("Alert routed to the interaction action, which does not handle alerts");
        Err(InteractionError::NotImplemented(
            "interaction does not handle alerts".to_string(),
        ))
    }
}
