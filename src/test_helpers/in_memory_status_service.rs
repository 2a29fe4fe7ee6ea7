//! In-process [`ExecutionStatusService`] with scripted human decisions.
//!
//! Decisions are keyed to `tokio::time::Instant`, so tests running on a
//! paused clock resolve them deterministically.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::error::{InteractionError, Result};
use crate::models::{Execution, ExecutionStep, StepPatch};
use crate::state_machine::ExecutionStatus;
use crate::status_service::ExecutionStatusService;

/// What the simulated human does to a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanDecision {
    Approve,
    Reject,
    /// Both flags set, as a misbehaving UI could
    Both,
    /// `interacted` set without either outcome flag
    Acknowledge,
}

impl HumanDecision {
    fn apply_to(self, step: &mut ExecutionStep) {
        step.interacted = true;
        match self {
            Self::Approve => step.interaction_approved = true,
            Self::Reject => step.interaction_rejected = true,
            Self::Both => {
                step.interaction_approved = true;
                step.interaction_rejected = true;
            }
            Self::Acknowledge => {}
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduledDecision {
    due: Instant,
    decision: HumanDecision,
}

/// Call counter that starts failing from a given 1-based call number
#[derive(Debug, Default)]
struct FaultPlan {
    calls: AtomicU64,
    fail_from: Mutex<Option<u64>>,
}

impl FaultPlan {
    fn next_call(&self, operation: &str) -> Result<u64> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match *self.fail_from.lock() {
            Some(from) if call >= from => Err(InteractionError::api_error(
                503,
                format!("injected {operation} failure on call {call}"),
            )),
            _ => Ok(call),
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// In-memory step and execution store
#[derive(Debug, Default)]
pub struct InMemoryStatusService {
    steps: DashMap<Uuid, ExecutionStep>,
    decisions: DashMap<Uuid, ScheduledDecision>,
    step_writes: Mutex<Vec<(Uuid, StepPatch)>>,
    execution_statuses: Mutex<HashMap<Uuid, Vec<ExecutionStatus>>>,
    updates: FaultPlan,
    reads: FaultPlan,
    status_changes: FaultPlan,
}

impl InMemoryStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a step record under `execution_id`
    pub fn insert_step(&self, execution_id: Uuid, mut step: ExecutionStep) {
        step.execution_id = Some(execution_id);
        self.steps.insert(step.id, step);
    }

    /// Current stored snapshot of a step
    pub fn step(&self, step_id: Uuid) -> Option<ExecutionStep> {
        self.steps.get(&step_id).map(|entry| entry.value().clone())
    }

    /// Have a human act on `step_id` once `after` has elapsed from now
    pub fn schedule_decision(&self, step_id: Uuid, after: Duration, decision: HumanDecision) {
        self.decisions.insert(
            step_id,
            ScheduledDecision {
                due: Instant::now() + after,
                decision,
            },
        );
    }

    pub fn schedule_approval(&self, step_id: Uuid, after: Duration) {
        self.schedule_decision(step_id, after, HumanDecision::Approve);
    }

    pub fn schedule_rejection(&self, step_id: Uuid, after: Duration) {
        self.schedule_decision(step_id, after, HumanDecision::Reject);
    }

    /// Fail every step update from the `call`-th one onward (1-based)
    pub fn fail_updates_from(&self, call: u64) {
        *self.updates.fail_from.lock() = Some(call);
    }

    /// Fail every step read from the `call`-th one onward (1-based)
    pub fn fail_reads_from(&self, call: u64) {
        *self.reads.fail_from.lock() = Some(call);
    }

    /// Fail every execution status change
    pub fn fail_status_changes(&self) {
        *self.status_changes.fail_from.lock() = Some(1);
    }

    /// Every successful step write, in order
    pub fn all_step_updates(&self) -> Vec<(Uuid, StepPatch)> {
        self.step_writes.lock().clone()
    }

    /// Successful writes for one step, in order
    pub fn step_updates(&self, step_id: Uuid) -> Vec<StepPatch> {
        self.step_writes
            .lock()
            .iter()
            .filter(|(_, patch)| patch.id == step_id)
            .map(|(_, patch)| patch.clone())
            .collect()
    }

    /// Status changes applied to an execution, in order
    pub fn execution_statuses(&self, execution_id: Uuid) -> Vec<ExecutionStatus> {
        self.execution_statuses
            .lock()
            .get(&execution_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn read_count(&self) -> u64 {
        self.reads.calls()
    }

    pub fn update_count(&self) -> u64 {
        self.updates.calls()
    }

    fn release_due_decision(&self, step: &mut ExecutionStep) {
        let due = self
            .decisions
            .get(&step.id)
            .map(|scheduled| *scheduled.value())
            .filter(|scheduled| Instant::now() >= scheduled.due);

        if let Some(scheduled) = due {
            self.decisions.remove(&step.id);
            debug!(step_id = %step.id, decision = ?scheduled.decision, "Releasing scheduled decision");
            scheduled.decision.apply_to(step);
        }
    }
}

#[async_trait]
impl ExecutionStatusService for InMemoryStatusService {
    async fn update_step(&self, execution_id: Uuid, patch: &StepPatch) -> Result<()> {
        self.updates.next_call("update_step")?;

        let mut step = self
            .steps
            .get_mut(&patch.id)
            .ok_or(InteractionError::StepNotFound { step_id: patch.id })?;
        step.apply(patch);
        drop(step);

        self.step_writes.lock().push((execution_id, patch.clone()));
        Ok(())
    }

    async fn get_step(&self, _execution_id: Uuid, step_id: Uuid) -> Result<ExecutionStep> {
        self.reads.next_call("get_step")?;

        let mut step = self
            .steps
            .get_mut(&step_id)
            .ok_or(InteractionError::StepNotFound { step_id })?;
        self.release_due_decision(&mut step);
        Ok(step.clone())
    }

    async fn set_execution_status(
        &self,
        execution: &Execution,
        status: ExecutionStatus,
    ) -> Result<()> {
        self.status_changes.next_call("set_execution_status")?;

        self.execution_statuses
            .lock()
            .entry(execution.id)
            .or_default()
            .push(status);
        Ok(())
    }
}
