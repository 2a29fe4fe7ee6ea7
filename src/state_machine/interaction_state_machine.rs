use uuid::Uuid;

use super::actions::step_patch_for;
use super::events::InteractionEvent;
use super::states::InteractionPhase;
use crate::error::{InteractionError, Result};
use crate::models::StepPatch;

/// In-memory tracker for one step's interaction wait.
///
/// The machine never talks to the status service itself: `transition`
/// validates the move and hands back the patch the caller must persist
/// before calling [`InteractionStateMachine::commit`].
#[derive(Debug, Clone)]
pub struct InteractionStateMachine {
    step_id: Uuid,
    timeout_seconds: u64,
    phase: InteractionPhase,
}

/// A validated, not yet committed transition
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub from: InteractionPhase,
    pub to: InteractionPhase,
    pub event: InteractionEvent,
    pub patch: StepPatch,
}

impl InteractionStateMachine {
    pub fn new(step_id: Uuid, timeout_seconds: u64) -> Self {
        Self {
            step_id,
            timeout_seconds,
            phase: InteractionPhase::Idle,
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn step_id(&self) -> Uuid {
        self.step_id
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Determine the target phase for an event without changing state
    pub fn determine_target_phase(
        current: InteractionPhase,
        event: InteractionEvent,
    ) -> Result<InteractionPhase> {
        let target = match (current, event) {
            (InteractionPhase::Idle, InteractionEvent::BeginWaiting) => InteractionPhase::Waiting,
            (InteractionPhase::Waiting, InteractionEvent::Approve) => InteractionPhase::Approved,
            (InteractionPhase::Waiting, InteractionEvent::Reject) => InteractionPhase::Rejected,
            (InteractionPhase::Waiting, InteractionEvent::TimeOut) => InteractionPhase::TimedOut,
            // the auto-approval is finalized like a human approval
            (InteractionPhase::TimedOut, InteractionEvent::Approve) => InteractionPhase::Approved,
            (from, event) => {
                return Err(InteractionError::InvalidTransition {
                    from: from.to_string(),
                    event: event.to_string(),
                })
            }
        };

        Ok(target)
    }

    /// Validate `event` against the current phase and build its step patch
    pub fn transition(&self, event: InteractionEvent) -> Result<PendingTransition> {
        let to = Self::determine_target_phase(self.phase, event)?;
        Ok(PendingTransition {
            from: self.phase,
            to,
            event,
            patch: step_patch_for(self.step_id, event, self.timeout_seconds),
        })
    }

    /// Adopt the target phase once its patch has been persisted
    pub fn commit(&mut self, transition: &PendingTransition) -> Result<InteractionPhase> {
        if transition.from != self.phase {
            return Err(InteractionError::InvalidTransition {
                from: self.phase.to_string(),
                event: transition.event.to_string(),
            });
        }
        self.phase = transition.to;
        Ok(self.phase)
    }
}
