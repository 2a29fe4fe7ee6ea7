//! Step writes attached to each interaction transition.
//!
//! The controller persists exactly the patch returned here before it moves
//! on, so the status service always reflects the phase the controller is in.

use uuid::Uuid;

use super::events::InteractionEvent;
use super::states::StepStatus;
use crate::constants::messages;
use crate::models::StepPatch;

/// Build the step patch that records `event` for the given step.
///
/// `timeout_seconds` only shows up in the waiting announcement.
pub fn step_patch_for(step_id: Uuid, event: InteractionEvent, timeout_seconds: u64) -> StepPatch {
    match event {
        InteractionEvent::BeginWaiting => waiting_patch(step_id, timeout_seconds),
        InteractionEvent::TimeOut => timed_out_patch(step_id),
        InteractionEvent::Approve => approved_patch(step_id),
        InteractionEvent::Reject => rejected_patch(step_id),
    }
}

pub fn waiting_patch(step_id: Uuid, timeout_seconds: u64) -> StepPatch {
    StepPatch::new(step_id)
        .with_messages([
            messages::WAITING_FOR_INTERACTION.to_string(),
            messages::timeout_notice(timeout_seconds),
        ])
        .with_status(StepStatus::InteractionWaiting)
        .interactive()
        .started_now()
}

pub fn timed_out_patch(step_id: Uuid) -> StepPatch {
    StepPatch::new(step_id)
        .with_messages([messages::INTERACTION_TIMED_OUT, messages::AUTO_APPROVED])
        .with_status(StepStatus::Success)
        .finished_now()
        .with_decision(true)
}

pub fn approved_patch(step_id: Uuid) -> StepPatch {
    StepPatch::new(step_id)
        .with_messages([messages::INTERACTION_APPROVED])
        .with_status(StepStatus::Success)
        .finished_now()
        .with_decision(true)
}

pub fn rejected_patch(step_id: Uuid) -> StepPatch {
    StepPatch::new(step_id)
        .with_messages([messages::INTERACTION_REJECTED, messages::EXECUTION_CANCELED])
        .with_status(StepStatus::Canceled)
        .finished_now()
        .with_decision(false)
}
