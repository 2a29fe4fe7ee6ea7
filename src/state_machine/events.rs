use serde::{Deserialize, Serialize};

use crate::models::ExecutionStep;

/// Events that move an interaction step through its wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractionEvent {
    /// Announce the step as waiting for a human
    BeginWaiting,
    /// A human approved the step
    Approve,
    /// A human rejected the step
    Reject,
    /// The configured timeout elapsed with no decision
    TimeOut,
}

impl InteractionEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BeginWaiting => "begin_waiting",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::TimeOut => "time_out",
        }
    }

    /// Check if this event ends the wait
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::BeginWaiting)
    }

    /// Classify a polled step snapshot.
    ///
    /// Returns `None` while no decision has been recorded, and also for the
    /// degenerate case of `interacted` with neither flag set. Rejection is
    /// checked first.
    pub fn from_snapshot(step: &ExecutionStep) -> Option<Self> {
        if !step.interacted {
            return None;
        }
        if step.interaction_rejected {
            Some(Self::Reject)
        } else if step.interaction_approved {
            Some(Self::Approve)
        } else {
            None
        }
    }
}

impl std::fmt::Display for InteractionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_type())
    }
}
