use serde::{Deserialize, Serialize};
use std::fmt;

/// Step status tags as stored by the Execution Status Service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    /// Step created, not yet picked up
    Pending,
    /// Step is being executed
    Running,
    /// Step is parked until a human approves or rejects it
    InteractionWaiting,
    /// Step finished successfully
    Success,
    /// Step was canceled, for interactions this means rejected
    Canceled,
    /// Step failed
    Error,
    /// Any other status the backend uses; this plugin never writes it
    #[serde(other)]
    Unknown,
}

impl StepStatus {
    /// Check if this is a terminal status (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Canceled | Self::Error)
    }

    /// Check if the step is blocked on a human decision
    pub fn is_awaiting_interaction(&self) -> bool {
        matches!(self, Self::InteractionWaiting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::InteractionWaiting => "interactionWaiting",
            Self::Success => "success",
            Self::Canceled => "canceled",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "interactionWaiting" => Ok(Self::InteractionWaiting),
            "success" => Ok(Self::Success),
            "canceled" => Ok(Self::Canceled),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Coarse status of the parent execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    /// At least one step is waiting for a human
    InteractionWaiting,
    Canceled,
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::InteractionWaiting => "interactionWaiting",
            Self::Canceled => "canceled",
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Where an interaction step is in its wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPhase {
    /// Not yet announced as waiting
    Idle,
    /// Announced and polling for a decision
    Waiting,
    /// Timeout elapsed and the auto-approval is recorded, not yet finalized
    TimedOut,
    /// Approved by a human, or finalized after a timeout
    Approved,
    /// Rejected by a human
    Rejected,
}

impl InteractionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Step status persisted when the wait ends in this phase
    pub fn step_status(&self) -> StepStatus {
        match self {
            Self::Idle => StepStatus::Pending,
            Self::Waiting => StepStatus::InteractionWaiting,
            Self::TimedOut | Self::Approved => StepStatus::Success,
            Self::Rejected => StepStatus::Canceled,
        }
    }
}

impl fmt::Display for InteractionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Waiting => write!(f, "waiting"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl Default for InteractionPhase {
    fn default() -> Self {
        Self::Idle
    }
}
