//! # Execution Step
//!
//! The step record owned by the Execution Status Service, and the partial
//! update the plugin sends back for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::action::Action;
use super::null_as_default;
use crate::state_machine::StepStatus;

/// Snapshot of one step as returned by the status service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub id: Uuid,

    #[serde(default)]
    pub execution_id: Option<Uuid>,

    /// The action this step runs, with the parameters configured by the flow author
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: Action,

    /// Human-readable progress lines, oldest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StepStatus,

    #[serde(default)]
    pub interactive: bool,

    #[serde(default)]
    pub interacted: bool,

    #[serde(default)]
    pub interaction_approved: bool,

    #[serde(default)]
    pub interaction_rejected: bool,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionStep {
    /// A fresh pending step for the given action
    pub fn new(id: Uuid, action: Action) -> Self {
        Self {
            id,
            execution_id: None,
            action,
            messages: Vec::new(),
            status: StepStatus::Pending,
            interactive: false,
            interacted: false,
            interaction_approved: false,
            interaction_rejected: false,
            started_at: None,
            finished_at: None,
        }
    }

    /// Apply a patch the way the status service does: unset fields are left alone
    pub fn apply(&mut self, patch: &StepPatch) {
        if let Some(messages) = &patch.messages {
            self.messages.extend(messages.iter().cloned());
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        if let Some(interactive) = patch.interactive {
            self.interactive = interactive;
        }
        if let Some(interacted) = patch.interacted {
            self.interacted = interacted;
        }
        if let Some(approved) = patch.interaction_approved {
            self.interaction_approved = approved;
        }
        if let Some(rejected) = patch.interaction_rejected {
            self.interaction_rejected = rejected;
        }
        if let Some(started_at) = patch.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(finished_at) = patch.finished_at {
            self.finished_at = Some(finished_at);
        }
    }
}

/// Partial step update; only the fields that are `Some` go over the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPatch {
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interacted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_approved: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_rejected: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepPatch {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = Some(messages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = Some(true);
        self
    }

    pub fn started_now(mut self) -> Self {
        self.started_at = Some(Utc::now());
        self
    }

    pub fn finished_now(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Record the interaction outcome; exactly one of the two flags ends up true
    pub fn with_decision(mut self, approved: bool) -> Self {
        self.interacted = Some(true);
        self.interaction_approved = Some(approved);
        self.interaction_rejected = Some(!approved);
        self
    }
}
