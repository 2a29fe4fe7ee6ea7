use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::state_machine::ExecutionStatus;

/// Parent run of a step, as known to the status service.
///
/// Only the fields this plugin acts on are modelled; everything else the
/// backend sends is kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: Uuid,

    #[serde(default)]
    pub status: ExecutionStatus,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Execution {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: ExecutionStatus::Running,
            extra: Map::new(),
        }
    }

    /// Copy of this execution carrying a different coarse status
    pub fn with_status(&self, status: ExecutionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
