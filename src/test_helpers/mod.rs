//! Test support shared by unit tests, integration tests and the `simulate`
//! command of the plugin binary.

pub mod in_memory_status_service;

pub use in_memory_status_service::{HumanDecision, InMemoryStatusService};
