// State machine module for the interaction wait
//
// Models the phases an interaction step moves through and the step writes
// that accompany each move. Persistence is left to the caller.

pub mod actions;
pub mod events;
pub mod interaction_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use events::InteractionEvent;
pub use interaction_state_machine::{InteractionStateMachine, PendingTransition};
pub use states::{ExecutionStatus, InteractionPhase, StepStatus};
