//! # Interaction Plugin
//!
//! The host-facing contract ([`ActionPlugin`]), the static catalog entry, and
//! the controller that runs the interaction wait.

pub mod descriptor;
pub mod interaction;
pub mod traits;

pub use descriptor::{INTERACTION_DESCRIPTOR, TIMEOUT_PARAM};
pub use interaction::InteractionPlugin;
pub use traits::ActionPlugin;
