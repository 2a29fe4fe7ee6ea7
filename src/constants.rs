//! # Plugin Constants
//!
//! Fixed values shared by the controller, the descriptor and the tests: the
//! recognized parameter keys, the human-readable step messages written to the
//! status service, and the polling cadence.

use std::time::Duration;

/// Action parameter keys understood by the interaction action
pub mod params {
    /// Seconds to wait before auto-approving; `0` disables the timeout
    pub const TIMEOUT: &str = "Timeout";
}

/// Messages written to the step record at each phase
pub mod messages {
    pub const WAITING_FOR_INTERACTION: &str = "Waiting for user interaction";
    pub const INTERACTION_TIMED_OUT: &str = "Interaction timed out";
    pub const AUTO_APPROVED: &str = "Automatically approved & continuing to the next step";
    pub const INTERACTION_REJECTED: &str = "Interaction rejected";
    pub const EXECUTION_CANCELED: &str = "Execution canceled";
    pub const INTERACTION_APPROVED: &str = "Interaction approved";

    /// Second line of the waiting message pair
    pub fn timeout_notice(timeout_seconds: u64) -> String {
        format!("Timeout: {timeout_seconds} seconds")
    }
}

/// Keys placed in the `data` map of a plugin response
pub mod response {
    pub const STATUS: &str = "status";
    pub const CANCELED: &str = "canceled";
}

/// Polling cadence while waiting for a human decision
pub mod polling {
    use super::Duration;

    pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 5;

    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS);
}

/// Plugin identity reported to the host catalog
pub mod plugin {
    pub const NAME: &str = "Interaction";
    pub const TYPE: &str = "action";
    pub const VERSION: &str = "1.1.1";
    pub const AUTHOR: &str = "JustNZ";
    pub const ACTION_ID: &str = "interaction";
    pub const ACTION_DESCRIPTION: &str = "Wait for user interaction to continue";
    pub const ACTION_ICON: &str = "solar:hand-shake-linear";
    pub const ACTION_CATEGORY: &str = "Utility";
    pub const TIMEOUT_PARAM_DESCRIPTION: &str =
        "Continue to the next step after the specified time (in seconds). 0 to disable";
}
