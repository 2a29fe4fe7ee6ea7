pub mod action;
pub mod execution;
pub mod plugin;
pub mod step;

// Re-export core models for easy access
pub use action::{parse_timeout, Action, ActionParam};
pub use execution::Execution;
pub use plugin::{
    ActionDescriptor, AlertEndpointDescriptor, AlertHandlerRequest, ExecuteTaskRequest,
    ParamDescriptor, PluginDescriptor, PluginReply, PluginResponse,
};
pub use step::{ExecutionStep, StepPatch};

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the type's default.
///
/// The status service encodes empty lists as `null`; `#[serde(default)]`
/// alone only covers absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
