//! # Action Plugin Contract
//!
//! The uniform surface every action plugin offers its workflow host.
//! A host discovers a plugin through [`ActionPlugin::info`], runs it for a
//! step through [`ActionPlugin::execute_task`], and may route alerts to it
//! through [`ActionPlugin::handle_alert`].

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AlertHandlerRequest, ExecuteTaskRequest, PluginDescriptor, PluginResponse};

/// Trait implemented by every action plugin
///
/// All implementations must be `Send + Sync`: a host runs invocations for
/// different steps concurrently against the same plugin value.
#[async_trait]
pub trait ActionPlugin: Send + Sync {
    /// Static catalog entry for discovery and UI rendering
    fn info(&self) -> PluginDescriptor;

    /// Run the plugin's action for one step
    ///
    /// # Returns
    ///
    /// * `Ok(response)` - The action finished; `response.success` says how
    /// * `Err` - A collaborator failed; the host should treat the step as failed
    async fn execute_task(&self, request: &ExecuteTaskRequest) -> Result<PluginResponse>;

    /// Process an alert routed to this plugin
    async fn handle_alert(&self, request: &AlertHandlerRequest) -> Result<PluginResponse>;

    /// Get the plugin name for identification
    fn plugin_name(&self) -> &'static str {
        self.info().name
    }
}
