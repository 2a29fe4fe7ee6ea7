#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Interaction Plugin
//!
//! Workflow action that pauses a step until a human approves or rejects it.
//!
//! ## Overview
//!
//! When the host runs an interaction step, the plugin marks the step as
//! waiting, flags the parent execution as blocked on a human, and polls the
//! Execution Status Service until someone decides. An optional `Timeout`
//! parameter auto-approves the step once the given number of seconds has
//! elapsed. A rejection cancels the execution; an approval lets it continue.
//!
//! ## Module Organization
//!
//! - [`plugin`] - Host contract, catalog descriptor and the interaction controller
//! - [`state_machine`] - Interaction phases, events and the step patches they produce
//! - [`status_service`] - Client boundary to the Execution Status Service
//! - [`models`] - Step, execution, action and plugin wire types
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//! - [`test_helpers`] - In-memory status service with scripted decisions
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use interaction_plugin::models::{Action, ActionParam, Execution, ExecuteTaskRequest, ExecutionStep};
//! use interaction_plugin::plugin::{ActionPlugin, InteractionPlugin};
//! use interaction_plugin::test_helpers::InMemoryStatusService;
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let service = InMemoryStatusService::new();
//! let action = Action::with_params(vec![ActionParam::new("Timeout", "30")]);
//! let request = ExecuteTaskRequest {
//!     execution: Execution::new(Uuid::new_v4()),
//!     step: ExecutionStep::new(Uuid::new_v4(), action),
//! };
//! service.insert_step(request.execution.id, request.step.clone());
//! service.schedule_approval(request.step.id, Duration::ZERO);
//!
//! let plugin = InteractionPlugin::new(service);
//! let response = plugin.execute_task(&request).await?;
//! assert!(response.success);
//! # Ok::<(), interaction_plugin::InteractionError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod state_machine;
pub mod status_service;
pub mod test_helpers;

pub use config::{ConfigLoader, PluginConfig};
pub use error::{InteractionError, Result};
pub use models::{
    ExecuteTaskRequest, Execution, ExecutionStep, PluginReply, PluginResponse, StepPatch,
};
pub use plugin::{ActionPlugin, InteractionPlugin, INTERACTION_DESCRIPTOR};
pub use state_machine::{ExecutionStatus, InteractionEvent, InteractionPhase, StepStatus};
pub use status_service::ExecutionStatusService;

#[cfg(feature = "http-client")]
pub use status_service::HttpStatusService;
