//! # Plugin Contract Types
//!
//! Values exchanged with the workflow host: the catalog descriptor, the two
//! request shapes, and the structured result of an invocation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Execution, ExecutionStep};
use crate::error::InteractionError;

/// Catalog entry describing this plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub plugin_type: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub actions: ActionDescriptor,
    pub endpoints: &'static [AlertEndpointDescriptor],
}

/// The single action a plugin contributes to the flow editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub plugin: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub params: &'static [ParamDescriptor],
}

/// One parameter the flow author may set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub default: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Alert intake endpoint a plugin may expose. Interaction exposes none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertEndpointDescriptor {
    pub name: &'static str,
    pub endpoint: &'static str,
}

/// Request to run the step this plugin is attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    pub execution: Execution,
    pub step: ExecutionStep,
}

/// Request to process an incoming alert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertHandlerRequest {
    #[serde(default)]
    pub payload: Value,
}

/// Structured outcome returned to the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl PluginResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Flat rendering of an invocation result for hosts that cannot carry a
/// separate error channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<PluginResponse, InteractionError>> for PluginReply {
    fn from(result: Result<PluginResponse, InteractionError>) -> Self {
        match result {
            Ok(response) => Self {
                success: response.success,
                data: response.data,
                error: None,
            },
            Err(error) => {
                let response = error.to_response();
                Self {
                    success: response.success,
                    data: response.data,
                    error: Some(error.to_string()),
                }
            }
        }
    }
}
