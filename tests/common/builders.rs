//! Builders for interaction requests and seeded status services

#![allow(dead_code)]

use std::sync::Arc;

use interaction_plugin::models::{Action, ActionParam, ExecuteTaskRequest, Execution, ExecutionStep};
use interaction_plugin::test_helpers::InMemoryStatusService;
use uuid::Uuid;

/// Request for an interaction step whose `Timeout` parameter is `timeout`
pub fn interaction_request(timeout: &str) -> ExecuteTaskRequest {
    request_with_params(vec![ActionParam::new("Timeout", timeout)])
}

pub fn request_with_params(params: Vec<ActionParam>) -> ExecuteTaskRequest {
    ExecuteTaskRequest {
        execution: Execution::new(Uuid::new_v4()),
        step: ExecutionStep::new(Uuid::new_v4(), Action::with_params(params)),
    }
}

/// In-memory service that already holds the request's step
pub fn seeded_service(request: &ExecuteTaskRequest) -> Arc<InMemoryStatusService> {
    let service = Arc::new(InMemoryStatusService::new());
    service.insert_step(request.execution.id, request.step.clone());
    service
}
