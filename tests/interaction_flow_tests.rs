//! End-to-end interaction waits against the in-memory status service.
//!
//! Every test runs on a paused tokio clock, so the 5 second poll cadence and
//! the timeouts resolve instantly and deterministically.

mod common;

use std::time::Duration;

use common::{interaction_request, request_with_params, seeded_service};
use interaction_plugin::models::ActionParam;
use interaction_plugin::test_helpers::HumanDecision;
use interaction_plugin::{
    ActionPlugin, ExecutionStatus, InteractionError, InteractionPlugin, PluginReply,
    PluginResponse, StepStatus,
};
use tokio::time::Instant;

fn assert_resolved_at(started: Instant, seconds: u64) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(seconds) && elapsed < Duration::from_secs(seconds + 1),
        "expected resolution at {seconds}s, got {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_approval_without_timeout() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_approval(request.step.id, Duration::from_secs(12));

    let plugin = InteractionPlugin::new(service.clone());
    let started = Instant::now();
    let response = plugin.execute_task(&request).await.unwrap();

    // polls at 0, 5, 10 and 15 seconds; the decision shows up on the fourth
    assert_resolved_at(started, 15);
    assert_eq!(response, PluginResponse::success());
    assert_eq!(service.read_count(), 4);

    let updates = service.step_updates(request.step.id);
    assert_eq!(updates.len(), 2);
    assert_eq!(
        updates[0].messages,
        Some(vec![
            "Waiting for user interaction".to_string(),
            "Timeout: 0 seconds".to_string()
        ])
    );
    assert_eq!(updates[0].status, Some(StepStatus::InteractionWaiting));
    assert_eq!(updates[0].interactive, Some(true));
    assert!(updates[0].started_at.is_some());

    assert_eq!(updates[1].messages, Some(vec!["Interaction approved".to_string()]));
    assert_eq!(updates[1].status, Some(StepStatus::Success));
    assert_eq!(updates[1].interacted, Some(true));
    assert_eq!(updates[1].interaction_approved, Some(true));
    assert_eq!(updates[1].interaction_rejected, Some(false));
    assert!(updates[1].finished_at.is_some());

    assert_eq!(
        service.execution_statuses(request.execution.id),
        vec![ExecutionStatus::InteractionWaiting, ExecutionStatus::Running]
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_auto_approves_on_next_poll() {
    let request = interaction_request("7");
    let service = seeded_service(&request);

    let plugin = InteractionPlugin::new(service.clone());
    let started = Instant::now();
    let response = plugin.execute_task(&request).await.unwrap();

    assert_resolved_at(started, 10);
    assert!(response.success);

    let step = service.step(request.step.id).unwrap();
    assert_eq!(
        step.messages,
        vec![
            "Waiting for user interaction",
            "Timeout: 7 seconds",
            "Interaction timed out",
            "Automatically approved & continuing to the next step",
            "Interaction approved",
        ]
    );
    assert_eq!(step.status, StepStatus::Success);
    assert!(step.interacted);
    assert!(step.interaction_approved);
    assert!(!step.interaction_rejected);
    assert_eq!(service.step_updates(request.step.id).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_on_poll_boundary() {
    let request = interaction_request("5");
    let service = seeded_service(&request);

    let plugin = InteractionPlugin::new(service.clone());
    let started = Instant::now();
    plugin.execute_task(&request).await.unwrap();

    assert_resolved_at(started, 5);
    assert_eq!(service.read_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_human_decision_beats_pending_timeout() {
    let request = interaction_request("30");
    let service = seeded_service(&request);
    service.schedule_approval(request.step.id, Duration::from_secs(4));

    let plugin = InteractionPlugin::new(service.clone());
    let started = Instant::now();
    plugin.execute_task(&request).await.unwrap();

    assert_resolved_at(started, 5);
    let messages = service.step(request.step.id).unwrap().messages;
    assert!(!messages.iter().any(|m| m == "Interaction timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_rejection_cancels_execution() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_rejection(request.step.id, Duration::from_secs(6));

    let plugin = InteractionPlugin::new(service.clone());
    let response = plugin.execute_task(&request).await.unwrap();

    assert!(!response.success);
    assert_eq!(
        response.data.unwrap().get("status"),
        Some(&serde_json::json!("canceled"))
    );

    let step = service.step(request.step.id).unwrap();
    assert_eq!(step.status, StepStatus::Canceled);
    assert!(step.interaction_rejected);
    assert!(!step.interaction_approved);
    assert_eq!(
        &step.messages[2..],
        ["Interaction rejected", "Execution canceled"]
    );
    assert_eq!(
        service.execution_statuses(request.execution.id).last(),
        Some(&ExecutionStatus::Running)
    );
}

#[tokio::test(start_paused = true)]
async fn test_both_flags_resolve_as_rejection() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_decision(request.step.id, Duration::ZERO, HumanDecision::Both);

    let plugin = InteractionPlugin::new(service.clone());
    let response = plugin.execute_task(&request).await.unwrap();

    assert!(!response.success);
    let last = service.step_updates(request.step.id).pop().unwrap();
    assert_eq!(last.status, Some(StepStatus::Canceled));
}

#[tokio::test(start_paused = true)]
async fn test_acknowledged_without_outcome_skips_finalize() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_decision(request.step.id, Duration::from_secs(1), HumanDecision::Acknowledge);

    let plugin = InteractionPlugin::new(service.clone());
    let response = plugin.execute_task(&request).await.unwrap();

    assert!(response.success);
    assert_eq!(service.step_updates(request.step.id).len(), 1);
    assert_eq!(
        service.execution_statuses(request.execution.id),
        vec![ExecutionStatus::InteractionWaiting, ExecutionStatus::Running]
    );
}

#[tokio::test(start_paused = true)]
async fn test_outcome_flags_never_both_true_in_writes() {
    for decision in [HumanDecision::Approve, HumanDecision::Reject, HumanDecision::Both] {
        let request = interaction_request("12");
        let service = seeded_service(&request);
        service.schedule_decision(request.step.id, Duration::from_secs(8), decision);

        InteractionPlugin::new(service.clone())
            .execute_task(&request)
            .await
            .unwrap();

        for patch in service.step_updates(request.step.id) {
            assert!(
                !(patch.interaction_approved == Some(true)
                    && patch.interaction_rejected == Some(true)),
                "{decision:?} produced a patch with both outcome flags"
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_last_timeout_param_wins() {
    let request = request_with_params(vec![
        ActionParam::new("Timeout", "60"),
        ActionParam::new("Timeout", "3"),
    ]);
    let service = seeded_service(&request);

    let started = Instant::now();
    InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap();

    assert_resolved_at(started, 5);
    let first = &service.step_updates(request.step.id)[0];
    assert_eq!(first.messages.as_ref().unwrap()[1], "Timeout: 3 seconds");
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_timeout_disables_timeout() {
    let request = interaction_request("soon");
    let service = seeded_service(&request);
    service.schedule_approval(request.step.id, Duration::from_secs(120));

    let started = Instant::now();
    InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap();

    assert_resolved_at(started, 120);
    let step = service.step(request.step.id).unwrap();
    assert_eq!(step.messages[1], "Timeout: 0 seconds");
    assert!(!step.messages.iter().any(|m| m == "Interaction timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_aborts_without_terminal_write() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.fail_reads_from(1);

    let err = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, InteractionError::Fetch { .. }));
    assert_eq!(service.step_updates(request.step.id).len(), 1);
    assert_eq!(
        service.step(request.step.id).unwrap().status,
        StepStatus::InteractionWaiting
    );
    // the execution is never flipped back to running
    assert_eq!(
        service.execution_statuses(request.execution.id),
        vec![ExecutionStatus::InteractionWaiting]
    );
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_mid_wait() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.fail_reads_from(3);

    let started = Instant::now();
    let err = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap_err();

    assert_resolved_at(started, 10);
    assert!(matches!(err, InteractionError::Fetch { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_initial_persist_failure_stops_before_polling() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.fail_updates_from(1);

    let err = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InteractionError::Persistence {
            stage: "begin_waiting",
            ..
        }
    ));
    assert_eq!(service.read_count(), 0);
    assert!(service.execution_statuses(request.execution.id).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_finalize_persist_failure_is_reported() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_approval(request.step.id, Duration::ZERO);
    service.fail_updates_from(2);

    let result = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await;

    let reply = PluginReply::from(result);
    assert!(!reply.success);
    assert!(reply.error.unwrap().contains("approve"));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_persist_failure_skips_finalize() {
    let request = interaction_request("5");
    let service = seeded_service(&request);
    service.fail_updates_from(2);

    let err = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InteractionError::Persistence {
            stage: "time_out",
            ..
        }
    ));
    assert_eq!(service.update_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_execution_status_failures_are_not_fatal() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.fail_status_changes();
    service.schedule_approval(request.step.id, Duration::from_secs(2));

    let response = InteractionPlugin::new(service.clone())
        .execute_task(&request)
        .await
        .unwrap();

    assert!(response.success);
    assert!(service.execution_statuses(request.execution.id).is_empty());
    assert_eq!(
        service.step(request.step.id).unwrap().status,
        StepStatus::Success
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_poll_interval() {
    let request = interaction_request("0");
    let service = seeded_service(&request);
    service.schedule_approval(request.step.id, Duration::from_secs(3));

    let started = Instant::now();
    InteractionPlugin::new(service.clone())
        .with_poll_interval(Duration::from_secs(2))
        .execute_task(&request)
        .await
        .unwrap();

    assert_resolved_at(started, 4);
    assert_eq!(service.read_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_steps_are_independent() {
    let approved = interaction_request("0");
    let rejected = interaction_request("0");
    let service = seeded_service(&approved);
    service.insert_step(rejected.execution.id, rejected.step.clone());
    service.schedule_approval(approved.step.id, Duration::from_secs(5));
    service.schedule_rejection(rejected.step.id, Duration::from_secs(10));

    let plugin = InteractionPlugin::new(service.clone());
    let (a, r) = tokio::join!(
        plugin.execute_task(&approved),
        plugin.execute_task(&rejected)
    );

    assert!(a.unwrap().success);
    assert!(!r.unwrap().success);
    assert_eq!(
        service.step(approved.step.id).unwrap().status,
        StepStatus::Success
    );
    assert_eq!(
        service.step(rejected.step.id).unwrap().status,
        StepStatus::Canceled
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_future_stops_polling() {
    let request = interaction_request("0");
    let service = seeded_service(&request);

    let plugin = InteractionPlugin::new(service.clone());
    let outcome =
        tokio::time::timeout(Duration::from_secs(12), plugin.execute_task(&request)).await;

    assert!(outcome.is_err());
    let reads = service.read_count();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(service.read_count(), reads);
    assert_eq!(
        service.step(request.step.id).unwrap().status,
        StepStatus::InteractionWaiting
    );
}
