//! Teardown through the public API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use vzkit::application::ports::CommandResult;
use vzkit::application::services::teardown::destroy;
use vzkit::domain::{ContainerIdentity, ProvisioningState, Virtuozzo};

use crate::mocks::{CapturingReporter, RecordingExecutor};

#[tokio::test]
async fn test_destroy_without_identity_is_a_no_op() {
    let exec = RecordingExecutor::new(|_| panic!("executor must not be called"));
    let mut state = ProvisioningState::default();
    destroy(&exec, &Virtuozzo, &CapturingReporter::default(), &mut state)
        .await
        .expect("no-op");
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn test_destroy_keeps_unknown_state_keys() {
    let exec = RecordingExecutor::new(|_| Ok(CommandResult::ok("")));
    let mut state: ProvisioningState = serde_json::from_str(
        r#"{"ct_id":"abc-123","hostname":"203.0.113.5","last_action":"verify"}"#,
    )
    .expect("state");

    destroy(&exec, &Virtuozzo, &CapturingReporter::default(), &mut state)
        .await
        .expect("destroy");

    assert_eq!(
        exec.calls(),
        ["/usr/bin/prlctl stop abc-123", "/usr/bin/prlctl destroy abc-123"]
    );
    assert!(state.identity.is_none());
    assert!(state.address.is_none());
    assert_eq!(state.extra["last_action"], "verify");
}

#[tokio::test]
async fn test_destroy_twice_only_runs_commands_once() {
    let exec = RecordingExecutor::new(|_| Ok(CommandResult::ok("")));
    let mut state = ProvisioningState {
        identity: Some(ContainerIdentity::new("abc-123")),
        ..ProvisioningState::default()
    };
    let reporter = CapturingReporter::default();
    destroy(&exec, &Virtuozzo, &reporter, &mut state)
        .await
        .expect("first");
    destroy(&exec, &Virtuozzo, &reporter, &mut state)
        .await
        .expect("second");
    assert_eq!(exec.calls().len(), 2);
}

#[tokio::test]
async fn test_destroy_relays_command_output() {
    let exec = RecordingExecutor::new(|cmd| {
        if cmd.contains("stop") {
            Ok(CommandResult::ok("Stopping the CT...\nThe CT has been successfully stopped\n"))
        } else {
            Ok(CommandResult::ok(""))
        }
    });
    let mut state = ProvisioningState {
        identity: Some(ContainerIdentity::new("abc-123")),
        ..ProvisioningState::default()
    };
    let reporter = CapturingReporter::default();
    destroy(&exec, &Virtuozzo, &reporter, &mut state)
        .await
        .expect("destroy");
    assert_eq!(
        reporter.outputs()[0],
        "Stopping the CT...\nThe CT has been successfully stopped\n"
    );
}
