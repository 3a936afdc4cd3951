//! Transport selection and session reuse through the public API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use vzkit::application::ports::CommandExecutor;
use vzkit::domain::DriverError;
use vzkit::infra::executor::Executor;

use crate::mocks::{MockCommandRunner, err_output, ok_output};

#[tokio::test]
async fn test_local_endpoint_never_opens_a_session() {
    let runner = MockCommandRunner::ok();
    let exec = Executor::from_config("local", true, &runner).expect("executor");
    for _ in 0..3 {
        exec.execute("/usr/bin/prlctl start abc-123")
            .await
            .expect("run");
    }
    assert_eq!(runner.masters(), 0);
    assert!(runner.calls().iter().all(|(program, _)| program == "sh"));
    exec.close().await.expect("close");
    assert_eq!(runner.calls().len(), 3);
}

#[tokio::test]
async fn test_ssh_endpoint_opens_one_session_for_all_commands() {
    let runner = MockCommandRunner::ok();
    let exec = Executor::from_config("ssh://kitchen@10.0.0.5:22", true, &runner).expect("executor");
    for cmd in [
        "/usr/bin/prlctl start abc-123",
        "/usr/bin/prlctl stop abc-123",
        "/usr/bin/prlctl destroy abc-123",
    ] {
        exec.execute(cmd).await.expect("run");
    }
    assert_eq!(runner.masters(), 1);

    let master = &runner.calls()[0].1;
    assert!(master.windows(2).any(|w| w == ["-p", "22"]));
    assert_eq!(master.last().map(String::as_str), Some("kitchen@10.0.0.5"));

    exec.close().await.expect("close");
    let (_, last) = runner.calls().pop().expect("close call");
    assert!(last.windows(2).any(|w| w == ["-O", "exit"]));
}

#[tokio::test]
async fn test_ssh_port_from_uri_is_used() {
    let runner = MockCommandRunner::ok();
    let exec =
        Executor::from_config("ssh://root@hv.example.test:2222", false, &runner).expect("executor");
    exec.execute("true").await.expect("run");
    assert!(
        runner
            .calls()
            .iter()
            .all(|(_, args)| args.windows(2).any(|w| w == ["-p", "2222"]))
    );
}

#[tokio::test]
async fn test_remote_failure_reports_exit_status_and_stderr() {
    let runner = MockCommandRunner::new(|_, args| {
        if args.first() == Some(&"-M") {
            Ok(ok_output(b""))
        } else {
            Ok(err_output(7, b"Failed to start the CT\n"))
        }
    });
    let exec = Executor::from_config("ssh://kitchen@10.0.0.5:22", true, &runner).expect("executor");
    let err = exec
        .execute("/usr/bin/prlctl start abc-123")
        .await
        .unwrap_err();
    match err.downcast_ref::<DriverError>() {
        Some(DriverError::CommandExecution {
            exit_status,
            stderr,
        }) => {
            assert_eq!(*exit_status, 7);
            assert_eq!(stderr, "Failed to start the CT");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unsupported_scheme_is_rejected_before_any_command() {
    let runner = MockCommandRunner::ok();
    let err = Executor::from_config("ftp://x", true, &runner)
        .err()
        .expect("must fail");
    assert!(matches!(
        err.downcast_ref::<DriverError>(),
        Some(DriverError::InvalidEndpoint(_))
    ));
    assert!(runner.calls().is_empty());
}
