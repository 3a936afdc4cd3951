//! Shared mock infrastructure for unit tests.
//!
//! Hand-written doubles over the public port traits so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used, dead_code)]

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use vzkit::application::ports::{
    CommandExecutor, CommandResult, CommandRunner, IdentityGenerator, KeyGenerator, LoginTarget,
    ProgressReporter, ReadinessCheck,
};
use vzkit::domain::{ContainerIdentity, DriverError};

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn command_failed(stderr: &str) -> anyhow::Error {
    DriverError::CommandExecution {
        exit_status: 1,
        stderr: stderr.to_string(),
    }
    .into()
}

// ── Executor ─────────────────────────────────────────────────────────────────

type Respond = Box<dyn Fn(&str) -> Result<CommandResult> + Send + Sync>;

/// Records every command line; answers through a closure.
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    respond: Respond,
}

impl RecordingExecutor {
    pub fn new(respond: impl Fn(&str) -> Result<CommandResult> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Succeeds everywhere; the address query reports `address`.
    pub fn with_address(address: &'static str) -> Self {
        Self::new(move |cmd| {
            if cmd.contains("/sbin/ip -o -f inet addr show dev eth0") {
                Ok(CommandResult::ok(format!(
                    "2: eth0    inet {address}/24 brd 203.0.113.255 scope global eth0\n"
                )))
            } else {
                Ok(CommandResult::ok(""))
            }
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, command_line: &str) -> Result<CommandResult> {
        self.calls
            .lock()
            .expect("lock")
            .push(command_line.to_string());
        (self.respond)(command_line)
    }
}

// ── Runner ───────────────────────────────────────────────────────────────────

type RunnerRespond = Box<dyn Fn(&str, &[&str]) -> Result<Output> + Send + Sync>;

/// `CommandRunner` that records `(program, args)` pairs.
pub struct MockCommandRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    respond: RunnerRespond,
}

impl MockCommandRunner {
    pub fn new(respond: impl Fn(&str, &[&str]) -> Result<Output> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn ok() -> Self {
        Self::new(|_, _| Ok(ok_output(b"")))
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("lock").clone()
    }

    /// Number of `ssh -M` master starts.
    pub fn masters(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(p, args)| p == "ssh" && args.first().map(String::as_str) == Some("-M"))
            .count()
    }

    fn record(&self, program: &str, args: &[&str]) {
        self.calls.lock().expect("lock").push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args);
        (self.respond)(program, args)
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.record(program, args);
        (self.respond)(program, args).map(|o| o.status)
    }
}

// ── Provisioning collaborators ───────────────────────────────────────────────

/// Writes placeholder key files.
pub struct StubKeys;

impl KeyGenerator for StubKeys {
    async fn generate(&self, private_key: &Path, public_key: &Path) -> Result<()> {
        std::fs::write(private_key, "PRIVATE")?;
        std::fs::write(public_key, "ssh-rsa AAAA kitchen_key\n")?;
        Ok(())
    }
}

pub struct FixedIdentity(pub &'static str);

impl IdentityGenerator for FixedIdentity {
    fn generate(&self) -> ContainerIdentity {
        ContainerIdentity::new(self.0)
    }
}

/// Records the targets it was asked to wait for.
#[derive(Default)]
pub struct RecordingReadiness {
    targets: Mutex<Vec<LoginTarget>>,
}

impl RecordingReadiness {
    pub fn targets(&self) -> Vec<LoginTarget> {
        self.targets.lock().expect("lock").clone()
    }
}

impl ReadinessCheck for RecordingReadiness {
    async fn wait_until_ready(&self, target: &LoginTarget) -> Result<()> {
        self.targets.lock().expect("lock").push(target.clone());
        Ok(())
    }
}

/// Captures progress messages and relayed command output.
#[derive(Default)]
pub struct CapturingReporter {
    pub messages: Mutex<Vec<String>>,
    pub outputs: Mutex<Vec<String>>,
}

impl CapturingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("lock").clone()
    }

    pub fn outputs(&self) -> Vec<String> {
        self.outputs.lock().expect("lock").clone()
    }
}

impl ProgressReporter for CapturingReporter {
    fn step(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("→ {message}"));
    }
    fn success(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("✓ {message}"));
    }
    fn warn(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("! {message}"));
    }
    fn output(&self, text: &str) {
        self.outputs.lock().expect("lock").push(text.to_string());
    }
}
