//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{ContainerIdentity, DriverError, ProvisioningState};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Outcome of one command, local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the process was terminated by a signal.
    pub exit_status: i32,
}

impl CommandResult {
    /// A zero-status result with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_status: 0,
        }
    }

    #[must_use]
    pub fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_status: output.status.code().unwrap_or(-1),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }

    /// Pass a successful result through, turn anything else into
    /// [`DriverError::CommandExecution`].
    ///
    /// # Errors
    ///
    /// Returns an error if the exit status is nonzero.
    pub fn check(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(DriverError::CommandExecution {
                exit_status: self.exit_status,
                stderr: self.stderr.trim().to_string(),
            }
            .into())
        }
    }
}

/// Where the readiness check logs in once the container has an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTarget {
    pub address: String,
    pub username: String,
    pub private_key: PathBuf,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture stdout and stderr separately.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with stdin closed and stdout/stderr inherited, returning
    /// only its exit status. Used for processes that daemonize.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        (**self).run(program, args).await
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus> {
        (**self).run_status(program, args).await
    }
}

// ── Command Executor Port ─────────────────────────────────────────────────────

/// Runs a hypervisor command line on the configured endpoint.
///
/// Callers never learn whether the command ran locally or over SSH.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Execute `command_line` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::CommandExecution`] on a nonzero exit status, or
    /// an error if the command could not be started at all.
    async fn execute(&self, command_line: &str) -> Result<CommandResult>;
}

// ── Provisioning Collaborators ────────────────────────────────────────────────

/// Creates login key material.
#[allow(async_fn_in_trait)]
pub trait KeyGenerator {
    /// Write a fresh keypair to `private_key` and `public_key`, replacing
    /// whatever is there.
    async fn generate(&self, private_key: &Path, public_key: &Path) -> Result<()>;
}

/// Confirms that the login service inside the container accepts our key.
#[allow(async_fn_in_trait)]
pub trait ReadinessCheck {
    /// Block until `target` accepts a login. No upper bound on the wait.
    async fn wait_until_ready(&self, target: &LoginTarget) -> Result<()>;
}

/// Source of fresh container identities.
pub trait IdentityGenerator {
    fn generate(&self) -> ContainerIdentity;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Relay what a remote command printed on success.
    fn output(&self, _text: &str) {}
}

// ── State Port ────────────────────────────────────────────────────────────────

/// Persistence for the caller-owned provisioning record.
#[allow(async_fn_in_trait)]
pub trait ProvisioningStateStore {
    /// Load the saved state, returning `None` if nothing was saved.
    async fn load_async(&self) -> Result<Option<ProvisioningState>>;
    /// Persist the given state.
    async fn save_async(&self, state: &ProvisioningState) -> Result<()>;
}
