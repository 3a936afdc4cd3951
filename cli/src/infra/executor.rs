//! Infrastructure implementations of the `CommandExecutor` port.
//!
//! The endpoint is resolved once, in [`Executor::from_config`]. Local
//! commands go through `sh -c` so that quoting built by the hypervisor
//! command builder means the same thing on both transports.

use anyhow::Result;

use crate::application::ports::{CommandExecutor, CommandResult, CommandRunner};
use crate::domain::{Endpoint, parse_endpoint};
use crate::infra::ssh::RemoteSession;

const ELEVATION_PREFIX: &str = "sudo -E ";

/// Runs command lines as child processes on this machine.
pub struct LocalExecutor<R> {
    runner: R,
}

impl<R: CommandRunner> LocalExecutor<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> CommandExecutor for LocalExecutor<R> {
    async fn execute(&self, command_line: &str) -> Result<CommandResult> {
        tracing::debug!(command = command_line, "local exec");
        let output = self.runner.run("sh", &["-c", command_line]).await?;
        CommandResult::from_output(&output).check()
    }
}

/// Runs command lines on a remote host over one shared [`RemoteSession`].
pub struct RemoteExecutor<R> {
    session: RemoteSession<R>,
    use_sudo: bool,
}

impl<R: CommandRunner> RemoteExecutor<R> {
    #[must_use]
    pub fn new(session: RemoteSession<R>, use_sudo: bool) -> Self {
        Self { session, use_sudo }
    }

    fn wrap(&self, command_line: &str) -> String {
        if self.use_sudo {
            format!("{ELEVATION_PREFIX}{command_line}")
        } else {
            command_line.to_string()
        }
    }
}

impl<R: CommandRunner> CommandExecutor for RemoteExecutor<R> {
    async fn execute(&self, command_line: &str) -> Result<CommandResult> {
        let command_line = self.wrap(command_line);
        tracing::debug!(host = %self.session.target().host, command = %command_line, "remote exec");
        self.session.run(&command_line).await
    }
}

/// The executor selected for this run.
pub enum Executor<R> {
    Local(LocalExecutor<R>),
    Remote(RemoteExecutor<R>),
}

impl<R: CommandRunner> Executor<R> {
    /// Pick the transport for `socket`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DriverError::InvalidEndpoint`] for anything
    /// other than `local` or an `ssh://` URI. Nothing is spawned.
    pub fn from_config(socket: &str, use_sudo: bool, runner: R) -> Result<Self> {
        Ok(match parse_endpoint(socket)? {
            Endpoint::Local => Self::Local(LocalExecutor::new(runner)),
            Endpoint::Ssh(target) => {
                Self::Remote(RemoteExecutor::new(RemoteSession::new(target, runner), use_sudo))
            }
        })
    }

    /// Release the remote connection, if one was opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the ssh master cannot be told to exit.
    pub async fn close(self) -> Result<()> {
        match self {
            Self::Local(_) => Ok(()),
            Self::Remote(remote) => remote.session.close().await,
        }
    }
}

impl<R: CommandRunner> CommandExecutor for Executor<R> {
    async fn execute(&self, command_line: &str) -> Result<CommandResult> {
        match self {
            Self::Local(local) => local.execute(command_line).await,
            Self::Remote(remote) => remote.execute(command_line).await,
        }
    }
}
