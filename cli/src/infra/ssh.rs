//! Remote session over an OpenSSH control master.
//!
//! The first command starts a background `ssh -M` master on a private
//! control socket. Every command after that is a fresh `ssh -S` client that
//! multiplexes a new channel over the same authenticated connection, so the
//! handshake happens once per run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;
use tokio::sync::OnceCell;

use crate::application::ports::{CommandResult, CommandRunner};
use crate::domain::SshTarget;

const SSH: &str = "ssh";

/// Seconds the master lingers after the last client disconnects, in case
/// `close` is never reached.
const CONTROL_PERSIST: &str = "ControlPersist=600";

/// Control socket of a running master. The directory is removed on drop.
struct ControlSocket {
    _dir: TempDir,
    path: String,
}

/// One lazily opened, memoized connection to a remote hypervisor host.
pub struct RemoteSession<R> {
    target: SshTarget,
    runner: R,
    control: OnceCell<ControlSocket>,
}

impl<R: CommandRunner> RemoteSession<R> {
    #[must_use]
    pub fn new(target: SshTarget, runner: R) -> Self {
        Self {
            target,
            runner,
            control: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &SshTarget {
        &self.target
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.control.initialized()
    }

    /// Run one command line on the remote host, connecting first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established, or
    /// [`crate::domain::DriverError::CommandExecution`] carrying the remote
    /// stderr when the command exits nonzero.
    pub async fn run(&self, command_line: &str) -> Result<CommandResult> {
        let socket = self.connect().await?;
        let port = self.target.port.to_string();
        let destination = self.target.destination();
        let args = [
            "-S",
            socket.path.as_str(),
            "-o",
            "ControlMaster=no",
            "-o",
            "BatchMode=yes",
            "-p",
            port.as_str(),
            destination.as_str(),
            "--",
            command_line,
        ];
        let output = self
            .runner
            .run(SSH, &args)
            .await
            .with_context(|| format!("running command on {}", self.target))?;
        let result = CommandResult::from_output(&output).check()?;
        let stdout = result.stdout.trim();
        if !stdout.is_empty() {
            tracing::debug!(host = %self.target.host, "{stdout}");
        }
        Ok(result)
    }

    /// Shut the master down. A session that never connected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `ssh -O exit` cannot be spawned.
    pub async fn close(self) -> Result<()> {
        let Some(socket) = self.control.into_inner() else {
            return Ok(());
        };
        let port = self.target.port.to_string();
        let destination = self.target.destination();
        let status = self
            .runner
            .run_status(
                SSH,
                &[
                    "-S",
                    socket.path.as_str(),
                    "-O",
                    "exit",
                    "-p",
                    port.as_str(),
                    destination.as_str(),
                ],
            )
            .await?;
        if !status.success() {
            tracing::warn!(endpoint = %self.target, %status, "ssh master did not exit cleanly");
        }
        tracing::debug!(endpoint = %self.target, "ssh session closed");
        Ok(())
    }

    async fn connect(&self) -> Result<&ControlSocket> {
        self.control
            .get_or_try_init(|| async {
                let dir = tempfile::Builder::new()
                    .prefix("vzkit-ssh-")
                    .tempdir()
                    .context("creating ssh control directory")?;
                let path: PathBuf = dir.path().join("master");
                let path = path.to_string_lossy().into_owned();
                let port = self.target.port.to_string();
                let destination = self.target.destination();

                tracing::debug!(endpoint = %self.target, "opening ssh session");
                // `-f` backgrounds the master after authentication, so the
                // call returns once the socket is usable.
                let status = self
                    .runner
                    .run_status(
                        SSH,
                        &[
                            "-M",
                            "-S",
                            path.as_str(),
                            "-o",
                            CONTROL_PERSIST,
                            "-o",
                            "BatchMode=yes",
                            "-o",
                            "LogLevel=ERROR",
                            "-f",
                            "-N",
                            "-p",
                            port.as_str(),
                            destination.as_str(),
                        ],
                    )
                    .await
                    .with_context(|| format!("connecting to {}", self.target))?;
                if !status.success() {
                    anyhow::bail!("ssh connection to {} failed ({status})", self.target);
                }
                Ok::<_, anyhow::Error>(ControlSocket { _dir: dir, path })
            })
            .await
    }
}
