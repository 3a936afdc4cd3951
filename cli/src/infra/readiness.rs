//! `ssh` login check implementing the `ReadinessCheck` port.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LoginTarget, ReadinessCheck};

#[cfg(windows)]
const DEVNULL: &str = "NUL";
#[cfg(not(windows))]
const DEVNULL: &str = "/dev/null";

/// Retries a no-op login until sshd in the container accepts the key.
///
/// The container is brand new, so its host key is never checked. There is
/// no overall deadline; the caller owns that.
pub struct SshReadinessCheck<R> {
    runner: R,
    interval: Duration,
}

impl<R: CommandRunner> SshReadinessCheck<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            interval: Duration::from_secs(2),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl<R: CommandRunner> ReadinessCheck for SshReadinessCheck<R> {
    async fn wait_until_ready(&self, target: &LoginTarget) -> Result<()> {
        let key = target.private_key.to_string_lossy().into_owned();
        let known_hosts = format!("UserKnownHostsFile={DEVNULL}");
        let destination = format!("{}@{}", target.username, target.address);
        let args = [
            "-i",
            key.as_str(),
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            known_hosts.as_str(),
            "-o",
            "LogLevel=ERROR",
            "-o",
            "BatchMode=yes",
            "-o",
            "ConnectTimeout=5",
            destination.as_str(),
            "true",
        ];

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let output = self.runner.run("ssh", &args).await?;
            if output.status.success() {
                tracing::info!(%destination, attempt, "sshd accepted login");
                return Ok(());
            }
            tracing::debug!(
                %destination,
                attempt,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "sshd not ready"
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}
