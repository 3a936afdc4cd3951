//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while provisioning or tearing down a container.
///
/// Services return `anyhow::Result`; callers that need to branch on the kind
/// use `err.downcast_ref::<DriverError>()`, which sees through `.context()`.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Invalid endpoint '{0}'. Use 'local' or an ssh://user@host:port URI.")]
    InvalidEndpoint(String),

    /// `exit_status` is `-1` when the process was terminated by a signal.
    #[error("command failed with exit status {exit_status}: {stderr}")]
    CommandExecution { exit_status: i32, stderr: String },

    #[error("Can't detect an IP address after {attempts} attempts.")]
    AddressNotFound { attempts: u32 },

    #[error("credential file {}: {source}", path.display())]
    CredentialIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}

impl DriverError {
    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::CommandExecution { .. } => "command_failed",
            Self::AddressNotFound { .. } => "address_not_found",
            Self::CredentialIo { .. } => "credential_io",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }

    /// Build a `CredentialIo` error for `path`.
    pub fn credential(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CredentialIo {
            path: path.into(),
            source,
        }
    }
}
