//! Transport endpoint parsing.
//!
//! The configured `socket` is either the literal `local` or an
//! `ssh://[user@]host[:port]` URI. Anything else is rejected before a single
//! command runs.

use std::fmt;

use anyhow::Result;
use url::Url;

use crate::domain::error::DriverError;

/// The literal that selects local process execution.
pub const LOCAL_ENDPOINT: &str = "local";

const SSH_SCHEME: &str = "ssh";
const SSH_DEFAULT_PORT: u16 = 22;

/// Where hypervisor commands are executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Local,
    Ssh(SshTarget),
}

/// A remote login target parsed from an `ssh://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: Option<String>,
    pub host: String,
    pub port: u16,
}

impl SshTarget {
    /// `user@host`, or just `host` when the URI carries no user.
    #[must_use]
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }
}

impl fmt::Display for SshTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ssh://{}:{}", self.destination(), self.port)
    }
}

/// Parses the configured endpoint.
///
/// # Errors
///
/// Returns [`DriverError::InvalidEndpoint`] if `raw` is neither `local` nor a
/// well-formed `ssh://` URI with a host.
pub fn parse_endpoint(raw: &str) -> Result<Endpoint> {
    let raw = raw.trim();
    if raw == LOCAL_ENDPOINT {
        return Ok(Endpoint::Local);
    }
    let invalid = || DriverError::InvalidEndpoint(raw.to_string());

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if url.scheme() != SSH_SCHEME {
        return Err(invalid().into());
    }
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(invalid)?
        .to_string();
    let user = Some(url.username())
        .filter(|u| !u.is_empty())
        .map(String::from);

    Ok(Endpoint::Ssh(SshTarget {
        user,
        host,
        port: url.port().unwrap_or(SSH_DEFAULT_PORT),
    }))
}
