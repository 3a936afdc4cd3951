//! Container address discovery.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandExecutor;
use crate::domain::address::{ADDRESS_QUERY_COMMAND, parse_ipv4};
use crate::domain::{ContainerIdentity, DriverError, HypervisorCli};

/// Bounded retry for the address poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

/// Poll the container until its first interface reports an IPv4 address.
///
/// Pauses `policy.interval` between attempts, never after the last one.
///
/// # Errors
///
/// Returns [`DriverError::AddressNotFound`] when every attempt comes back
/// without an address, or the first command execution error.
pub async fn discover_address(
    executor: &impl CommandExecutor,
    hypervisor: &(impl HypervisorCli + ?Sized),
    id: &ContainerIdentity,
    policy: DiscoveryPolicy,
) -> Result<String> {
    let query = hypervisor.diagnostic_exec(id, ADDRESS_QUERY_COMMAND);
    for attempt in 1..=policy.attempts {
        let result = executor.execute(&query).await?;
        if let Some(address) = parse_ipv4(&result.stdout) {
            tracing::info!(%address, attempt, "container address discovered");
            return Ok(address);
        }
        tracing::debug!(attempt, "no address yet");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(DriverError::AddressNotFound {
        attempts: policy.attempts,
    }
    .into())
}
