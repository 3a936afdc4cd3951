//! Container teardown: stop, then destroy.

use anyhow::{Context, Result};

use crate::application::ports::{CommandExecutor, ProgressReporter};
use crate::domain::{HypervisorCli, ProvisioningState};

/// Stop and destroy the container recorded in `state`.
///
/// A state without an identity is a no-op and never reaches the executor.
/// Stop is issued without checking whether the container is running. After
/// both commands succeed the identity and address are cleared from `state`.
///
/// # Errors
///
/// Returns the first command failure; nothing is suppressed.
pub async fn destroy(
    executor: &impl CommandExecutor,
    hypervisor: &(impl HypervisorCli + ?Sized),
    reporter: &impl ProgressReporter,
    state: &mut ProvisioningState,
) -> Result<()> {
    let Some(id) = state.identity.clone() else {
        tracing::debug!("no container recorded, nothing to destroy");
        return Ok(());
    };

    reporter.step(&format!("stopping container {id}..."));
    let stopped = executor
        .execute(&hypervisor.stop(&id))
        .await
        .with_context(|| format!("stopping container {id}"))?;
    reporter.output(&stopped.stdout);

    reporter.step(&format!("destroying container {id}..."));
    let destroyed = executor
        .execute(&hypervisor.destroy(&id))
        .await
        .with_context(|| format!("destroying container {id}"))?;
    reporter.output(&destroyed.stdout);

    state.identity = None;
    state.address = None;
    reporter.success(&format!("container {id} destroyed"));
    Ok(())
}
