//! `vzkit create [--platform <name>]`: provision a container.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ProvisioningStateStore;
use crate::application::services::provision::Provisioner;
use crate::commands::status::StatusView;
use crate::domain::Virtuozzo;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::executor::Executor;
use crate::infra::identity::UuidIdentities;
use crate::infra::keys::SshKeygen;
use crate::infra::readiness::SshReadinessCheck;
use crate::output::TerminalReporter;

/// Run `vzkit create`.
///
/// The state file is written whether or not provisioning succeeds, so a
/// half-built container can still be removed with `vzkit destroy`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the instance already
/// has a container, or any provisioning step fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let runner = TokioCommandRunner;
    let executor = Executor::from_config(&app.config.socket, app.config.use_sudo, runner)?;
    let spec = app.config.resource_spec(&app.instance)?;
    let keypair = app.config.keypair();

    let mut state = app.state_mgr.load_async().await?.unwrap_or_default();
    if let Some(id) = &state.identity {
        anyhow::bail!(
            "instance '{}' already has container {id}; run `vzkit destroy` first",
            app.instance.name
        );
    }

    let keys = SshKeygen::new(runner);
    let readiness = SshReadinessCheck::new(runner);
    let outcome = {
        let reporter = TerminalReporter::new(&app.output);
        let mut provisioner = Provisioner::new(
            &executor,
            &Virtuozzo,
            &keys,
            &readiness,
            &UuidIdentities,
            &reporter,
        );
        let outcome = provisioner.create(&spec, &keypair, &mut state).await;
        tracing::debug!(phase = %provisioner.phase(), "create finished");
        outcome
    };

    let saved = app.state_mgr.save_async(&state).await;
    let closed = executor.close().await;
    outcome?;
    saved?;
    closed?;
    StatusView::new(&app.instance.name, &state).render(app)
}
