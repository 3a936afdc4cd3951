//! `vzkit destroy [--yes]`: stop and destroy the recorded container.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ProvisioningStateStore;
use crate::application::services::teardown;
use crate::commands::status::StatusView;
use crate::domain::Virtuozzo;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::executor::Executor;
use crate::output::TerminalReporter;

/// Run `vzkit destroy`.
///
/// A state without a container is a no-op that never opens a connection.
/// The updated state is saved even when teardown fails part way.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid or a hypervisor command fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let mut state = app.state_mgr.load_async().await?.unwrap_or_default();
    let Some(id) = state.identity.clone() else {
        app.output.success("nothing to destroy");
        return StatusView::new(&app.instance.name, &state).render(app);
    };

    if !app.confirm(&format!("Destroy container {id}?"), true)? {
        app.output.warn("cancelled");
        return Ok(());
    }

    let executor =
        Executor::from_config(&app.config.socket, app.config.use_sudo, TokioCommandRunner)?;
    let outcome = {
        let reporter = TerminalReporter::new(&app.output);
        teardown::destroy(&executor, &Virtuozzo, &reporter, &mut state).await
    };

    let saved = if state.is_empty() {
        app.state_mgr.clear()
    } else {
        app.state_mgr.save_async(&state).await
    };
    let closed = executor.close().await;
    outcome?;
    saved?;
    closed?;
    StatusView::new(&app.instance.name, &state).render(app)
}
