//! `vzkit status`: show the recorded container.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::ProvisioningStateStore;
use crate::domain::ProvisioningState;
use crate::output::json;

/// What is known about one instance's container.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusView {
    pub instance: String,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<PathBuf>,
}

impl StatusView {
    #[must_use]
    pub fn new(instance: &str, state: &ProvisioningState) -> Self {
        Self {
            instance: instance.to_string(),
            created: state.identity.is_some(),
            ct_id: state.identity.as_ref().map(ToString::to_string),
            hostname: state.address.clone(),
            ssh_key: state.ssh_key.clone(),
        }
    }

    /// Print as JSON, or as key/value lines through `app.output`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, app: &AppContext) -> Result<()> {
        if app.is_json() {
            println!("{}", json::format(self)?);
            return Ok(());
        }
        let out = &app.output;
        out.title(&format!("instance {}", self.instance));
        out.field("container", self.ct_id.as_deref().unwrap_or("not created"));
        if let Some(address) = &self.hostname {
            out.field("address", address);
        }
        if let Some(key) = &self.ssh_key {
            out.field("ssh key", &key.display().to_string());
        }
        Ok(())
    }
}

/// Run `vzkit status`.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub async fn run(app: &AppContext) -> Result<()> {
    let state = app.state_mgr.load_async().await?.unwrap_or_default();
    StatusView::new(&app.instance.name, &state).render(app)
}
