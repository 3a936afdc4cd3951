//! Application context: unified state passed to every command handler.
//!
//! Built once in `Cli::run()` from the top-level flags: output mode, the
//! loaded driver configuration, the calling instance, and its state file.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::{DriverConfig, InstanceInfo};
use crate::infra::config::YamlConfigLoader;
use crate::infra::state::StateManager;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `VZKIT_YES` env vars).
    pub yes: bool,
}

/// Which instance this run acts on and where its files live.
pub struct InstanceFlags {
    pub config: PathBuf,
    /// Explicit state file; `.kitchen/<name>.json` when unset.
    pub state: Option<PathBuf>,
    pub name: String,
    pub platform: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
    pub instance: InstanceFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context. Quiet whenever JSON mode is active so that
    /// stdout carries only the JSON document.
    pub output: OutputContext,
    pub mode: OutputMode,
    pub config: DriverConfig,
    pub instance: InstanceInfo,
    pub state_mgr: StateManager,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("VZKIT_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = YamlConfigLoader::new(&flags.instance.config).load_relative_to(&cwd)?;
        let state_mgr = match &flags.instance.state {
            Some(path) => StateManager::with_path(path.clone()),
            None => StateManager::for_instance(&cwd, &flags.instance.name),
        };

        Ok(Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config,
            instance: InstanceInfo {
                name: flags.instance.name.clone(),
                platform: flags.instance.platform.clone(),
            },
            state_mgr,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `VZKIT_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
