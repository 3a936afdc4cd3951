//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, InstanceFlags, OutputFlags};
use crate::commands;

/// Disposable Virtuozzo containers for integration test runs
#[derive(Parser)]
#[command(name = "vzkit", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also disabled when `NO_COLOR` is set)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase diagnostic logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Driver configuration file
    #[arg(
        long,
        global = true,
        env = "VZKIT_CONFIG",
        default_value = ".kitchen.vz.yml"
    )]
    pub config: PathBuf,

    /// Instance name; also the default container hostname
    #[arg(long, global = true, env = "VZKIT_INSTANCE", default_value = "default")]
    pub instance: String,

    /// State file (default: .kitchen/<instance>.json)
    #[arg(long, global = true, env = "VZKIT_STATE")]
    pub state: Option<PathBuf>,

    /// Absent only for a bare `vzkit`, which prints help.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision a container and wait until it accepts logins
    Create(commands::CreateArgs),

    /// Stop and destroy the recorded container
    Destroy(commands::DestroyArgs),

    /// Show the recorded container
    Status,
}

impl Cli {
    /// Full help text, as printed for a bare `vzkit`.
    #[must_use]
    pub fn help_text() -> String {
        Self::command().render_help().to_string()
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if no subcommand was given or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            config,
            instance,
            state,
            command,
        } = self;
        let Some(command) = command else {
            anyhow::bail!("no command given; run `vzkit --help`");
        };
        let yes = matches!(&command, Command::Destroy(args) if args.yes);
        let platform = match &command {
            Command::Create(args) => args.platform.clone(),
            _ => None,
        };
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
            instance: InstanceFlags {
                config,
                state,
                name: instance,
                platform,
            },
        })?;

        match command {
            Command::Create(_) => commands::create::run(&app).await,
            Command::Destroy(_) => commands::destroy::run(&app).await,
            Command::Status => commands::status::run(&app).await,
        }
    }
}
