//! Command implementations

pub mod create;
pub mod destroy;
pub mod status;

use clap::Args;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Platform name, e.g. `centos-7.2`; selects the OS template unless
    /// `ostemplate` is configured
    #[arg(long, env = "VZKIT_PLATFORM")]
    pub platform: Option<String>,
}

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}
