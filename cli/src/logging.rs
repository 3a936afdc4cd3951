//! Diagnostic logging set up once per process.
//!
//! Events go to stderr so that stdout stays clean for `--json`. `RUST_LOG`
//! takes precedence over `-v`.

use std::sync::Once;

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: Once = Once::new();

/// Filter directive for the given `-v` count.
#[must_use]
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,vzkit=debug",
        _ => "warn,vzkit=trace",
    }
}

/// Install the global subscriber. Later calls are no-ops.
///
/// # Errors
///
/// Returns an error if another global subscriber was already installed.
pub fn setup_logging(verbose: u8) -> Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        let stderr_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter);
        result = Registry::default()
            .with(stderr_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"));
    });
    result
}
