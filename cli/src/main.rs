//! vzkit - Disposable Virtuozzo containers for integration test runs

use clap::Parser;

use vzkit::cli::Cli;
use vzkit::domain::DriverError;
use vzkit::output::{Marker, OutputContext, json};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.command.is_none() {
        eprintln!("{}", Cli::help_text());
        std::process::exit(2);
    }
    if let Err(e) = vzkit::logging::setup_logging(cli.verbose) {
        eprintln!("Warning: {e}");
    }
    let json_mode = cli.json;
    let no_color = cli.no_color;
    if let Err(e) = cli.run().await {
        let message = format!("{e:#}");
        let code = e.downcast_ref::<DriverError>().map_or("error", DriverError::code);
        match json_mode.then(|| json::format_error(&message, code)) {
            Some(Ok(body)) => println!("{body}"),
            _ => OutputContext::new(no_color, false)
                .line(Marker::Failure, &format!("Error: {message}")),
        }
        std::process::exit(1);
    }
}
