//! Phone Exchange - interactive telephone exchange simulator
//!
//! Loads a phone directory, then reads operator commands from stdin and
//! drives the call state machine.

mod config;
mod console;
mod directory;
mod exchange;

use clap::Parser;
use config::{Config, LogFormat};
use console::Console;
use exchange::Exchange;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(config.log_format);

    tracing::debug!(?config, "Starting phone exchange");

    let report = match directory::load_directory(&config.directory, config.max_entries) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, path = %config.directory.display(), "Failed to load directory");
            println!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    for warning in &report.warnings {
        println!("{warning}");
    }
    println!(
        "Successfully loaded {} phone entries.",
        report.directory.len()
    );

    let exchange = Exchange::with_limits(report.directory, config.limits());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(exchange, stdin.lock(), stdout.lock(), config.max_input_len);
    let processed = console.run()?;

    tracing::info!(commands = processed, "Session ended");
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so they never interleave with console output
fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "phone_exchange=warn".into()),
    );
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}
