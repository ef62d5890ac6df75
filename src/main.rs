mod cli;
mod commands;
mod dispatcher;
mod ui;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so `--json` output stays clean; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match dispatcher::dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => dispatcher::report_failure(&e, cli.json),
    }
}
