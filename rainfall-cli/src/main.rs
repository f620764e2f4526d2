//! Binary crate for the `rainfall` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive city/date form
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod prompt;
mod render;

#[tokio::main]
async fn main() {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);

    let code = match cmd.run().await {
        Ok(()) => 0,
        Err(err) => {
            render::print_error(&err);
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rainfall_core=debug,rainfall=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
