//! sidenav CLI - sidebar navigation builder and validator.
//!
//! Provides commands for:
//! - `check`: Build every sidebar and report all diagnostics
//! - `show`: Print a normalized sidebar as JSON

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ShowArgs};
use output::Output;

/// sidenav - sidebar navigation builder and validator.
#[derive(Parser)]
#[command(name = "sidenav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every sidebar and report problems.
    Check(CheckArgs),
    /// Print a normalized sidebar as JSON.
    Show(ShowArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Check(args) => args.verbose,
        Commands::Show(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Show(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
