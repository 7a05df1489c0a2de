//! Loom CLI - file-backed content site server.
//!
//! Provides commands for:
//! - `serve`: Serve a site directory over HTTP with template hot reload
//! - `check`: Compile a site's templates once and report errors

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ServeArgs};
use error::CliError;
use output::Report;

/// Loom - file-backed content site server.
#[derive(Parser)]
#[command(name = "loom", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server.
    Serve(ServeArgs),
    /// Compile templates and report the first error.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        Report::stderr().failed(&err);
        std::process::exit(1);
    }
}
