//! apidoc CLI - API documentation from recorded HTTP exchanges.
//!
//! Provides commands for:
//! - `render`: Render documentation artifacts for exchange files
//! - `check`: Validate exchange bodies against their declared fields

mod commands;
mod error;
mod exchange_file;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs};
use output::Output;

/// apidoc - API documentation from recorded HTTP exchanges.
#[derive(Parser)]
#[command(name = "apidoc", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render documentation artifacts for recorded exchanges.
    Render(RenderArgs),
    /// Check recorded exchanges against their declared fields.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
