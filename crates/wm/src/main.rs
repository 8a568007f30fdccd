//! web-maker CLI - Static site generator.
//!
//! Provides commands for:
//! - `init`: Create a new project
//! - `build`: Generate the site
//! - `clean`: Delete the output directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CleanArgs, InitArgs};
use output::Output;

/// web-maker - Static site generator.
#[derive(Parser)]
#[command(name = "web-maker", version, about)]
struct Cli {
    /// Print debug log level with more information.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project in an empty directory.
    Init(InitArgs),
    /// Generate the site.
    Build(BuildArgs),
    /// Delete the output directory.
    Clean(CleanArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to INFO
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Clean(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
