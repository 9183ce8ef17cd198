#![deny(missing_docs)]

//! # UIGen CLI
//!
//! Command Line Interface for the OpenAPI -> UI schema compiler.
//!
//! Supported Commands:
//! - `compile`: One document to one UI schema (file or stdout).
//! - `batch`: Every document under a directory.
//! - `serve`: UI schema plus a mock CRUD API over HTTP (feature `server`).

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod batch;
mod compile;
mod error;
#[cfg(feature = "server")]
mod serve;
mod source;

/// Log filter used when `--log-level` cannot be parsed.
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI to UI schema compiler")]
struct Cli {
    /// Log filter directive, e.g. `info` or `uigen_core=debug`.
    #[clap(long, global = true, env = "UIGEN_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile one OpenAPI document into a UI schema.
    Compile(compile::CompileArgs),
    /// Compile every OpenAPI document under a directory.
    Batch(batch::BatchArgs),
    /// Serve the UI schema and a mock CRUD API.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

/// Installs a stderr subscriber so stdout stays machine-readable.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{}': {}", level, e);
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match &cli.command {
        Commands::Compile(args) => compile::execute(args)?,
        Commands::Batch(args) => {
            batch::execute(args)?;
        }
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}
