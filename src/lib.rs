//! Core library for the `codebrief` CLI.
//!
//! Scans a source tree, groups related files into components, summarizes
//! each through a language model with a persistent mtime-validated cache, and
//! assembles one relevance-ordered document.

pub mod adapters;
pub mod cache;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod ports;
pub mod project;
pub mod summarize;

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::BriefError;
use crate::summarize::RunReport;

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "warn,codebrief=debug" } else { "warn,codebrief=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI for already parsed arguments.
///
/// # Errors
///
/// Returns the fatal error that stopped the run.
pub fn run(cli: &Cli) -> Result<RunReport, BriefError> {
    commands::dispatch(cli)
}
