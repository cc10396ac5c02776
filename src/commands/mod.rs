//! Command dispatch.

pub mod generate;

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::cli::Cli;
use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::BriefError;
use crate::summarize::RunReport;

/// Env var naming a cassette to record LLM interactions into.
pub const RECORD_ENV: &str = "CODEBRIEF_RECORD";
/// Env var naming a cassette to replay LLM interactions from.
pub const REPLAY_ENV: &str = "CODEBRIEF_REPLAY";

/// Picks the service context for this process.
///
/// `CODEBRIEF_REPLAY` wins over `CODEBRIEF_RECORD`; with neither set the
/// context is live.
fn context_from_env() -> Result<ServiceContext, BriefError> {
    if let Ok(path) = env::var(REPLAY_ENV) {
        info!(cassette = %path, "replaying service interactions");
        return ServiceContext::replaying(&PathBuf::from(path));
    }
    if let Ok(path) = env::var(RECORD_ENV) {
        info!(cassette = %path, "recording service interactions");
        return Ok(ServiceContext::recording(&PathBuf::from(path)));
    }
    Ok(ServiceContext::live())
}

/// Runs one generation for the parsed command line.
///
/// The context is dropped before returning, so a recorded cassette is on
/// disk once this returns, even on failure.
///
/// # Errors
///
/// Returns any fatal [`BriefError`] raised by configuration or the run.
pub fn dispatch(cli: &Cli) -> Result<RunReport, BriefError> {
    let config = RunConfig::from_cli(cli)?;
    let ctx = context_from_env()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| BriefError::Config(format!("failed to start runtime: {e}")))?;
    let result = runtime.block_on(generate::run(&ctx, &config));

    drop(ctx);
    if result.is_ok() {
        println!("Document written to {}", config.output_path.display());
    }
    result
}
