//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_MODEL;

/// Top-level CLI parser for `codebrief`.
#[derive(Debug, Parser)]
#[command(
    name = "codebrief",
    version,
    about = "Summarize a source tree into a single relevance-ordered README"
)]
pub struct Cli {
    /// Project root. Scanned non-recursively; the document is written here.
    pub root: PathBuf,

    /// Directories to scan recursively.
    #[arg(required = true, num_args = 1..)]
    pub dirs: Vec<PathBuf>,

    /// Output file, relative to the root.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Summary cache file, relative to the root.
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Model used for summaries and the overview.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Token budget per completion.
    #[arg(long, default_value_t = 4096)]
    pub max_tokens: u32,

    /// Number of top-ranked components that feed the overview.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Build the overview locally instead of asking the service.
    #[arg(long)]
    pub no_overview: bool,

    /// Regenerate every summary, ignoring cached ones.
    #[arg(long)]
    pub refresh: bool,

    /// Extra file suffix to scan (repeatable). Such files are never paired.
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub suffixes: Vec<String>,

    /// Collect unpaired shaders in their own bucket.
    #[arg(long)]
    pub separate_shaders: bool,

    /// Attempts per service call before a component is skipped.
    #[arg(long, default_value_t = 3)]
    pub attempts: u32,

    /// Timeout for a single service call, in seconds.
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Verbose logging (overridden by `RUST_LOG`).
    #[arg(short, long)]
    pub verbose: bool,
}
