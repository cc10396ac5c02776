//! Run configuration assembled from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_PATH;
use crate::cli::Cli;
use crate::error::BriefError;
use crate::project::pairing::PairingRules;

/// Default model used for summaries and the overview.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default name of the generated document, written under the project root.
pub const DEFAULT_OUTPUT_FILE: &str = "README.md";

/// Timeout and retry settings for service calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub initial_backoff: Duration,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Everything a run needs besides the service ports.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Project root, scanned non-recursively.
    pub root: PathBuf,
    /// Directories scanned recursively.
    pub recursive_dirs: Vec<PathBuf>,
    /// Where the document is written.
    pub output_path: PathBuf,
    /// Where the summary cache lives.
    pub cache_path: PathBuf,
    /// Model identifier passed to the service.
    pub model: String,
    /// Token budget per completion.
    pub max_tokens: u32,
    /// How many top components feed the overview.
    pub overview_top_n: usize,
    /// Ask the service for an overview; otherwise build one locally.
    pub overview: bool,
    /// Ignore cache hits and regenerate everything.
    pub refresh: bool,
    /// Naming conventions.
    pub rules: PairingRules,
    /// Timeouts and retries for service calls.
    pub retry: RetryPolicy,
}

impl RunConfig {
    /// Defaults for a project rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, recursive_dirs: Vec<PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive_dirs,
            output_path: root.join(DEFAULT_OUTPUT_FILE),
            cache_path: root.join(DEFAULT_CACHE_PATH),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            overview_top_n: 5,
            overview: true,
            refresh: false,
            rules: PairingRules::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Validates the parsed command line and resolves paths.
    ///
    /// Relative scan directories are taken relative to the root, never the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Config`] if the root is missing or not a directory.
    pub fn from_cli(cli: &Cli) -> Result<Self, BriefError> {
        let root = std::fs::canonicalize(&cli.root).map_err(|e| {
            BriefError::Config(format!("project root {}: {e}", cli.root.display()))
        })?;
        if !root.is_dir() {
            return Err(BriefError::Config(format!(
                "project root {} is not a directory",
                root.display()
            )));
        }
        if cli.dirs.is_empty() {
            return Err(BriefError::Config("at least one directory to scan is required".into()));
        }

        let recursive_dirs = cli.dirs.iter().map(|dir| resolve_dir(&root, dir)).collect();
        let mut config = Self::new(&root, recursive_dirs);

        if let Some(output) = &cli.output {
            config.output_path = root.join(output);
        }
        if let Some(cache) = &cli.cache {
            config.cache_path = root.join(cache);
        }
        config.model.clone_from(&cli.model);
        config.max_tokens = cli.max_tokens;
        config.overview_top_n = cli.top;
        config.overview = !cli.no_overview;
        config.refresh = cli.refresh;
        config.rules.extra_suffixes.clone_from(&cli.suffixes);
        config.rules.separate_unpaired_shaders = cli.separate_shaders;
        config.retry.max_attempts = cli.attempts.max(1);
        config.retry.timeout = Duration::from_secs(cli.timeout_secs);
        Ok(config)
    }
}

/// Absolute form of a scan directory. Relative paths are taken against `root`.
///
/// Nonexistent directories are passed through so the walker can report them.
fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    let joined = root.join(dir);
    std::fs::canonicalize(&joined).unwrap_or(joined)
}
