//! Error taxonomy for a `codebrief` run.
//!
//! Only configuration, scan and persistence failures abort a run. Everything
//! else (vanished files, malformed responses, a component whose service calls
//! keep failing) is logged and skipped by the orchestrator.

use std::error::Error;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn Error + Send + Sync>;

/// Errors surfaced by the library.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Invalid arguments or an unusable project root.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configured directory could not be enumerated.
    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: PortError,
    },

    /// The summary cache or the final document could not be written.
    ///
    /// Kept separate from logic errors: service calls made before this point
    /// may have been paid for without being durably recorded.
    #[error("failed to persist {}: {source}", path.display())]
    Persist {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying write failure.
        #[source]
        source: PortError,
    },

    /// The summarization service kept failing for one request.
    #[error("summarization service failed after {attempts} attempt(s): {message}")]
    Llm {
        /// How many attempts were made.
        attempts: u32,
        /// Last error reported by the service.
        message: String,
    },

    /// A cassette file could not be loaded.
    #[error("cassette error: {0}")]
    Cassette(String),
}

impl BriefError {
    /// Process exit code for this error.
    ///
    /// Persistence failures get their own code so operators can tell them
    /// apart from ordinary failures.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Persist { .. } => 3,
            _ => 1,
        }
    }
}
