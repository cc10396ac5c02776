//! Service context bundling the port trait objects a run needs.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::recording::RecordingLlmClient;
use crate::adapters::replaying::ReplayingLlmClient;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::BriefError;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;

/// Bundles the port trait objects into a single, explicitly passed context.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording). There is no process-wide client.
pub struct ServiceContext {
    /// Filesystem for scanning, reading and persisting.
    pub fs: Box<dyn FileSystem>,
    /// LLM client used for summaries and the project overview.
    pub llm: Box<dyn LlmClient>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk and the Anthropic API.
    #[must_use]
    pub fn live() -> Self {
        Self::with_ports(Box::new(LiveFileSystem), Box::new(LiveLlmClient::new()))
    }

    /// Creates a recording context that writes an LLM cassette to `path` on drop.
    ///
    /// Uses live adapters for actual work. This is the developer mechanism
    /// behind the `CODEBRIEF_RECORD` env var.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "codebrief-session")));
        let llm = RecordingLlmClient::new(Box::new(LiveLlmClient::new()), Arc::clone(&recorder));
        Self { fs: Box::new(LiveFileSystem), llm: Box::new(llm), recorder: Some(recorder) }
    }

    /// Creates a context whose LLM answers come from a cassette file.
    ///
    /// The filesystem stays live: replay reproduces service answers, not the
    /// project tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, BriefError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BriefError::Cassette(format!("failed to read {}: {e}", path.display()))
        })?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| BriefError::Cassette(format!("{}: {e}", path.display())))?;
        let llm = ReplayingLlmClient::new(CassetteReplayer::new(&cassette));
        Ok(Self::with_ports(Box::new(LiveFileSystem), Box::new(llm)))
    }

    /// Creates a context from arbitrary port implementations.
    #[must_use]
    pub fn with_ports(fs: Box<dyn FileSystem>, llm: Box<dyn LlmClient>) -> Self {
        Self { fs, llm, recorder: None }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let Ok(guard) = recorder.lock() else {
                tracing::warn!("recorder lock poisoned; cassette not written");
                return;
            };
            match guard.finish() {
                Ok(path) => tracing::info!(path = %path.display(), "cassette written"),
                Err(e) => tracing::warn!(
                    path = %guard.path().display(),
                    error = %e,
                    "failed to write cassette"
                ),
            }
        }
    }
}
