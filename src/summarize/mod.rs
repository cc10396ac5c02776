//! Per-component summarization: cache lookup, prompt, service call, scoring.

pub mod prompt;
pub mod retry;
pub mod score;

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cache::{file_key, SummaryCache};
use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::BriefError;
use crate::ports::llm::CompletionRequest;
use crate::project::pairing::{pair_files, Component};
use crate::project::{file_name, ProjectStructure};

/// A summarized component, ready for the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    /// Component key (stem, shader core, or file name for unpaired files).
    pub name: String,
    /// Member files that contributed to the summary.
    pub files: Vec<PathBuf>,
    /// Summary text as generated, score marker included.
    pub summary: String,
    /// Relevance score.
    pub relevance: f64,
}

/// What happened to one component.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Served from the cache without a service call.
    Cached(SummaryRecord),
    /// Freshly generated and stored.
    Generated(SummaryRecord),
    /// Left out of the document.
    Skipped {
        /// Component key.
        name: String,
        /// Why it was skipped.
        reason: String,
    },
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Components served from the cache.
    pub cached: usize,
    /// Components summarized by the service.
    pub generated: usize,
    /// Skipped components with the reason for each.
    pub skipped: Vec<(String, String)>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cached, {} generated, {} skipped",
            self.cached,
            self.generated,
            self.skipped.len()
        )?;
        for (name, reason) in &self.skipped {
            write!(f, "\n  skipped {name}: {reason}")?;
        }
        Ok(())
    }
}

/// Summarizes components one at a time against a shared cache.
pub struct Summarizer<'a> {
    ctx: &'a ServiceContext,
    config: &'a RunConfig,
    cache: SummaryCache<'a>,
    project_overview: String,
}

impl<'a> Summarizer<'a> {
    /// Creates a summarizer. `project_overview` is sent as context with every prompt.
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        config: &'a RunConfig,
        cache: SummaryCache<'a>,
        project_overview: String,
    ) -> Self {
        Self { ctx, config, cache, project_overview }
    }

    /// Gives back the cache once summarization is done.
    #[must_use]
    pub fn into_cache(self) -> SummaryCache<'a> {
        self.cache
    }

    /// Produces the summary for one component.
    ///
    /// Files are decoded lossily, so only a member that can no longer be
    /// stat'ed or opened is left out. A component with no such member left,
    /// or whose service calls keep failing, is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Persist`] if the cache cannot be written.
    pub async fn summarize(&mut self, component: &Component) -> Result<Outcome, BriefError> {
        let key = file_key(&component.files);
        if self.config.refresh {
            debug!(component = %component.key, "refresh requested; skipping cache");
        } else if let Some(entry) = self.cache.lookup(&key, &component.files) {
            debug!(component = %component.key, "cache hit");
            return Ok(Outcome::Cached(SummaryRecord {
                name: component.key.clone(),
                files: component.files.clone(),
                summary: entry.summary.clone(),
                relevance: entry.relevance,
            }));
        }

        let fs = self.ctx.fs.as_ref();
        let mut files = Vec::new();
        let mut names = Vec::new();
        let mut contents = Vec::new();
        let mut mtimes = Vec::new();
        for path in &component.files {
            let read = fs.modified(path).and_then(|mtime| Ok((mtime, fs.read_bytes(path)?)));
            match read {
                Ok((mtime, bytes)) => {
                    files.push(path.clone());
                    names.push(file_name(path));
                    contents.push(String::from_utf8_lossy(&bytes).into_owned());
                    mtimes.push((path.clone(), mtime));
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "file vanished; leaving it out");
                }
            }
        }
        if files.is_empty() {
            warn!(component = %component.key, "no readable files; skipping component");
            return Ok(Outcome::Skipped {
                name: component.key.clone(),
                reason: "no member file could be read".into(),
            });
        }

        let is_test =
            files.iter().zip(&contents).any(|(path, content)| prompt::is_probable_test(path, content));
        let combined = prompt::combine_contents(&names, &contents);
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: Some(prompt::SUMMARY_SYSTEM_PROMPT.to_string()),
            prompt: prompt::build_summary_prompt(&names, &combined, &self.project_overview, is_test),
            max_tokens: self.config.max_tokens,
        };

        info!(component = %component.key, files = files.len(), "summarizing");
        let response =
            match retry::complete_with_retry(self.ctx.llm.as_ref(), &request, &self.config.retry)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(component = %component.key, error = %e, "summary failed; skipping component");
                    return Ok(Outcome::Skipped { name: component.key.clone(), reason: e.to_string() });
                }
            };

        let relevance = score::extract_relevance(&response.text);
        mtimes.sort_by(|a, b| a.0.to_string_lossy().cmp(&b.0.to_string_lossy()));
        let mtimes = mtimes.into_iter().map(|(_, mtime)| mtime).collect();
        // Full membership keeps the entry reachable by the next lookup.
        let store_key = if files.len() == component.files.len() { key } else { file_key(&files) };
        self.cache.store(&store_key, &response.text, relevance, mtimes)?;

        Ok(Outcome::Generated(SummaryRecord {
            name: component.key.clone(),
            files,
            summary: response.text,
            relevance,
        }))
    }
}

/// Summarizes every component of `structure`, directory by directory.
///
/// Records come back in production order; skips are listed in the report.
///
/// # Errors
///
/// Returns [`BriefError::Persist`] if the cache cannot be written.
pub async fn summarize_project(
    summarizer: &mut Summarizer<'_>,
    structure: &ProjectStructure,
) -> Result<(Vec<SummaryRecord>, RunReport), BriefError> {
    let mut records = Vec::new();
    let mut report = RunReport::default();

    for (dir, files) in structure.iter() {
        let pairing = pair_files(files, &summarizer.config.rules);
        debug!(
            dir = %dir.display(),
            components = pairing.components.len(),
            unpaired = pairing.unpaired_files.len() + pairing.unpaired_shaders.len(),
            "paired directory"
        );
        for unit in pairing.units() {
            match summarizer.summarize(&unit).await? {
                Outcome::Cached(record) => {
                    report.cached += 1;
                    records.push(record);
                }
                Outcome::Generated(record) => {
                    report.generated += 1;
                    records.push(record);
                }
                Outcome::Skipped { name, reason } => report.skipped.push((name, reason)),
            }
        }
    }

    info!(
        cached = report.cached,
        generated = report.generated,
        skipped = report.skipped.len(),
        "summarization complete"
    );
    Ok((records, report))
}
