//! Assembles the final document from summary records.
//!
//! Layout is fixed: title, overview, project structure, then one section per
//! component in descending relevance. Nothing follows the last section.

pub mod tree;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::ports::llm::CompletionRequest;
use crate::project::{file_name, ProjectStructure};
use crate::summarize::retry::complete_with_retry;
use crate::summarize::score::strip_relevance_markers;
use crate::summarize::SummaryRecord;

pub use tree::render_file_tree;

/// Literal that must never reach the rendered document.
const SCORE_MARKER: &str = "Relevance score:";

const OVERVIEW_SYSTEM_PROMPT: &str =
    "You are an AI assistant tasked with writing the overview section of a project README.";

/// One rendered component section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Member file names joined with ` / `.
    pub title: String,
    /// Summary with score markers removed.
    pub body: String,
}

/// The assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Project name.
    pub title: String,
    /// Short description of the project.
    pub overview: String,
    /// Rendered file tree.
    pub file_tree: String,
    /// Component sections in descending relevance.
    pub sections: Vec<Section>,
}

impl Document {
    /// Renders the document as Markdown.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = vec![
            format!("# {}", self.title),
            format!("## Overview\n\n{}", self.overview.trim()),
            format!("## Project Structure\n\n```text\n{}\n```", self.file_tree),
        ];
        for section in &self.sections {
            parts.push(format!("## {}\n\n{}", section.title, section.body));
        }
        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }
}

/// Section title for a component: member file names joined with ` / `.
#[must_use]
pub fn component_title(record: &SummaryRecord) -> String {
    record.files.iter().map(|f| file_name(f)).collect::<Vec<_>>().join(" / ")
}

/// Sorts by relevance, highest first. Ties keep their production order.
pub fn rank(records: &mut [SummaryRecord]) {
    records.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
}

/// Overview built without the service from the top-ranked components.
#[must_use]
pub fn local_overview(project: &str, structure: &ProjectStructure, top: &[SummaryRecord]) -> String {
    let mut text = format!(
        "{project} consists of {} source files in {} directories.",
        structure.file_count(),
        structure.dir_count()
    );
    if !top.is_empty() {
        text.push_str(" Its most central components are:\n");
        for record in top {
            text.push_str(&format!("\n- {}", component_title(record)));
        }
    }
    text
}

fn overview_prompt(project: &str, file_tree: &str, top: &[SummaryRecord]) -> String {
    let mut prompt = format!(
        "Write a short overview of the project {project}: what it does and how its main parts \
         fit together. Answer with plain prose only, without headings and without any relevance \
         score.\n\nProject structure:\n{file_tree}\n\nSummaries of its most important components:\n"
    );
    for record in top {
        prompt.push_str(&format!(
            "\n### {}\n{}\n",
            component_title(record),
            strip_relevance_markers(&record.summary)
        ));
    }
    prompt
}

/// Asks the service for an overview. `None` means the local fallback applies.
async fn request_overview(
    ctx: &ServiceContext,
    config: &RunConfig,
    project: &str,
    file_tree: &str,
    top: &[SummaryRecord],
) -> Option<String> {
    let request = CompletionRequest {
        model: config.model.clone(),
        system: Some(OVERVIEW_SYSTEM_PROMPT.to_string()),
        prompt: overview_prompt(project, file_tree, top),
        max_tokens: config.max_tokens,
    };
    match complete_with_retry(ctx.llm.as_ref(), &request, &config.retry).await {
        Ok(response) if response.text.trim().is_empty() => {
            warn!("overview response was empty; using local overview");
            None
        }
        Ok(response) if response.text.contains(SCORE_MARKER) => {
            warn!("overview response carried a score marker; using local overview");
            None
        }
        Ok(response) => Some(response.text.trim().to_string()),
        Err(e) => {
            warn!(error = %e, "overview request failed; using local overview");
            None
        }
    }
}

/// Ranks `records` and assembles the document.
///
/// The overview falls back to a local one whenever the service cannot
/// provide a usable answer; assembly itself never fails.
pub async fn build_document(
    ctx: &ServiceContext,
    config: &RunConfig,
    structure: &ProjectStructure,
    mut records: Vec<SummaryRecord>,
) -> Document {
    rank(&mut records);
    let title = file_name(&config.root);
    let file_tree = render_file_tree(structure, &config.root);
    let top = &records[..records.len().min(config.overview_top_n)];

    let requested = if config.overview && !top.is_empty() {
        request_overview(ctx, config, &title, &file_tree, top).await
    } else {
        debug!("building overview locally");
        None
    };
    let overview = requested.unwrap_or_else(|| local_overview(&title, structure, top));

    let sections: Vec<Section> = records
        .iter()
        .map(|record| Section {
            title: component_title(record),
            body: strip_relevance_markers(&record.summary),
        })
        .collect();
    info!(sections = sections.len(), "document assembled");

    Document { title, overview, file_tree, sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::summarize::tests::ScriptedLlm;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn record(name: &str, relevance: u32) -> SummaryRecord {
        SummaryRecord {
            name: name.into(),
            files: vec![PathBuf::from(format!("/p/{name}.h")), PathBuf::from(format!("/p/{name}.cpp"))],
            summary: format!("About {name}.\n[Relevance score: {relevance}]"),
            relevance: f64::from(relevance),
        }
    }

    fn structure() -> ProjectStructure {
        let mut structure = ProjectStructure::new();
        structure.insert_files(Path::new("/p"), ["/p/a.h", "/p/a.cpp"].map(PathBuf::from));
        structure
    }

    fn config(overview: bool) -> RunConfig {
        let mut config = RunConfig::new(Path::new("/p"), vec![]);
        config.overview = overview;
        config.retry.max_attempts = 1;
        config.retry.initial_backoff = Duration::from_millis(1);
        config
    }

    fn context(llm: &ScriptedLlm) -> ServiceContext {
        ServiceContext::with_ports(Box::new(LiveFileSystem), Box::new(llm.clone()))
    }

    #[test]
    fn titles_join_member_names() {
        assert_eq!(component_title(&record("foo", 1)), "foo.h / foo.cpp");
    }

    #[tokio::test]
    async fn sections_rank_by_score_with_stable_ties() {
        let llm = ScriptedLlm::default();
        let records = vec![record("a", 3), record("b", 9), record("c", 9), record("d", 1)];
        let doc = build_document(&context(&llm), &config(false), &structure(), records).await;

        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["b.h / b.cpp", "c.h / c.cpp", "a.h / a.cpp", "d.h / d.cpp"]);
        assert!(!doc.render().contains(SCORE_MARKER));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn rendered_parts_follow_fixed_order() {
        let llm = ScriptedLlm::default().answer("Write a short overview", "A renderer.");
        let doc =
            build_document(&context(&llm), &config(true), &structure(), vec![record("a", 4)]).await;
        let text = doc.render();

        let title = text.find("# p").unwrap();
        let overview = text.find("## Overview\n\nA renderer.").unwrap();
        let tree = text.find("## Project Structure").unwrap();
        let section = text.find("## a.h / a.cpp").unwrap();
        assert!(title < overview && overview < tree && tree < section);
        assert!(text.ends_with("About a.\n"));
    }

    #[tokio::test]
    async fn overview_with_marker_falls_back_to_local() {
        let llm = ScriptedLlm::default()
            .answer("Write a short overview", "Great project. [Relevance score: 10]");
        let doc =
            build_document(&context(&llm), &config(true), &structure(), vec![record("a", 4)]).await;
        assert!(doc.overview.starts_with("p consists of 2 source files in 1 directories."));
        assert!(!doc.render().contains(SCORE_MARKER));
    }

    #[tokio::test]
    async fn failed_or_empty_overview_falls_back_to_local() {
        let failing = ScriptedLlm::default().fail("Write a short overview", "503");
        let doc =
            build_document(&context(&failing), &config(true), &structure(), vec![record("a", 4)])
                .await;
        assert!(doc.overview.contains("- a.h / a.cpp"));

        let empty = ScriptedLlm::default().answer("Write a short overview", "  \n");
        let doc =
            build_document(&context(&empty), &config(true), &structure(), vec![record("a", 4)])
                .await;
        assert!(doc.overview.contains("- a.h / a.cpp"));
    }

    #[tokio::test]
    async fn overview_uses_only_top_components() {
        let llm = ScriptedLlm::default().answer("Write a short overview", "Overview.");
        let mut config = config(true);
        config.overview_top_n = 1;
        let records = vec![record("low", 2), record("high", 8)];
        build_document(&context(&llm), &config, &structure(), records).await;

        let prompt = llm.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("high.h / high.cpp"));
        assert!(!prompt.contains("low.h"));
        assert!(!prompt.contains(SCORE_MARKER));
    }
}
