//! The generation pipeline: scan, summarize, assemble, write.

use tracing::info;

use crate::cache::SummaryCache;
use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::document::build_document;
use crate::error::BriefError;
use crate::project::walker::scan;
use crate::summarize::{summarize_project, RunReport, Summarizer};

/// Generates the document for `config.root` and writes it to `config.output_path`.
///
/// # Errors
///
/// - [`BriefError::Walk`] if a configured directory cannot be enumerated.
/// - [`BriefError::Persist`] if the cache or the document cannot be written.
pub async fn run(ctx: &ServiceContext, config: &RunConfig) -> Result<RunReport, BriefError> {
    let structure =
        scan(ctx.fs.as_ref(), &config.root, &config.recursive_dirs, &config.rules.scan_suffixes())?;

    let cache = SummaryCache::load(ctx.fs.as_ref(), &config.cache_path);
    info!(path = %cache.path().display(), entries = cache.len(), "summary cache loaded");

    let mut summarizer = Summarizer::new(ctx, config, cache, structure.listing());
    let (records, report) = summarize_project(&mut summarizer, &structure).await?;

    let document = build_document(ctx, config, &structure, records).await;
    ctx.fs
        .write(&config.output_path, &document.render())
        .map_err(|source| BriefError::Persist { path: config.output_path.clone(), source })?;
    info!(path = %config.output_path.display(), "document written");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::cache::tests::MemFs;
    use crate::cache::DEFAULT_CACHE_PATH;
    use crate::summarize::tests::ScriptedLlm;
    use std::path::{Path, PathBuf};

    fn project() -> MemFs {
        MemFs::with_files(&[
            ("/p/CMakeLists.txt", "project(demo)", 1.0),
            ("/p/src/foo.h", "struct Foo;", 2.0),
            ("/p/src/foo.cpp", "Foo::Foo() {}", 3.0),
            ("/p/src/blur_vertex.glsl", "void main() {}", 4.0),
            ("/p/src/blur_fragment.glsl", "void main() {}", 5.0),
        ])
    }

    fn config() -> RunConfig {
        let mut config = RunConfig::new(Path::new("/p"), vec![PathBuf::from("/p/src")]);
        config.overview = false;
        config
    }

    fn llm() -> ScriptedLlm {
        ScriptedLlm::default()
            .answer("named foo.h, foo.cpp", "Foo.\n[Relevance score: 9]")
            .answer("named blur_fragment.glsl, blur_vertex.glsl", "Blur.\n[Relevance score: 6]")
            .answer("named CMakeLists.txt", "Build.\n[Relevance score: 3]")
    }

    #[tokio::test]
    async fn writes_ranked_document() {
        let llm = llm();
        let ctx = ServiceContext::with_ports(Box::new(project()), Box::new(llm.clone()));
        let config = config();

        let report = run(&ctx, &config).await.unwrap();
        assert_eq!(report.generated, 3);
        assert!(report.skipped.is_empty());

        let readme = ctx.fs.read_to_string(Path::new("/p/README.md")).unwrap();
        let foo = readme.find("## foo.h / foo.cpp").unwrap();
        let blur = readme.find("## blur_fragment.glsl / blur_vertex.glsl").unwrap();
        let build = readme.find("## CMakeLists.txt").unwrap();
        assert!(foo < blur && blur < build);
        assert!(!readme.contains("Relevance score:"));
        assert!(ctx.fs.exists(&Path::new("/p").join(DEFAULT_CACHE_PATH)));
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() {
        let llm = llm();
        let ctx = ServiceContext::with_ports(Box::new(project()), Box::new(llm.clone()));
        let config = config();

        run(&ctx, &config).await.unwrap();
        let calls = llm.call_count();
        let report = run(&ctx, &config).await.unwrap();

        assert_eq!(report.cached, 3);
        assert_eq!(report.generated, 0);
        assert_eq!(llm.call_count(), calls);
    }

    #[tokio::test]
    async fn missing_scan_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ServiceContext::with_ports(Box::new(LiveFileSystem), Box::new(llm()));
        let config = RunConfig::new(dir.path(), vec![dir.path().join("missing")]);

        let err = run(&ctx, &config).await.unwrap_err();
        assert!(matches!(err, BriefError::Walk { .. }));
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn unwritable_output_is_a_persist_error() {
        let fs = MemFs { fail_writes: true, ..project() };
        let ctx = ServiceContext::with_ports(Box::new(fs), Box::new(llm()));
        let err = run(&ctx, &config()).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
