//! Enumerates candidate files under the project root and scan directories.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::BriefError;
use crate::ports::filesystem::FileSystem;
use crate::project::ProjectStructure;

/// Returns `true` if the file name of `path` ends with one of `suffixes`.
///
/// Matching is on the raw name, so `CMakeLists.txt` works as a suffix too.
fn matches_suffix(path: &Path, suffixes: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())))
}

/// Builds the [`ProjectStructure`] for one run.
///
/// `root` contributes only its direct children; each entry of
/// `recursive_dirs` contributes matching files at any depth, grouped by the
/// directory that contains them. Directories without matches are omitted.
///
/// # Errors
///
/// Returns [`BriefError::Walk`] if any configured directory cannot be read.
pub fn scan(
    fs: &dyn FileSystem,
    root: &Path,
    recursive_dirs: &[PathBuf],
    suffixes: &[String],
) -> Result<ProjectStructure, BriefError> {
    let mut structure = ProjectStructure::new();

    debug!(root = %root.display(), "scanning root directory");
    let root_files = fs
        .list_dir(root)
        .map_err(|source| BriefError::Walk { path: root.to_path_buf(), source })?;
    structure
        .insert_files(root, root_files.into_iter().filter(|f| matches_suffix(f, suffixes)));

    for dir in recursive_dirs {
        debug!(dir = %dir.display(), "scanning directory recursively");
        let files = fs
            .walk_files(dir)
            .map_err(|source| BriefError::Walk { path: dir.clone(), source })?;

        let mut grouped: IndexMap<PathBuf, Vec<PathBuf>> = IndexMap::new();
        for file in files.into_iter().filter(|f| matches_suffix(f, suffixes)) {
            let parent = file.parent().map_or_else(|| dir.clone(), Path::to_path_buf);
            grouped.entry(parent).or_default().push(file);
        }
        for (subdir, files) in grouped {
            structure.insert_files(&subdir, files);
        }
    }

    info!(
        directories = structure.dir_count(),
        files = structure.file_count(),
        "project scan complete"
    );
    Ok(structure)
}
