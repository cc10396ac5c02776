//! Project discovery: which files exist and how they group into components.

pub mod pairing;
pub mod walker;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Files found per directory, in scan order.
///
/// Both the directory order and the per-directory file order are part of the
/// value: two structures are equal only if they list the same directories
/// and files in the same order.
#[derive(Debug, Clone, Default)]
pub struct ProjectStructure {
    dirs: IndexMap<PathBuf, Vec<PathBuf>>,
}

impl PartialEq for ProjectStructure {
    fn eq(&self, other: &Self) -> bool {
        self.dirs.len() == other.dirs.len() && self.iter().eq(other.iter())
    }
}

impl Eq for ProjectStructure {}

impl ProjectStructure {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `files` under `dir`, skipping files already listed there.
    ///
    /// A directory seen for the first time is placed after all existing ones.
    /// Empty input never creates a directory entry.
    pub fn insert_files(&mut self, dir: &Path, files: impl IntoIterator<Item = PathBuf>) {
        let mut files = files.into_iter().peekable();
        if files.peek().is_none() {
            return;
        }
        let listed = self.dirs.entry(dir.to_path_buf()).or_default();
        for file in files {
            if !listed.contains(&file) {
                listed.push(file);
            }
        }
    }

    /// Iterates over `(directory, files)` in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[PathBuf])> {
        self.dirs.iter().map(|(dir, files)| (dir.as_path(), files.as_slice()))
    }

    /// Files recorded for `dir`, if any.
    #[cfg(test)]
    pub(crate) fn files_in(&self, dir: &Path) -> Option<&[PathBuf]> {
        self.dirs.get(dir).map(Vec::as_slice)
    }

    /// Number of directories with at least one file.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Total number of files across all directories.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    /// Returns `true` when no files were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Plain listing used as project context in prompts:
    ///
    /// ```text
    /// /abs/dir:
    ///   /abs/dir/a.h
    ///   /abs/dir/a.cpp
    /// ```
    #[must_use]
    pub fn listing(&self) -> String {
        self.iter()
            .map(|(dir, files)| {
                let entries: Vec<String> =
                    files.iter().map(|f| format!("  {}", f.display())).collect();
                format!("{}:\n{}", dir.display(), entries.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// File name of `path` as a string, falling back to the whole path.
#[must_use]
pub fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn insert_keeps_first_position_and_dedups() {
        let mut structure = ProjectStructure::new();
        structure.insert_files(Path::new("/r"), vec![p("/r/a.h")]);
        structure.insert_files(Path::new("/r/src"), vec![p("/r/src/b.h")]);
        structure.insert_files(Path::new("/r"), vec![p("/r/a.h"), p("/r/c.h")]);

        let dirs: Vec<&Path> = structure.iter().map(|(d, _)| d).collect();
        assert_eq!(dirs, vec![Path::new("/r"), Path::new("/r/src")]);
        assert_eq!(structure.files_in(Path::new("/r")).unwrap(), &[p("/r/a.h"), p("/r/c.h")]);
        assert_eq!(structure.file_count(), 3);
    }

    #[test]
    fn empty_insert_creates_no_directory() {
        let mut structure = ProjectStructure::new();
        structure.insert_files(Path::new("/r"), Vec::new());
        assert!(structure.is_empty());
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut a = ProjectStructure::new();
        a.insert_files(Path::new("/x"), vec![p("/x/1.h")]);
        a.insert_files(Path::new("/y"), vec![p("/y/2.h")]);
        let mut b = ProjectStructure::new();
        b.insert_files(Path::new("/y"), vec![p("/y/2.h")]);
        b.insert_files(Path::new("/x"), vec![p("/x/1.h")]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn listing_indents_files_under_directories() {
        let mut structure = ProjectStructure::new();
        structure.insert_files(Path::new("/r"), vec![p("/r/a.h"), p("/r/a.cpp")]);
        assert_eq!(structure.listing(), "/r:\n  /r/a.h\n  /r/a.cpp");
    }
}
