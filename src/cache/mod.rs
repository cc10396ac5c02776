//! Summary cache: persisted summaries keyed by component file set.
//!
//! The cache file maps a *file key* (sorted member paths joined with `|`) to
//! the last summary, its relevance score and the member modification times
//! observed when it was generated:
//!
//! ```json
//! {
//!   "/p/src/foo.cpp|/p/src/foo.h": {
//!     "summary": "...",
//!     "relevance": 8.0,
//!     "last_modified_times": [1718000000.25, 1718000100.5]
//!   }
//! }
//! ```
//!
//! An entry is reused only while every member's mtime still matches. Entries
//! are never pruned; stale ones sit until overwritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BriefError, PortError};
use crate::ports::filesystem::FileSystem;

/// Default cache location, relative to the project root.
pub const DEFAULT_CACHE_PATH: &str = ".codebrief/summaries.json";

/// One cached summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Generated summary text, verbatim.
    pub summary: String,
    /// Relevance score extracted from the summary.
    pub relevance: f64,
    /// Member mtimes at generation time, in file-key order.
    pub last_modified_times: Vec<f64>,
}

/// Member paths in file-key order.
fn sorted_paths(paths: &[PathBuf]) -> Vec<&PathBuf> {
    let mut sorted: Vec<&PathBuf> = paths.iter().collect();
    sorted.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    sorted
}

/// Cache key for a set of files: sorted paths joined with `|`.
#[must_use]
pub fn file_key(paths: &[PathBuf]) -> String {
    sorted_paths(paths)
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("|")
}

/// Current mtimes of `paths`, in file-key order.
///
/// # Errors
///
/// Returns the first stat failure, e.g. a file removed since discovery.
pub fn current_mtimes(fs: &dyn FileSystem, paths: &[PathBuf]) -> Result<Vec<f64>, PortError> {
    sorted_paths(paths).into_iter().map(|p| fs.modified(p)).collect()
}

/// File-backed summary cache.
///
/// Single-writer: every [`store`](Self::store) rewrites the whole file.
pub struct SummaryCache<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl<'a> SummaryCache<'a> {
    /// Loads the cache at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty cache.
    #[must_use]
    pub fn load(fs: &'a dyn FileSystem, path: &Path) -> Self {
        let entries = if fs.exists(path) {
            match fs.read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "summary cache is corrupt; starting empty");
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "summary cache unreadable; starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(path = %path.display(), "no summary cache yet");
            BTreeMap::new()
        };
        Self { fs, path: path.to_path_buf(), entries }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry for `key`, without validity checks.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the entry for `key` if it is still valid for `current_paths`.
    ///
    /// Valid means the current mtime vector equals the stored one element by
    /// element. Any stat failure or mismatch is a miss.
    #[must_use]
    pub fn lookup(&self, key: &str, current_paths: &[PathBuf]) -> Option<&CacheEntry> {
        let entry = self.entries.get(key)?;
        match current_mtimes(self.fs, current_paths) {
            Ok(mtimes) if mtimes == entry.last_modified_times => Some(entry),
            Ok(_) => {
                debug!(key, "cached summary is stale");
                None
            }
            Err(e) => {
                debug!(key, error = %e, "cannot stat cached files");
                None
            }
        }
    }

    /// Overwrites the entry for `key` and persists the whole cache.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Persist`] if the cache file cannot be written.
    pub fn store(
        &mut self,
        key: &str,
        summary: &str,
        relevance: f64,
        mtimes: Vec<f64>,
    ) -> Result<(), BriefError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry { summary: summary.to_string(), relevance, last_modified_times: mtimes },
        );
        self.flush()
    }

    fn flush(&self) -> Result<(), BriefError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| BriefError::Persist { path: self.path.clone(), source: e.into() })?;
        self.fs
            .write(&self.path, &json)
            .map_err(|source| BriefError::Persist { path: self.path.clone(), source })
    }
}
