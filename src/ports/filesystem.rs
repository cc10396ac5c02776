//! Filesystem port for file I/O operations.

use std::path::{Path, PathBuf};

/// Provides filesystem access for scanning, reading and writing files.
///
/// Abstracting the filesystem lets the walker, cache and orchestrator run
/// against an in-memory tree in tests.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Reads the raw bytes of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces the file at `path` with `contents`, creating parent directories.
    ///
    /// Implementations must write atomically: a crash mid-write leaves either
    /// the old file or the new one, never a truncated mix.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the regular files directly inside `path`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists every regular file below `path` at any depth.
    ///
    /// Entries are visited depth-first with siblings in file-name order, so
    /// the result is stable for an unchanged tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` or any directory below it cannot be read.
    fn walk_files(
        &self,
        path: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the modification time of `path` in seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed.
    fn modified(&self, path: &Path) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}
