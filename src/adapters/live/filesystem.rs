//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

/// Sibling path used for write-then-rename.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp = temp_sibling(path);
        std::fs::write(&temp, contents)?;
        if let Err(e) = std::fs::rename(&temp, path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                entries.push(entry.path());
            }
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(entries)
    }

    fn walk_files(
        &self,
        path: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn modified(&self, path: &Path) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(modified.duration_since(UNIX_EPOCH)?.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replaces_atomically_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("cache.json");

        LiveFileSystem.write(&target, "first").unwrap();
        LiveFileSystem.write(&target, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        assert!(!temp_sibling(&target).exists());
    }

    #[test]
    fn list_dir_returns_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.cpp"), "").unwrap();
        std::fs::write(dir.path().join("a.h"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let files = LiveFileSystem.list_dir(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.h"), dir.path().join("b.cpp")]);
    }

    #[test]
    fn walk_files_descends_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("b/inner/z.h"), "").unwrap();
        std::fs::write(dir.path().join("a/y.h"), "").unwrap();
        std::fs::write(dir.path().join("top.h"), "").unwrap();

        let files = LiveFileSystem.walk_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("a/y.h"),
                dir.path().join("b/inner/z.h"),
                dir.path().join("top.h"),
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(LiveFileSystem.list_dir(&missing).is_err());
        assert!(LiveFileSystem.walk_files(&missing).is_err());
    }

    #[test]
    fn modified_reports_seconds_since_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.h");
        std::fs::write(&file, "").unwrap();
        filetime::set_file_mtime(&file, filetime::FileTime::from_unix_time(1_700_000_000, 0))
            .unwrap();

        let secs = LiveFileSystem.modified(&file).unwrap();
        assert!((secs - 1_700_000_000.0).abs() < f64::EPSILON);
    }
}
