//! Plain-text file tree rendered from the scanned structure.

use std::path::Path;

use crate::project::{file_name, ProjectStructure};

/// Directory label relative to `root`; `./` for the root itself.
fn dir_label(dir: &Path, root: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => "./".to_string(),
        Ok(rel) => format!("{}/", rel.display()),
        Err(_) => format!("{}/", dir.display()),
    }
}

/// Renders one block per directory, in scan order:
///
/// ```text
/// ./
/// ├── CMakeLists.txt
/// └── main.cpp
/// src/render/
/// └── shader.cpp
/// ```
#[must_use]
pub fn render_file_tree(structure: &ProjectStructure, root: &Path) -> String {
    let mut lines = Vec::new();
    for (dir, files) in structure.iter() {
        lines.push(dir_label(dir, root));
        for (i, file) in files.iter().enumerate() {
            let branch = if i + 1 == files.len() { "└──" } else { "├──" };
            lines.push(format!("{branch} {}", file_name(file)));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn directories_are_relative_and_branches_close() {
        let mut structure = ProjectStructure::new();
        structure.insert_files(
            Path::new("/p"),
            ["/p/CMakeLists.txt", "/p/main.cpp"].map(PathBuf::from),
        );
        structure.insert_files(Path::new("/p/src/render"), [PathBuf::from("/p/src/render/a.h")]);

        let tree = render_file_tree(&structure, Path::new("/p"));
        assert_eq!(
            tree,
            "./\n├── CMakeLists.txt\n└── main.cpp\nsrc/render/\n└── a.h"
        );
    }

    #[test]
    fn directory_outside_root_keeps_full_path() {
        let mut structure = ProjectStructure::new();
        structure.insert_files(Path::new("/elsewhere"), [PathBuf::from("/elsewhere/x.h")]);
        assert!(render_file_tree(&structure, Path::new("/p")).starts_with("/elsewhere/\n"));
    }
}
