// src/utils/fs.rs

//! Notes root enumeration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// File name to path lookup over the whole notes root.
///
/// Obsidian embeds refer to files by name only, so when two files share a
/// name the one visited last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    files: BTreeMap<String, PathBuf>,
}

impl FileIndex {
    pub fn get(&self, name: &str) -> Option<&PathBuf> {
        self.files.get(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Entries ordered by file name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl From<BTreeMap<String, PathBuf>> for FileIndex {
    fn from(files: BTreeMap<String, PathBuf>) -> Self {
        Self { files }
    }
}

/// Index every file below `root`, skipping directories named in `exclude_dirs`.
///
/// Symlinks are not followed.
pub fn index_files(root: &Path, exclude_dirs: &[String]) -> Result<FileIndex> {
    let mut files = BTreeMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, exclude_dirs));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.insert(name, entry.into_path());
    }

    log::debug!("Indexed {} files under {}", files.len(), root.display());
    Ok(FileIndex { files })
}

fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && exclude_dirs
            .iter()
            .any(|dir| entry.file_name().to_string_lossy() == dir.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_index_nested_files_by_name() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Top.md"));
        touch(&tmp.path().join("Projects/Rust/Ownership.md"));
        touch(&tmp.path().join("attachments/photo.png"));

        let index = index_files(tmp.path(), &[]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get("Ownership.md"),
            Some(&tmp.path().join("Projects/Rust/Ownership.md"))
        );
        assert!(index.get("photo.png").is_some());
    }

    #[test]
    fn test_excluded_dirs_are_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Keep.md"));
        touch(&tmp.path().join(".trash/Deleted.md"));
        touch(&tmp.path().join(".obsidian/workspace.json"));

        let exclude = vec![".trash".to_string(), ".obsidian".to_string()];
        let index = index_files(tmp.path(), &exclude).unwrap();

        let names: Vec<&str> = index.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Keep.md"]);
    }

    #[test]
    fn test_duplicate_names_last_visited_wins() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/image.png"));
        touch(&tmp.path().join("b/image.png"));

        let index = index_files(tmp.path(), &[]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("image.png"), Some(&tmp.path().join("b/image.png")));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(index_files(&tmp.path().join("nope"), &[]).is_err());
    }
}
