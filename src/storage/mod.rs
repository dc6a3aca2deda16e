//! On-disk state of the publisher.
//!
//! ## Layout
//!
//! ```text
//! notepress_state.json         # note path -> MD5 of last conversion
//! {site}/content/post/
//! └── {title}/                 # one bundle per published note
//!     ├── index.md             # front matter + body
//!     └── photo.png            # copied embeds
//! ```

pub mod articles;
pub mod state;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::{AppError, Result};

// Re-export for convenience
pub use articles::{Article, ArticleStore};
pub use state::SyncState;

/// Read bytes, returning None if the file doesn't exist.
fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Write bytes atomically (write to temp, then rename).
fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.flush()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = written {
        // A stray temp file inside a bundle would be published with it.
        let _ = fs::remove_file(&tmp);
        return Err(AppError::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/test.txt");

        write_bytes(&path, b"hello").unwrap();
        assert_eq!(read_bytes(&path).unwrap(), Some(b"hello".to_vec()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory in the way makes the rename fail.
        let path = tmp.path().join("index.md");
        fs::create_dir_all(path.join("inner")).unwrap();

        assert!(write_bytes(&path, b"hello").is_err());
        assert!(!path.with_extension("tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        assert!(read_bytes(&tmp.path().join("nope.txt")).unwrap().is_none());
    }
}
