//! Note data structure.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A source note read from the notes root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Location of the note on disk
    pub path: PathBuf,

    /// Raw file contents, used for fingerprinting
    pub bytes: Vec<u8>,

    /// File contents decoded as UTF-8 (invalid sequences replaced)
    pub text: String,
}

impl Note {
    /// Read a note from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }

    /// Build a note from bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Self {
            path: path.into(),
            bytes,
            text,
        }
    }

    /// Article title: the file name without its extension.
    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Key under which this note is tracked in the sync state.
    pub fn key(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
