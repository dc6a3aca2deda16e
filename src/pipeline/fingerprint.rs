//! Content-based change detection.
//!
//! A note is reprocessed only when the MD5 of its bytes differs from the one
//! recorded after its last successful conversion. Modification times are
//! never consulted.

use std::fmt;

use crate::models::Note;
use crate::storage::SyncState;

/// MD5 of a note's raw bytes, as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of comparing a note against the sync state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Same bytes as the last successful conversion
    Unchanged,
    /// New or edited note, with its current fingerprint
    Changed(Fingerprint),
}

/// Compare a note's current fingerprint with the recorded one.
pub fn changed(note: &Note, state: &SyncState) -> Change {
    let fingerprint = Fingerprint::of(&note.bytes);
    if state.get(&note.key()) == Some(fingerprint.as_str()) {
        Change::Unchanged
    } else {
        Change::Changed(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(bytes: &[u8]) -> Note {
        Note::from_bytes("/vault/Post.md", bytes.to_vec())
    }

    #[test]
    fn test_fingerprint_is_md5_hex() {
        assert_eq!(
            Fingerprint::of(b"").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(Fingerprint::of(b"hello world").as_str().len(), 32);
    }

    #[test]
    fn test_unknown_note_is_changed() {
        let state = SyncState::default();
        let change = changed(&note(b"#blog\n"), &state);
        assert_eq!(change, Change::Changed(Fingerprint::of(b"#blog\n")));
    }

    #[test]
    fn test_recorded_fingerprint_is_unchanged() {
        let mut state = SyncState::default();
        state.record("/vault/Post.md", Fingerprint::of(b"#blog\n"));

        assert_eq!(changed(&note(b"#blog\n"), &state), Change::Unchanged);
    }

    #[test]
    fn test_single_byte_edit_is_changed() {
        let mut state = SyncState::default();
        state.record("/vault/Post.md", Fingerprint::of(b"#blog\nA"));

        assert!(matches!(changed(&note(b"#blog\nB"), &state), Change::Changed(_)));
    }

    #[test]
    fn test_reverted_content_is_unchanged() {
        let mut state = SyncState::default();
        state.record("/vault/Post.md", Fingerprint::of(b"v1"));

        assert!(matches!(changed(&note(b"v2"), &state), Change::Changed(_)));
        assert_eq!(changed(&note(b"v1"), &state), Change::Unchanged);
    }
}
