//! Persisted fingerprint table.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_bytes, write_bytes};
use crate::error::Result;
use crate::pipeline::fingerprint::Fingerprint;

/// Note path to fingerprint of its last successful conversion.
///
/// Loaded fresh at the start of every cycle and saved at its end when at
/// least one note was converted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState {
    entries: HashMap<String, String>,
}

impl SyncState {
    /// Create the state file holding an empty table if it does not exist.
    pub fn bootstrap(path: &Path) -> Result<()> {
        if !path.exists() {
            log::info!("Creating empty sync state at {}", path.display());
            Self::default().save(path)?;
        }
        Ok(())
    }

    /// Load the state file.
    pub fn load(path: &Path) -> Result<Self> {
        match read_bytes(path)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::warn!("No sync state found at {}", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Write the state file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        write_bytes(path, &bytes)
    }

    /// Fingerprint recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Record a successful conversion.
    pub fn record(&mut self, key: impl Into<String>, fingerprint: Fingerprint) {
        self.entries.insert(key.into(), fingerprint.into_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked note paths, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
