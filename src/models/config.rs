//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Note selection and output layout
    #[serde(default)]
    pub sync: SyncConfig,

    /// Article rendering settings
    #[serde(default)]
    pub article: ArticleConfig,

    /// Failure notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Version control publishing settings
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let ext = self.sync.note_extension.trim();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(AppError::validation(
                "sync.note_extension must be non-empty and given without a leading dot",
            ));
        }
        if self.sync.sentinel_tag.trim().is_empty() {
            return Err(AppError::validation("sync.sentinel_tag is empty"));
        }
        if self.sync.sentinel_tag.chars().any(char::is_whitespace) {
            return Err(AppError::validation(
                "sync.sentinel_tag must not contain whitespace",
            ));
        }
        if self.sync.index_file.trim().is_empty() {
            return Err(AppError::validation("sync.index_file is empty"));
        }
        if self.sync.state_file.trim().is_empty() {
            return Err(AppError::validation("sync.state_file is empty"));
        }
        if self.article.utc_offset().is_none() {
            return Err(AppError::validation(
                "article.utc_offset_minutes must be within +/-24h",
            ));
        }
        if self.notify.timeout_secs == 0 {
            return Err(AppError::validation("notify.timeout_secs must be > 0"));
        }
        if self.publish.commit_message.trim().is_empty() {
            return Err(AppError::validation("publish.commit_message is empty"));
        }
        Ok(())
    }
}

/// Note selection and output layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Extension (without dot) of files treated as notes
    #[serde(default = "defaults::note_extension")]
    pub note_extension: String,

    /// Tag whose presence marks a note for publication
    #[serde(default = "defaults::sentinel_tag")]
    pub sentinel_tag: String,

    /// Article directory, relative to the site root
    #[serde(default = "defaults::content_dir")]
    pub content_dir: String,

    /// File name of the generated article inside its bundle
    #[serde(default = "defaults::index_file")]
    pub index_file: String,

    /// Path of the persisted fingerprint table
    #[serde(default = "defaults::state_file")]
    pub state_file: String,

    /// Directory names skipped while walking the notes root
    #[serde(default = "defaults::exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl SyncConfig {
    /// Whether `file_name` carries the note extension.
    pub fn is_note(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == self.note_extension)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            note_extension: defaults::note_extension(),
            sentinel_tag: defaults::sentinel_tag(),
            content_dir: defaults::content_dir(),
            index_file: defaults::index_file(),
            state_file: defaults::state_file(),
            exclude_dirs: defaults::exclude_dirs(),
        }
    }
}

/// Article rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleConfig {
    /// Offset from UTC, in minutes, used for the `date` field
    #[serde(default = "defaults::utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Display width of embedded images
    #[serde(default = "defaults::image_width")]
    pub image_width: String,
}

impl ArticleConfig {
    /// The configured offset, if it is a valid one.
    pub fn utc_offset(&self) -> Option<chrono::FixedOffset> {
        chrono::FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: defaults::utc_offset_minutes(),
            image_width: defaults::image_width(),
        }
    }
}

/// Failure notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// User-Agent header for notification requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Version control publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Run the git sequence after a cycle that produced changes
    #[serde(default = "defaults::publish_enabled")]
    pub enabled: bool,

    /// Commit message for generated commits
    #[serde(default = "defaults::commit_message")]
    pub commit_message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::publish_enabled(),
            commit_message: defaults::commit_message(),
        }
    }
}

mod defaults {
    // Sync defaults
    pub fn note_extension() -> String {
        "md".into()
    }
    pub fn sentinel_tag() -> String {
        "blog".into()
    }
    pub fn content_dir() -> String {
        "content/post".into()
    }
    pub fn index_file() -> String {
        "index.md".into()
    }
    pub fn state_file() -> String {
        "notepress_state.json".into()
    }
    pub fn exclude_dirs() -> Vec<String> {
        vec![".obsidian".into(), ".trash".into(), ".git".into()]
    }

    // Article defaults
    pub fn utc_offset_minutes() -> i32 {
        8 * 60
    }
    pub fn image_width() -> String {
        "50%".into()
    }

    // Notify defaults
    pub fn user_agent() -> String {
        concat!("notepress/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Publish defaults
    pub fn publish_enabled() -> bool {
        true
    }
    pub fn commit_message() -> String {
        "update".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_dotted_extension() {
        let mut config = Config::default();
        config.sync.note_extension = ".md".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_sentinel_with_whitespace() {
        let mut config = Config::default();
        config.sync.sentinel_tag = "my blog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_offset() {
        let mut config = Config::default();
        config.article.utc_offset_minutes = 25 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [sync]
            sentinel_tag = "publish"

            [publish]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.sentinel_tag, "publish");
        assert_eq!(config.sync.note_extension, "md");
        assert_eq!(config.sync.content_dir, "content/post");
        assert_eq!(config.article.utc_offset_minutes, 480);
        assert!(!config.publish.enabled);
        assert_eq!(config.publish.commit_message, "update");
    }

    #[test]
    fn is_note_matches_extension_only() {
        let sync = SyncConfig::default();
        assert!(sync.is_note("Rust Ownership.md"));
        assert!(!sync.is_note("photo.png"));
        assert!(!sync.is_note("notes.md.bak"));
        assert!(!sync.is_note(".md"));
    }
}
