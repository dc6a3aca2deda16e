// src/error.rs

//! Unified error handling for the note publisher.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for notepress operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Copying a media file into an article bundle failed
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A previously written article does not carry the expected front matter
    #[error("Malformed front matter in {}: {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },

    /// Version control publishing failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a publish error.
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }

    /// Create a front matter error for the article at `path`.
    pub fn front_matter(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::FrontMatter {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a media copy error.
    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }
}

/// Render an error followed by each of its sources, one per line.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::copy("/notes/a.png", "/site/a.png", io);

        let chain = error_chain(&err);
        assert!(chain.starts_with("Failed to copy /notes/a.png to /site/a.png"));
        assert!(chain.ends_with("caused by: gone"));
    }

    #[test]
    fn test_front_matter_message() {
        let err = AppError::front_matter("/site/post/x/index.md", "date not found");
        assert_eq!(
            err.to_string(),
            "Malformed front matter in /site/post/x/index.md: date not found"
        );
    }
}
