// src/models/mod.rs

//! Domain models for the note publisher.

mod config;
mod note;

// Re-export all public types
pub use config::{ArticleConfig, Config, NotifyConfig, PublishConfig, SyncConfig};
pub use note::Note;
