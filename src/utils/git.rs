// src/utils/git.rs

//! Publishing the generated site through git.

use std::path::PathBuf;
use std::process::{Command, Output};

use crate::error::{AppError, Result};

/// Pushes the article tree somewhere readers can see it.
pub trait Publisher {
    fn publish(&self) -> Result<()>;
}

/// Runs `git pull`, `git add .`, `git commit`, `git push` in the site root.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    site_root: PathBuf,
    commit_message: String,
}

impl GitPublisher {
    pub fn new(site_root: impl Into<PathBuf>, commit_message: impl Into<String>) -> Self {
        Self {
            site_root: site_root.into(),
            commit_message: commit_message.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {} (in {})", args.join(" "), self.site_root.display());
        Command::new("git")
            .args(args)
            .current_dir(&self.site_root)
            .output()
            .map_err(|e| AppError::publish(format!("failed to run git {}: {}", args[0], e)))
    }

    fn git_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Err(AppError::publish(format!(
                "git {} failed: {}",
                args[0],
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self) -> Result<()> {
        self.git_checked(&["pull"])?;
        self.git_checked(&["add", "."])?;

        // A reconversion can leave the tree byte-identical; nothing to commit is fine.
        let output = self.git(&["commit", "-m", &self.commit_message])?;
        if !output.status.success() {
            log::warn!(
                "git commit exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }

        self.git_checked(&["push"])?;
        log::info!("Published {}", self.site_root.display());
        Ok(())
    }
}

/// Publisher used when publishing is disabled in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn publish(&self) -> Result<()> {
        log::info!("Publishing disabled, leaving the site as is");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_noop_publisher_succeeds() {
        assert!(NoopPublisher.publish().is_ok());
    }

    #[test]
    fn test_publish_outside_repository_fails() {
        let tmp = TempDir::new().unwrap();
        let publisher = GitPublisher::new(tmp.path(), "update");

        let err = publisher.publish().unwrap_err();
        assert!(matches!(err, AppError::Publish(_)));
    }
}
