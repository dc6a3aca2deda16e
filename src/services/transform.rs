// src/services/transform.rs

//! Structural rewriting of a note into an article body.

use std::fs;
use std::path::{Path, PathBuf};

use super::document::{Block, Document};
use super::tags::tags_of;
use crate::error::{AppError, Result};
use crate::utils::fs::FileIndex;

/// Result of transforming a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Tags of every tag line, sentinel removed, in source order
    pub tags: Vec<String>,
    /// Markdown body without tag lines
    pub body: String,
    /// Media files copied into the article directory
    pub media: Vec<PathBuf>,
}

/// Rewrites notes for publication.
#[derive(Debug, Clone)]
pub struct Transformer {
    sentinel: String,
    image_width: String,
}

impl Transformer {
    pub fn new(sentinel: impl Into<String>, image_width: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            image_width: image_width.into(),
        }
    }

    /// Strip tag lines, copy resolvable embeds into `article_dir` and
    /// serialize the result.
    ///
    /// `[[internal links]]` and embeds missing from `files` are left as they
    /// are.
    pub fn transform(
        &self,
        doc: &Document,
        files: &FileIndex,
        article_dir: &Path,
    ) -> Result<Transformed> {
        let mut tags = Vec::new();
        let mut media = Vec::new();
        let mut kept: Vec<Block> = Vec::with_capacity(doc.blocks().len());

        for block in doc.blocks() {
            if let Some(declared) = tags_of(block) {
                tags.extend(declared.into_iter().filter(|t| *t != self.sentinel));
                // The line is dropped, but media it embeds still ships with the article.
                let embeds = block.inlines().iter().filter_map(|n| embed_target(n.content()));
                for name in embeds {
                    media.extend(self.copy_embed(name, files, article_dir)?);
                }
                continue;
            }

            let mut block = block.clone();
            for node in block.inlines_mut() {
                let Some(name) = embed_target(node.content()) else {
                    continue;
                };
                let Some(target) = self.copy_embed(name, files, article_dir)? else {
                    continue;
                };

                let html = self.image_tag(name);
                node.rewrite(html);
                media.push(target);
            }
            kept.push(block);
        }

        Ok(Transformed {
            tags,
            body: doc.with_blocks(kept).to_markdown(),
            media,
        })
    }

    /// Copy the file behind an embed into the article directory.
    ///
    /// Returns `None` when the vault has no file of that name.
    fn copy_embed(
        &self,
        name: &str,
        files: &FileIndex,
        article_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(source) = files.get(name) else {
            log::debug!("Embed {name} not found in notes, leaving it as is");
            return Ok(None);
        };

        let target = article_dir.join(name);
        fs::copy(source, &target).map_err(|e| AppError::copy(source, &target, e))?;
        log::debug!("Copied {} -> {}", source.display(), target.display());
        Ok(Some(target))
    }

    fn image_tag(&self, file_name: &str) -> String {
        format!(
            r#"<center><img src="./{}" width="{}" /></center>"#,
            file_name, self.image_width
        )
    }
}

/// File name referenced by an `![[embed]]`, without any `|` display override.
pub fn embed_target(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("![[")?.strip_suffix("]]")?;
    let name = inner.split('|').next().unwrap_or(inner).trim();
    (!name.is_empty()).then_some(name)
}
