// src/pipeline/sync.rs

//! One publishing cycle over the notes root.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};

use super::fingerprint::{self, Change};
use crate::error::{AppError, Result};
use crate::models::{Config, Note, SyncConfig};
use crate::services::{Document, FrontMatter, Transformer, tags};
use crate::storage::{Article, ArticleStore, SyncState};
use crate::utils::fs::{FileIndex, index_files};
use crate::utils::git::Publisher;

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Notes found under the notes root
    pub scanned: usize,
    /// Notes without the sentinel tag
    pub ineligible: usize,
    /// Eligible notes whose bytes did not change
    pub unchanged: usize,
    /// Notes converted in this cycle
    pub converted: Vec<PathBuf>,
    /// Media files copied into article bundles
    pub media: usize,
}

impl CycleReport {
    /// Whether any article was written.
    pub fn has_changes(&self) -> bool {
        !self.converted.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.converted.len()
    }
}

/// Converts eligible, changed notes into article bundles.
#[derive(Debug, Clone)]
pub struct Syncer {
    notes_root: PathBuf,
    sync: SyncConfig,
    store: ArticleStore,
    transformer: Transformer,
    offset: FixedOffset,
}

impl Syncer {
    /// Build a syncer from configuration and the two roots.
    pub fn new(config: &Config, notes_root: impl Into<PathBuf>, site_root: &Path) -> Result<Self> {
        let offset = config.article.utc_offset().ok_or_else(|| {
            AppError::config(format!(
                "invalid article.utc_offset_minutes: {}",
                config.article.utc_offset_minutes
            ))
        })?;

        Ok(Self {
            notes_root: notes_root.into(),
            sync: config.sync.clone(),
            store: ArticleStore::new(
                site_root.join(&config.sync.content_dir),
                config.sync.index_file.clone(),
            ),
            transformer: Transformer::new(
                config.sync.sentinel_tag.clone(),
                config.article.image_width.clone(),
            ),
            offset,
        })
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    /// Run a cycle stamped with the current time.
    pub fn run_cycle(&self, state: &mut SyncState) -> Result<CycleReport> {
        self.run_cycle_at(state, Utc::now().with_timezone(&self.offset))
    }

    /// Run a cycle, using `now` as the date of newly published articles.
    ///
    /// The first error aborts the remaining notes; `state` then holds every
    /// conversion that completed before it.
    pub fn run_cycle_at(
        &self,
        state: &mut SyncState,
        now: DateTime<FixedOffset>,
    ) -> Result<CycleReport> {
        let files = index_files(&self.notes_root, &self.sync.exclude_dirs)?;
        let mut report = CycleReport::default();

        for (name, path) in files.iter() {
            if !self.sync.is_note(name) {
                continue;
            }
            report.scanned += 1;

            let note = Note::load(path)?;
            let doc = Document::parse(&note.text);

            if !tags::is_eligible(&doc, &self.sync.sentinel_tag) {
                report.ineligible += 1;
                continue;
            }

            let fingerprint = match fingerprint::changed(&note, state) {
                Change::Unchanged => {
                    log::debug!("Unchanged: {}", note.path.display());
                    report.unchanged += 1;
                    continue;
                }
                Change::Changed(fingerprint) => fingerprint,
            };

            let (article, media) = self.convert(&note, &doc, &files, now)?;
            log::info!(
                "Converted {} -> {} ({} media, md5 {})",
                note.path.display(),
                article.index.display(),
                media.len(),
                fingerprint
            );
            report.media += media.len();

            state.record(note.key(), fingerprint);
            report.converted.push(note.path);
        }

        Ok(report)
    }

    fn convert(
        &self,
        note: &Note,
        doc: &Document,
        files: &FileIndex,
        now: DateTime<FixedOffset>,
    ) -> Result<(Article, Vec<PathBuf>)> {
        let article = self.store.article(&note.title());
        if article.exists() {
            log::debug!("Updating article {}", article.dir.display());
        } else {
            log::debug!("New article {}", article.dir.display());
        }
        self.store.ensure_dir(&article)?;

        let transformed = self.transformer.transform(doc, files, &article.dir)?;
        let front_matter =
            FrontMatter::compose(&note.title(), transformed.tags, &article.index, now)?;

        self.store
            .write_index(&article, &front_matter.render(&transformed.body))?;
        Ok((article, transformed.media))
    }
}

/// Load the state, run one cycle and, if anything changed, publish the site
/// and save the state.
///
/// A failing publish leaves the state file untouched, so the same notes are
/// converted and published again on the next cycle.
pub fn run_once(
    syncer: &Syncer,
    state_path: &Path,
    publisher: &dyn Publisher,
) -> Result<CycleReport> {
    let mut state = SyncState::load(state_path)?;
    let report = syncer.run_cycle(&mut state)?;

    if report.has_changes() {
        publisher.publish()?;
        state.save(state_path)?;
    }

    Ok(report)
}
