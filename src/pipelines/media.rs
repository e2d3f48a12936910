//! Media rehome: per-card image files into the content-addressed store.
//!
//! Walks every card in the catalog, moves its legacy image from the
//! per-card directory into the store and points `cards.cimage` at the
//! digest. Each card commits on its own, so an interrupted run resumes
//! where it stopped: already-rehomed cards simply have no legacy file
//! left and are skipped.

use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::content_store::ContentStore;
use crate::core::error;
use crate::core::report;
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
pub struct MediaFailure {
    pub card_id: String,
    /// Digest of the card's image, when hashing got that far. A failure
    /// after ingest leaves the bytes stored under this digest, so the
    /// record can be repaired by hand.
    pub digest: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MediaReport {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: Vec<MediaFailure>,
}

pub struct MediaMigrator<'a> {
    catalog: &'a Catalog,
    store: &'a ContentStore,
    config: &'a Config,
}

impl<'a> MediaMigrator<'a> {
    pub fn new(catalog: &'a Catalog, store: &'a ContentStore, config: &'a Config) -> Self {
        Self {
            catalog,
            store,
            config,
        }
    }

    /// Rehome every card's image.
    ///
    /// Per-card failures are recorded in the report and the walk
    /// continues; only an unreadable catalog or an uncreatable store
    /// stops the run.
    pub fn run(&self) -> Result<MediaReport, error::CardshiftError> {
        self.store.init()?;

        let mut report = MediaReport::default();
        for card_id in self.catalog.list_card_ids()? {
            let legacy = self.config.legacy_card_image(&card_id);
            if !legacy.is_file() {
                // Never uploaded, or already rehomed by an earlier run.
                report.skipped += 1;
                continue;
            }

            let bytes = match fs::read(&legacy) {
                Ok(bytes) => bytes,
                Err(e) => {
                    report.failed.push(MediaFailure {
                        card_id,
                        digest: None,
                        reason: format!("cannot read {}: {}", legacy.display(), e),
                    });
                    continue;
                }
            };
            let digest = ContentStore::digest_of(&bytes);

            if let Err(e) = self.store.ingest(&legacy, &digest) {
                report.failed.push(MediaFailure {
                    card_id,
                    digest: Some(digest),
                    reason: e.to_string(),
                });
                continue;
            }
            if let Err(e) = self.catalog.update_card_image(&card_id, &digest) {
                // Bytes are stored; only the catalog reference is stale.
                report.failed.push(MediaFailure {
                    card_id,
                    digest: Some(digest),
                    reason: e.to_string(),
                });
                continue;
            }
            report.migrated += 1;
        }
        Ok(report)
    }
}

pub fn print_report(report: &MediaReport) {
    use colored::Colorize;

    println!();
    println!("  {}", "Media rehome".bold());
    println!(
        "    {} {} migrated, {} skipped",
        "✓".bright_green(),
        report.migrated,
        report.skipped
    );
    if !report.failed.is_empty() {
        let reasons: Vec<String> = report
            .failed
            .iter()
            .map(|f| format!("card {}: {}", f.card_id, f.reason))
            .collect();
        println!(
            "    {} {} failed: {}",
            "⚠".bright_yellow(),
            report.failed.len(),
            report::sample(&reasons, 2, 110)
        );
    }
}
