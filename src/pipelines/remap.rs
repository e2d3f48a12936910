//! Legacy remap: flat-table dumps onto the opaque-id schema.
//!
//! Two strict passes. Pass 1 reads the card-type dump and allocates one
//! new id per distinct legacy card-type id; pass 2 reads the card dump
//! and resolves each card's type reference through that mapping. A
//! reference to a card-type that never appeared in pass 1 aborts the run.
//!
//! Nothing is written until both passes have resolved completely: asset
//! copies happen first, then both INSERT blocks are staged to temp files
//! and renamed into place together. An aborted run leaves no final SQL
//! output behind.

use crate::core::config::{self, RemapConfig};
use crate::core::error;
use crate::core::ident::IdAllocator;
use crate::core::report;
use crate::pipelines::dump::{self, RowPolicy, SkippedRow};
use crate::pipelines::emit;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CARD_TYPES_SQL: &str = "new_cardtypes.sql";
pub const CARDS_SQL: &str = "new_cards.sql";

const CARDTYPE_NAMESPACE: &str = "cardtype";
const CARD_NAMESPACE: &str = "card";

/// Row state written on every remapped row: 1 is `Created` in the
/// catalog's card lifecycle.
const STATE_CREATED: u8 = 1;

#[derive(Debug, Serialize)]
pub struct RemapReport {
    pub card_types: usize,
    pub cards: usize,
    pub skipped_card_types: Vec<SkippedRow>,
    pub skipped_cards: Vec<SkippedRow>,
    /// Cards whose legacy image file was absent. The row is still
    /// emitted; only the asset copy is missing.
    pub missing_images: Vec<String>,
    pub card_types_sql: PathBuf,
    pub cards_sql: PathBuf,
}

struct ResolvedCardType {
    id: String,
    name: String,
}

struct ResolvedCard {
    legacy_id: String,
    id: String,
    name: String,
    card_type_id: String,
    image: String,
}

pub struct Remapper<'a> {
    remap: &'a RemapConfig,
    allocator: IdAllocator,
    policy: RowPolicy,
}

impl<'a> Remapper<'a> {
    pub fn new(remap: &'a RemapConfig, allocator: IdAllocator, policy: RowPolicy) -> Self {
        Self {
            remap,
            allocator,
            policy,
        }
    }

    /// Remap both dumps into `output_dir`.
    ///
    /// Consumes the remapper; the allocator's issued set spans both
    /// namespaces and must not leak into another run.
    pub fn run(
        mut self,
        card_type_dump: &str,
        card_dump: &str,
        output_dir: &Path,
    ) -> Result<RemapReport, error::CardshiftError> {
        // Pass 1: card-types. One allocation per distinct legacy id;
        // a legacy id dumped twice keeps its first allocation and row
        // position, and the later name wins.
        let types = dump::parse_card_types(card_type_dump, self.policy)?;
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut resolved_types: Vec<ResolvedCardType> = Vec::new();
        for row in &types.rows {
            if let Some(&at) = index.get(&row.id) {
                resolved_types[at].name = row.name.clone();
                continue;
            }
            index.insert(row.id.clone(), resolved_types.len());
            resolved_types.push(ResolvedCardType {
                id: self.allocator.allocate(CARDTYPE_NAMESPACE, &row.id),
                name: row.name.clone(),
            });
        }

        // Pass 2: cards. Every type reference must resolve here, while
        // the filesystem is still untouched.
        let cards = dump::parse_cards(card_dump, self.policy)?;
        let mut resolved_cards = Vec::with_capacity(cards.rows.len());
        for row in &cards.rows {
            let card_type_id = index
                .get(&row.card_type_id)
                .map(|&at| resolved_types[at].id.clone())
                .ok_or_else(|| error::CardshiftError::UnresolvedReference {
                    card_id: row.id.clone(),
                    card_type_id: row.card_type_id.clone(),
                })?;
            resolved_cards.push(ResolvedCard {
                legacy_id: row.id.clone(),
                id: self.allocator.allocate(CARD_NAMESPACE, &row.id),
                name: row.name.clone(),
                card_type_id,
                image: row.image.clone(),
            });
        }

        // Asset materialization. Every card gets its per-id directory;
        // the copy depends on the legacy archive, which stays untouched.
        // A missing image is a warning, a copy that starts and fails is
        // fatal.
        let mut missing_images = Vec::new();
        for card in &resolved_cards {
            let dir = self.remap.card_asset_dir.join(&card.id);
            fs::create_dir_all(&dir).map_err(|e| error::CardshiftError::StoreWrite {
                path: dir.clone(),
                source: e,
            })?;

            let source = self.remap.legacy_image_dir.join(&card.image);
            if !source.is_file() {
                missing_images.push(format!(
                    "card {}: {} not found",
                    card.legacy_id,
                    source.display()
                ));
                continue;
            }
            let target = dir.join(config::CARD_IMAGE_FILENAME);
            fs::copy(&source, &target).map_err(|e| error::CardshiftError::StoreWrite {
                path: target.clone(),
                source: e,
            })?;
        }

        // SQL output last, card-types before cards.
        let type_rows: Vec<String> = resolved_types
            .iter()
            .map(|t| {
                format!(
                    "({}, {}, {}, {}, {})",
                    emit::sql_quote(&t.id),
                    emit::sql_quote(&self.remap.collector_id),
                    emit::sql_quote(&self.remap.owner_id),
                    emit::sql_quote(&t.name),
                    STATE_CREATED
                )
            })
            .collect();
        let card_rows: Vec<String> = resolved_cards
            .iter()
            .map(|c| {
                format!(
                    "({}, {}, {}, {}, {})",
                    emit::sql_quote(&c.id),
                    emit::sql_quote(&c.name),
                    emit::sql_quote(&c.card_type_id),
                    emit::sql_quote(&self.remap.owner_id),
                    STATE_CREATED
                )
            })
            .collect();

        let card_types_sql = output_dir.join(CARD_TYPES_SQL);
        let cards_sql = output_dir.join(CARDS_SQL);
        let types_tmp = stage(
            &card_types_sql,
            &emit::insert_block(
                "cardtypes",
                &["ctid", "coid", "uid", "ctname", "ctstate"],
                &type_rows,
            ),
        )?;
        let cards_tmp = match stage(
            &cards_sql,
            &emit::insert_block("cards", &["cid", "cname", "ctid", "uid", "cstate"], &card_rows),
        ) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&types_tmp);
                return Err(e);
            }
        };
        fs::rename(&types_tmp, &card_types_sql)?;
        fs::rename(&cards_tmp, &cards_sql)?;

        Ok(RemapReport {
            card_types: resolved_types.len(),
            cards: resolved_cards.len(),
            skipped_card_types: types.skipped,
            skipped_cards: cards.skipped,
            missing_images,
            card_types_sql,
            cards_sql,
        })
    }
}

/// Stage `contents` under a sibling `.tmp` name and return that path.
///
/// Both output files are staged before either is renamed into place;
/// a failed write leaves nothing under a final name.
fn stage(path: &Path, contents: &str) -> Result<PathBuf, error::CardshiftError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    Ok(tmp)
}

pub fn print_report(report: &RemapReport) {
    use colored::Colorize;

    println!();
    println!("  {}", "Legacy remap".bold());
    println!(
        "    {} {} card-type(s), {} card(s)",
        "✓".bright_green(),
        report.card_types,
        report.cards
    );
    println!("    {} {}", "▸".bright_cyan(), report.card_types_sql.display());
    println!("    {} {}", "▸".bright_cyan(), report.cards_sql.display());

    let skipped = report.skipped_card_types.len() + report.skipped_cards.len();
    if skipped > 0 {
        let snippets: Vec<String> = report
            .skipped_card_types
            .iter()
            .chain(&report.skipped_cards)
            .map(|s| format!("line {}: {}", s.line, s.snippet))
            .collect();
        println!(
            "    {} {} malformed row(s) skipped: {}",
            "⚠".bright_yellow(),
            skipped,
            report::sample(&snippets, 2, 110)
        );
    }
    if !report.missing_images.is_empty() {
        println!(
            "    {} {} legacy image(s) missing: {}",
            "⚠".bright_yellow(),
            report.missing_images.len(),
            report::sample(&report.missing_images, 2, 110)
        );
    }
}
