//! Cardshift: one-time data migrations for the CardCollector catalog.
//!
//! Two batch pipelines, both run from the deployment directory:
//!
//! - **`cardshift media`** moves every card's image out of the legacy
//!   per-card layout (`static/card/<cid>/card-image`) into the
//!   content-addressed media store (`media/originals/<sha256>.bin`) and
//!   points `cards.cimage` at the digest. Identical images collapse to
//!   one stored file. Each card commits on its own, so an interrupted
//!   run can simply be restarted.
//!
//! - **`cardshift remap`** converts flat-table SQL dumps keyed by small
//!   integer ids into the live schema's 13-character opaque ids. Card
//!   types are remapped first, then cards, with every type reference
//!   resolved through the new mapping; card images are copied into
//!   per-id asset directories and INSERT blocks are written for both
//!   tables. By default ids are derived deterministically, so a re-run
//!   reproduces byte-identical output.
//!
//! # Crate Structure
//!
//! - [`core`]: configuration, catalog access, content store, id allocation
//! - [`pipelines`]: the media and remap pipelines

pub mod cli;
pub mod core;
pub mod pipelines;

use crate::cli::{Cli, Command, MediaCli, RemapCli};
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::content_store::ContentStore;
use crate::core::error;
use crate::core::ident::IdAllocator;
use crate::core::report::ReportFormat;
use crate::pipelines::dump::RowPolicy;
use crate::pipelines::{media, remap};

use clap::Parser;
use std::fs;
use std::path::Path;

pub fn run() -> Result<(), error::CardshiftError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            // Simple output for scripts/parsing
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Media(args) => run_media(&args),
        Command::Remap(args) => run_remap(&args),
    }
}

fn run_media(args: &MediaCli) -> Result<(), error::CardshiftError> {
    let format = ReportFormat::parse(&args.format)?;
    let config = Config::load(&args.config)?;
    let catalog = Catalog::connect(&config)?;
    let store = ContentStore::new(config.media_originals_dir.clone());

    let report = media::MediaMigrator::new(&catalog, &store, &config).run()?;
    match format {
        ReportFormat::Text => media::print_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report).unwrap()),
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(error::CardshiftError::PartialFailure {
            count: report.failed.len(),
        })
    }
}

fn run_remap(args: &RemapCli) -> Result<(), error::CardshiftError> {
    let format = ReportFormat::parse(&args.format)?;
    if args.random_ids && args.seed.is_some() {
        return Err(error::CardshiftError::Config(
            "--seed has no effect with --random-ids".to_string(),
        ));
    }

    let config = Config::load(&args.config)?;
    let remap_cfg = config.require_remap()?;

    let card_type_dump = read_dump(&args.card_types)?;
    let card_dump = read_dump(&args.cards)?;

    let policy = if args.strict {
        RowPolicy::Strict
    } else {
        RowPolicy::Lenient
    };
    let allocator = if args.random_ids {
        IdAllocator::random()
    } else {
        let key = match &args.seed {
            Some(seed) => seed.clone(),
            None => format!("{}:{}", remap_cfg.collector_id, remap_cfg.owner_id),
        };
        IdAllocator::derived(key)
    };

    let report = remap::Remapper::new(remap_cfg, allocator, policy).run(
        &card_type_dump,
        &card_dump,
        &args.output_dir,
    )?;
    match format {
        ReportFormat::Text => remap::print_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report).unwrap()),
    }
    Ok(())
}

fn read_dump(path: &Path) -> Result<String, error::CardshiftError> {
    fs::read_to_string(path).map_err(|e| error::CardshiftError::DumpRead {
        path: path.to_path_buf(),
        source: e,
    })
}
