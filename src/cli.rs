//! CLI struct definitions for the cardshift command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "cardshift",
    version = env!("CARGO_PKG_VERSION"),
    about = "One-time data migrations for the CardCollector catalog"
)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Move per-card images into the content-addressed media store
    Media(MediaCli),
    /// Remap a legacy SQL dump onto the opaque-id schema
    Remap(RemapCli),
    /// Show version information
    Version,
}

#[derive(clap::Args, Debug)]
pub(crate) struct MediaCli {
    /// Path to the deployment's Config.json.
    #[clap(long, default_value = "Config.json")]
    pub config: PathBuf,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug)]
pub(crate) struct RemapCli {
    /// Path to the deployment's Config.json.
    #[clap(long, default_value = "Config.json")]
    pub config: PathBuf,
    /// Legacy card-type dump.
    #[clap(long, default_value = "cardtypes.sql")]
    pub card_types: PathBuf,
    /// Legacy card dump.
    #[clap(long, default_value = "cards.sql")]
    pub cards: PathBuf,
    /// Directory that receives new_cardtypes.sql and new_cards.sql.
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Key for deterministic id derivation. Defaults to the configured
    /// collector and owner ids, so re-runs reproduce the same output.
    #[clap(long)]
    pub seed: Option<String>,
    /// Allocate fresh random ids instead of derived ones.
    #[clap(long)]
    pub random_ids: bool,
    /// Fail on the first malformed dump row instead of skipping it.
    #[clap(long)]
    pub strict: bool,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
}
