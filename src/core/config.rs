//! Deployment configuration, loaded once at startup.
//!
//! The tool reads the same `Config.json` the CardCollector server deploys
//! with. Components receive the parsed value through their constructors;
//! nothing reads ambient process state.

use crate::core::error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Filename every per-card asset directory stores its image under.
pub const CARD_IMAGE_FILENAME: &str = "card-image";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL-style connection string for the catalog database,
    /// e.g. `sqlite://cardcollector.db`.
    pub db_connection: String,
    /// Root of the legacy per-card image layout (`<root>/<cid>/card-image`).
    #[serde(default = "default_card_static_dir")]
    pub card_static_dir: PathBuf,
    /// Root of the content-addressed original-media store.
    #[serde(default = "default_media_originals_dir")]
    pub media_originals_dir: PathBuf,
    /// Settings for the legacy-dump remap; only `cardshift remap` needs them.
    #[serde(default)]
    pub remap: Option<RemapConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemapConfig {
    /// Collector every remapped card-type is assigned to.
    pub collector_id: String,
    /// User recorded as owner on every remapped row.
    pub owner_id: String,
    /// Directory holding the legacy image files named by the card dump.
    #[serde(default = "default_legacy_image_dir")]
    pub legacy_image_dir: PathBuf,
    /// Directory that receives the new per-card asset directories.
    #[serde(default = "default_card_asset_dir")]
    pub card_asset_dir: PathBuf,
}

fn default_card_static_dir() -> PathBuf {
    PathBuf::from("static/card")
}

fn default_media_originals_dir() -> PathBuf {
    PathBuf::from("media/originals")
}

fn default_legacy_image_dir() -> PathBuf {
    PathBuf::from("old_card")
}

fn default_card_asset_dir() -> PathBuf {
    PathBuf::from("card")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, error::CardshiftError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            error::CardshiftError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let parsed: Config = serde_json::from_str(&raw).map_err(|e| {
            error::CardshiftError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Ok(parsed)
    }

    /// Expected location of a card's legacy image file.
    pub fn legacy_card_image(&self, card_id: &str) -> PathBuf {
        self.card_static_dir.join(card_id).join(CARD_IMAGE_FILENAME)
    }

    /// The remap section, or a config error naming what is missing.
    pub fn require_remap(&self) -> Result<&RemapConfig, error::CardshiftError> {
        self.remap.as_ref().ok_or_else(|| {
            error::CardshiftError::Config(
                "remap section missing from config (collector_id and owner_id are required)"
                    .to_string(),
            )
        })
    }
}
