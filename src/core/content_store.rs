//! Content-addressed storage for original media assets.
//!
//! Assets are keyed by the SHA-256 of their bytes and live in one flat
//! directory as `<digest>.bin`. Identical bytes collapse to a single file;
//! existing entries are never overwritten.

use crate::core::error;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix for stored entries. The store keeps original bytes only; content
/// type is recovered downstream by the media manager.
const STORE_SUFFIX: &str = "bin";

pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Create the store directory if it does not exist yet.
    pub fn init(&self) -> Result<(), error::CardshiftError> {
        fs::create_dir_all(&self.root).map_err(|e| error::CardshiftError::StoreWrite {
            path: self.root.clone(),
            source: e,
        })
    }

    /// Lowercase-hex SHA-256 of `data`.
    pub fn digest_of(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Location the entry with this digest lives at.
    pub fn path_for(&self, digest: &str) -> PathBuf {
        self.root.join(format!("{}.{}", digest, STORE_SUFFIX))
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.path_for(digest).is_file()
    }

    /// Move the asset at `source` into the store under `digest`.
    ///
    /// After success the source no longer exists. If an entry with the same
    /// digest is already stored, the source is simply removed and the
    /// existing entry left untouched.
    pub fn ingest(&self, source: &Path, digest: &str) -> Result<PathBuf, error::CardshiftError> {
        if !source.is_file() {
            return Err(error::CardshiftError::AssetMissing(source.to_path_buf()));
        }
        let target = self.path_for(digest);
        if target.exists() {
            fs::remove_file(source)?;
            return Ok(target);
        }
        if fs::rename(source, &target).is_err() {
            // Rename cannot cross filesystems; copy, then drop the source.
            fs::copy(source, &target).map_err(|e| error::CardshiftError::StoreWrite {
                path: target.clone(),
                source: e,
            })?;
            fs::remove_file(source)?;
        }
        Ok(target)
    }
}
