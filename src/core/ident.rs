//! Opaque identifier allocation for remapped rows.
//!
//! New ids use the catalog's public id format: 13 characters over
//! `[a-z0-9]`. The allocator guarantees uniqueness within a run; it does
//! not check the live database.
//!
//! Two modes:
//! - **Derived** (default): ids are a keyed SHA-256 of the legacy id and
//!   its table namespace, so re-running the remap with the same key
//!   reproduces the same ids.
//! - **Random**: fresh ids from the thread RNG, a new unrelated set every
//!   run.

use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub const ID_LENGTH: usize = 13;
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

enum AllocMode {
    Derived { key: String },
    Random,
}

pub struct IdAllocator {
    mode: AllocMode,
    issued: HashSet<String>,
}

impl IdAllocator {
    /// Deterministic allocator: the same key, namespace and legacy id
    /// always produce the same new id.
    pub fn derived<K: Into<String>>(key: K) -> Self {
        Self {
            mode: AllocMode::Derived { key: key.into() },
            issued: HashSet::new(),
        }
    }

    /// Fresh random ids every run.
    pub fn random() -> Self {
        Self {
            mode: AllocMode::Random,
            issued: HashSet::new(),
        }
    }

    /// Allocate a new id for `legacy_id` in `namespace`.
    ///
    /// The result is unique among every id handed out by this allocator,
    /// across namespaces; collisions are retried, never returned. Random
    /// mode ignores the namespace and legacy id.
    pub fn allocate(&mut self, namespace: &str, legacy_id: &str) -> String {
        let id = match &self.mode {
            AllocMode::Derived { key } => {
                let mut attempt = 0u32;
                loop {
                    let candidate = derive_id(key, namespace, legacy_id, attempt);
                    if !self.issued.contains(&candidate) {
                        break candidate;
                    }
                    attempt += 1;
                }
            }
            AllocMode::Random => {
                let mut rng = rand::thread_rng();
                loop {
                    let candidate: String = (0..ID_LENGTH)
                        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                        .collect();
                    if !self.issued.contains(&candidate) {
                        break candidate;
                    }
                }
            }
        };
        self.issued.insert(id.clone());
        id
    }
}

fn derive_id(key: &str, namespace: &str, legacy_id: &str, attempt: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(b":");
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(legacy_id.as_bytes());
    hasher.update(b":");
    hasher.update(attempt.to_be_bytes());
    let digest = hasher.finalize();
    digest[..ID_LENGTH]
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect()
}
