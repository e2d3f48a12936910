use rusqlite;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardshiftError {
    #[error("cannot open catalog database: {0}")]
    Connection(String),
    #[error("asset missing: {0}")]
    AssetMissing(PathBuf),
    #[error("cannot write asset {path}: {source}")]
    StoreWrite { path: PathBuf, source: io::Error },
    #[error("card {card_id} references card-type {card_type_id}, which never appeared in the card-type dump")]
    UnresolvedReference {
        card_id: String,
        card_type_id: String,
    },
    #[error("catalog write failed: {0}")]
    Persist(#[source] rusqlite::Error),
    #[error("malformed {table} row at line {line}: {snippet}")]
    MalformedRow {
        table: String,
        line: usize,
        snippet: String,
    },
    #[error("cannot read dump {path}: {source}")]
    DumpRead { path: PathBuf, source: io::Error },
    #[error("config error: {0}")]
    Config(String),
    #[error("{count} record(s) failed to migrate")]
    PartialFailure { count: usize },
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}
