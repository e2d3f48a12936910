//! Record-store access for the catalog database.
//!
//! Wraps the deployment's SQLite catalog behind the few operations the
//! migrations need. Connection strings keep the URL style the server
//! configs always used (`sqlite://<path>`).

use crate::core::config::Config;
use crate::core::error;
use rusqlite::Connection;

#[derive(Debug)]
pub struct Catalog {
    conn: Connection,
}

/// Strip the URL dressing off a `sqlite://` connection string.
///
/// Query parameters are ignored (older deployment strings carry
/// `?ssl-mode=DISABLED`); any scheme other than sqlite is rejected.
pub fn database_path(connection: &str) -> Result<String, error::CardshiftError> {
    let without_query = connection.split('?').next().unwrap_or(connection);
    let path = if let Some(rest) = without_query.strip_prefix("sqlite://") {
        rest
    } else if without_query.contains("://") {
        return Err(error::CardshiftError::Connection(format!(
            "unsupported scheme in {connection:?}; expected sqlite://<path>"
        )));
    } else {
        without_query
    };
    if path.is_empty() {
        return Err(error::CardshiftError::Connection(
            "empty database path".to_string(),
        ));
    }
    Ok(path.to_string())
}

impl Catalog {
    /// Open the catalog named by `config.db_connection`.
    ///
    /// Fails with `Connection` before any mutation has happened; an
    /// unreachable catalog aborts the whole run.
    pub fn connect(config: &Config) -> Result<Self, error::CardshiftError> {
        let path = database_path(&config.db_connection)?;
        let conn = Connection::open(&path)
            .map_err(|e| error::CardshiftError::Connection(format!("{path}: {e}")))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        Ok(Self { conn })
    }

    /// Every card id in the catalog, in table order.
    pub fn list_card_ids(&self) -> Result<Vec<String>, error::CardshiftError> {
        let mut stmt = self.conn.prepare("SELECT cid FROM cards")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Point a card's image reference at a content digest.
    ///
    /// The connection runs in autocommit mode, so each update is its own
    /// transaction and partial progress survives an interrupted run.
    pub fn update_card_image(
        &self,
        card_id: &str,
        digest: &str,
    ) -> Result<(), error::CardshiftError> {
        self.conn
            .execute(
                "UPDATE cards SET cimage=?1 WHERE cid=?2",
                rusqlite::params![digest, card_id],
            )
            .map_err(error::CardshiftError::Persist)?;
        Ok(())
    }
}
