//! Watchlist storage (SQLite)
//!
//! Every operation normalizes the card name (trimmed, lowercased) before it
//! touches the database. Uniqueness is enforced by the table itself: adds are
//! a single `INSERT ... ON CONFLICT DO NOTHING`, so concurrent adds of the same
//! name can never produce two rows.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::Serialize;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// A watched card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistEntry {
    pub card_name: String,
    pub created_at: DateTime<Utc>,
}

/// Creates the `watchlist` table if it does not already exist.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS watchlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_watchlist_created_at ON watchlist(created_at);
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// Canonical key for a card name: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Add a card to the watchlist, timestamped now.
///
/// Returns `true` if a new entry was created, `false` for blank or
/// already-watched names.
pub fn add(conn: &Connection, card_name: &str) -> DbResult<bool> {
    add_at(conn, card_name, Utc::now())
}

/// Add a card with an explicit creation timestamp.
pub fn add_at(conn: &Connection, card_name: &str, created_at: DateTime<Utc>) -> DbResult<bool> {
    let name = normalize_name(card_name);
    if name.is_empty() {
        return Ok(false);
    }

    let inserted = conn.execute(
        "INSERT INTO watchlist (card_name, created_at) VALUES (?1, ?2)
         ON CONFLICT(card_name) DO NOTHING",
        params![&name, format_timestamp(&created_at)],
    )?;

    if inserted > 0 {
        log::debug!("Added '{}' to watchlist", name);
    } else {
        log::debug!("'{}' already on watchlist", name);
    }
    Ok(inserted > 0)
}

/// Remove a card from the watchlist.
///
/// Returns `true` if an entry was deleted. Blank or unknown names are a no-op.
pub fn remove(conn: &Connection, card_name: &str) -> DbResult<bool> {
    let name = normalize_name(card_name);
    if name.is_empty() {
        return Ok(false);
    }

    let deleted = conn.execute("DELETE FROM watchlist WHERE card_name = ?1", params![&name])?;
    if deleted > 0 {
        log::debug!("Removed '{}' from watchlist", name);
    }
    Ok(deleted > 0)
}

/// All entries, most recently added first
pub fn list(conn: &Connection) -> DbResult<Vec<WatchlistEntry>> {
    let mut stmt = conn.prepare(
        "SELECT card_name, created_at
         FROM watchlist
         ORDER BY created_at DESC, id DESC",
    )?;

    let results: DbResult<Vec<WatchlistEntry>> = stmt
        .query_map([], |row| {
            let raw: String = row.get(1)?;
            let created_at = DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);
            Ok(WatchlistEntry {
                card_name: row.get(0)?,
                created_at,
            })
        })?
        .collect();
    results
}

/// Number of watched cards
pub fn count(conn: &Connection) -> DbResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM watchlist", [], |row| row.get(0))
}
