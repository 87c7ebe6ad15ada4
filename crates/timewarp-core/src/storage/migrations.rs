//! Database schema migrations for the card collection.
//!
//! Migrations are versioned and applied automatically when opening the collection.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: decks and cards.
///
/// `due` is an ISO date. `ivl` keeps the host convention: positive days,
/// negative seconds for a sub-day learning step, zero when not in rotation.
/// `tags` is a JSON array of strings.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS decks (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE COLLATE NOCASE
        );

        CREATE TABLE IF NOT EXISTS cards (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id   INTEGER NOT NULL REFERENCES decks(id),
            state     TEXT NOT NULL DEFAULT 'new',
            due       TEXT NOT NULL,
            ivl       INTEGER NOT NULL DEFAULT 0,
            position  INTEGER NOT NULL DEFAULT 0,
            tags      TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_cards_deck_id ON cards(deck_id);
        CREATE INDEX IF NOT EXISTS idx_cards_state ON cards(state);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: filtered decks.
///
/// Adds:
/// - decks.dynamic: 1 for filtered decks
/// - cards.original_deck_id: home deck of a card borrowed by a filtered deck
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE decks ADD COLUMN dynamic INTEGER NOT NULL DEFAULT 0;
         ALTER TABLE cards ADD COLUMN original_deck_id INTEGER REFERENCES decks(id);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        conn.execute("INSERT INTO decks (name) VALUES ('Default')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO cards (deck_id, due) VALUES (1, '2026-01-01')",
            [],
        )
        .unwrap();

        let (state, ivl, tags, odid): (String, i64, String, Option<i64>) = conn
            .query_row(
                "SELECT state, ivl, tags, original_deck_id FROM cards WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(state, "new");
        assert_eq!(ivl, 0);
        assert_eq!(tags, "[]");
        assert_eq!(odid, None);

        let dynamic: i64 = conn
            .query_row("SELECT dynamic FROM decks WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(dynamic, 0);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_incremental_migration() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        conn.execute("INSERT INTO decks (name) VALUES ('Old')", [])
            .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);

        let stmt = conn
            .prepare("SELECT dynamic FROM decks")
            .unwrap();
        drop(stmt);
    }
}
