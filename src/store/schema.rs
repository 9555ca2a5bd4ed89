//! Table definitions and schema versioning.
//!
//! `PRAGMA user_version` records whether a file has been initialized.
//! Version 0 means "never touched by Cryptical": the tables are created
//! if missing and the store may be seeded.  After that the version is 1
//! and initialization is a no-op.

use rusqlite::Connection;

/// Schema version written after the first successful initialization.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

pub(crate) const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS vaults (
        vid   INTEGER PRIMARY KEY AUTOINCREMENT,
        vname TEXT UNIQUE NOT NULL,
        hmp   TEXT NOT NULL,
        salt  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS entries (
        pid  INTEGER PRIMARY KEY AUTOINCREMENT,
        vid  INTEGER NOT NULL REFERENCES vaults(vid) ON DELETE CASCADE,
        site TEXT NOT NULL,
        esp  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_entries_vid ON entries(vid);
";

pub(crate) fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

pub(crate) fn set_schema_version(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
}
