//! SQL schema for the snapmap SQLite store.
//!
//! There is no migration mechanism: the DDL is idempotent and never altered.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,  -- never reused until a wipe
    name        TEXT NOT NULL,
    link        TEXT NOT NULL DEFAULT '',
    location    TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,                      -- RFC 3339 UTC, fixed width
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_name ON records(name);
";

/// Column list shared by every `SELECT` that yields a full record.
pub const RECORD_COLUMNS: &str =
  "id, name, link, location, description, created_at, updated_at";
