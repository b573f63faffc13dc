//! SQL schema for the growlog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS owners (
    owner_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS plants (
    plant_id   TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL REFERENCES owners(owner_id) ON DELETE CASCADE,
    number     INTEGER NOT NULL,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Positions within a plant are kept contiguous from 0 by the store.
-- No UNIQUE index: swaps and renumbering pass through transient duplicates.
CREATE TABLE IF NOT EXISTS facts (
    fact_id    TEXT PRIMARY KEY,
    plant_id   TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
    label      TEXT NOT NULL,
    value      TEXT NOT NULL,
    kind       TEXT NOT NULL,   -- FactKind::as_str
    media_json TEXT,            -- JSON-encoded MediaRef; photos only
    position   INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK ((kind = 'photo') = (media_json IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS plants_owner_idx    ON plants(owner_id);
CREATE INDEX IF NOT EXISTS facts_plant_pos_idx ON facts(plant_id, position);
CREATE INDEX IF NOT EXISTS facts_label_idx     ON facts(plant_id, label);

PRAGMA user_version = 1;
";
