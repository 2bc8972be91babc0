//! SQL schema for the FollowMyLead SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS leads (
    lead_id         TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT,
    company         TEXT,
    industry        TEXT,
    location        TEXT,
    source          TEXT NOT NULL,
    score           REAL NOT NULL,   -- canonical 0..100 scale
    estimated_value REAL,
    status          TEXT NOT NULL DEFAULT 'new',
    created_at      TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    last_contact    TEXT
);

-- Notes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS lead_notes (
    note_id    TEXT PRIMARY KEY,
    lead_id    TEXT NOT NULL REFERENCES leads(lead_id),
    content    TEXT NOT NULL,
    author     TEXT NOT NULL,
    created_at TEXT NOT NULL         -- ISO 8601 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS leads_status_idx      ON leads(status);
CREATE INDEX IF NOT EXISTS leads_created_idx     ON leads(created_at);
CREATE INDEX IF NOT EXISTS lead_notes_lead_idx   ON lead_notes(lead_id);
CREATE INDEX IF NOT EXISTS lead_notes_created_idx ON lead_notes(created_at);

PRAGMA user_version = 1;
";
