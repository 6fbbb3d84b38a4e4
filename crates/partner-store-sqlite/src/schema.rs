//! SQL schema for the partner SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS partners (
    id           TEXT PRIMARY KEY,   -- assigned by the upstream system
    first_name   TEXT,
    last_name    TEXT,
    email        TEXT,
    phone        TEXT,
    country      TEXT,
    partner_type TEXT,
    created_at   TEXT NOT NULL,      -- ISO 8601 UTC; set on first write only
    modified_at  TEXT NOT NULL       -- ISO 8601 UTC; set on every write
);

CREATE INDEX IF NOT EXISTS partners_country_idx ON partners(country);
CREATE INDEX IF NOT EXISTS partners_type_idx    ON partners(partner_type);

PRAGMA user_version = 1;
";
