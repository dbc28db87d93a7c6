//! SQL schema for the Cerimonial SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Default BINARY collation: email uniqueness is case-sensitive.
CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string or legacy sha256 hex
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- The signed-in identity. The CHECK keeps it to a single row.
CREATE TABLE IF NOT EXISTS session (
    slot       INTEGER PRIMARY KEY CHECK (slot = 0),
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    email      TEXT NOT NULL,
    name       TEXT NOT NULL,
    started_at TEXT NOT NULL
);

-- Record tables share one shape: indexed envelope columns plus the entity
-- fields as a JSON document.
CREATE TABLE IF NOT EXISTS clients (
    record_id  TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    updated_at TEXT,
    body_json  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    record_id  TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    updated_at TEXT,
    body_json  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vendors (
    record_id  TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    updated_at TEXT,
    body_json  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS branding (
    user_id       TEXT PRIMARY KEY REFERENCES users(user_id),
    label         TEXT,
    primary_color TEXT,
    logo          TEXT
);

CREATE INDEX IF NOT EXISTS clients_owner_idx ON clients(user_id, created_at);
CREATE INDEX IF NOT EXISTS events_owner_idx  ON events(user_id, created_at);
CREATE INDEX IF NOT EXISTS vendors_owner_idx ON vendors(user_id, created_at);

PRAGMA user_version = 1;
";
