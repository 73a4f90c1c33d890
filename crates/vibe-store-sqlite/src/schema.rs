//! SQL schema for the Vibe SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Schemaless document storage: one JSON object per (collection, key).
-- Scan order is insertion order; no caller relies on anything stronger.
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    key        TEXT NOT NULL,
    body       TEXT NOT NULL,   -- JSON object
    PRIMARY KEY (collection, key)
);

CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents(collection);

-- Accounts for the session store. Principals are minted at sign-up and
-- never reused.
CREATE TABLE IF NOT EXISTS accounts (
    email         TEXT PRIMARY KEY,
    principal     TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
