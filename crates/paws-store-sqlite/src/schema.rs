//! SQL schema for the Paws SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Catalog tables. Owned by the listing service; this crate only reads them
-- (imports aside).
CREATE TABLE IF NOT EXISTS organizations (
    organization_id TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    verified        INTEGER NOT NULL DEFAULT 0,
    sponsored       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS candidates (
    candidate_id       TEXT PRIMARY KEY,
    organization_id    TEXT NOT NULL,
    name               TEXT NOT NULL,
    species            TEXT NOT NULL,
    breed              TEXT,
    age_group          TEXT NOT NULL,   -- 'infant' | 'young' | 'adult' | 'senior'
    size               TEXT NOT NULL,
    sex                TEXT NOT NULL,
    images             TEXT NOT NULL DEFAULT '[]',   -- JSON array of references
    short_description  TEXT,
    long_description   TEXT,
    good_with_children INTEGER NOT NULL DEFAULT 0,
    good_with_dogs     INTEGER NOT NULL DEFAULT 0,
    good_with_cats     INTEGER NOT NULL DEFAULT 0,
    status             TEXT NOT NULL DEFAULT 'available',
    created_at         TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

-- Swipes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. There is no foreign
-- key to candidates: swipes on delisted candidates are still recorded.
CREATE TABLE IF NOT EXISTS swipe_actions (
    swipe_id     TEXT PRIMARY KEY,
    action       TEXT NOT NULL CHECK (action IN ('like', 'pass', 'super_like', 'info')),
    candidate_id TEXT NOT NULL,
    session_id   TEXT NOT NULL,
    user_id      TEXT,
    timestamp    TEXT NOT NULL,   -- client-asserted
    created_at   TEXT NOT NULL,   -- server-assigned
    updated_at   TEXT NOT NULL
);

-- Additive preference ledger; rows are only ever incremented.
CREATE TABLE IF NOT EXISTS user_preferences (
    user_id          TEXT NOT NULL,
    preference_type  TEXT NOT NULL,
    preference_value TEXT NOT NULL,
    score            INTEGER NOT NULL CHECK (score >= 0),
    updated_at       TEXT NOT NULL,
    PRIMARY KEY (user_id, preference_type, preference_value)
);

CREATE INDEX IF NOT EXISTS candidates_status_idx  ON candidates(status, created_at);
CREATE INDEX IF NOT EXISTS swipe_candidate_idx    ON swipe_actions(candidate_id);
CREATE INDEX IF NOT EXISTS swipe_session_idx      ON swipe_actions(session_id);
CREATE INDEX IF NOT EXISTS swipe_user_action_idx  ON swipe_actions(user_id, action);
CREATE INDEX IF NOT EXISTS swipe_timestamp_idx    ON swipe_actions(timestamp);

PRAGMA user_version = 1;
";
