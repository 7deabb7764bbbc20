//! SQLite schema.
//!
//! The uniqueness constraints here are the arbiter for every concurrency
//! guarantee the services rely on:
//! - `registrations`: one row per correlation id, per (email, event),
//!   and per payment reference
//! - `payment_intent_lockdowns`: one binding per payment reference and
//!   per correlation id
//! - `critical_error_log`: append-only, mutated only to mark resolution

pub const CREATE_REGISTRATIONS: &str = "
CREATE TABLE IF NOT EXISTS registrations (
    correlation_id     TEXT PRIMARY KEY,
    payment_ref        TEXT NOT NULL UNIQUE,
    event              TEXT NOT NULL,
    locked_price_cents INTEGER NOT NULL,
    first_name         TEXT NOT NULL,
    last_name          TEXT NOT NULL,
    email              TEXT NOT NULL,
    phone              TEXT NOT NULL,
    age                INTEGER NOT NULL,
    grade              TEXT NOT NULL,
    gender             TEXT NOT NULL,
    shirt_size         TEXT NOT NULL,
    experience         TEXT NOT NULL,
    guardian_name      TEXT NOT NULL,
    guardian_phone     TEXT NOT NULL,
    payment_status     TEXT NOT NULL,
    checksum           TEXT NOT NULL,
    created_at         TEXT NOT NULL,
    completed_at       TEXT,
    source_ip          TEXT,
    user_agent         TEXT,
    UNIQUE (email, event)
)";

pub const CREATE_LOCKDOWNS: &str = "
CREATE TABLE IF NOT EXISTS payment_intent_lockdowns (
    payment_ref        TEXT PRIMARY KEY,
    correlation_id     TEXT NOT NULL UNIQUE,
    amount_cents       INTEGER NOT NULL,
    currency           TEXT NOT NULL,
    event              TEXT NOT NULL,
    status             TEXT NOT NULL,
    client_secret_hash TEXT NOT NULL,
    source_ip          TEXT,
    user_agent         TEXT,
    created_at         TEXT NOT NULL,
    status_updated_at  TEXT NOT NULL
)";

pub const CREATE_ERROR_LOG: &str = "
CREATE TABLE IF NOT EXISTS critical_error_log (
    entry_id           TEXT PRIMARY KEY,
    code               TEXT NOT NULL,
    severity           TEXT NOT NULL,
    correlation_id     TEXT,
    payment_ref        TEXT,
    email              TEXT,
    event              TEXT,
    message            TEXT NOT NULL,
    context            TEXT NOT NULL,
    resolved           INTEGER NOT NULL DEFAULT 0,
    resolved_by        TEXT,
    resolution_action  TEXT,
    created_at         TEXT NOT NULL,
    resolved_at        TEXT
)";

pub const CREATE_ERROR_LOG_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_error_log_unresolved
    ON critical_error_log (resolved, created_at)";

/// All statements, in application order.
pub const ALL: [&str; 4] = [
    CREATE_REGISTRATIONS,
    CREATE_LOCKDOWNS,
    CREATE_ERROR_LOG,
    CREATE_ERROR_LOG_INDEX,
];
