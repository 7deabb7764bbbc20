//! SQLite connection handling.

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use reg_core::{StoreError, StoreResult};

use crate::schema;

/// Shared handle to the SQLite database.
///
/// A single connection behind a mutex: local statements are sub-second,
/// and all external I/O happens outside any held lock. Clones share the
/// same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(map_sqlite_err)?;
        Self::init(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(map_sqlite_err)?;
        for statement in schema::ALL {
            conn.execute(statement, []).map_err(map_sqlite_err)?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection. A poisoned lock is a storage fault, not a
    /// panic of the caller.
    pub(crate) fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Storage("connection lock poisoned".to_string()))
    }

    /// Raw connection handle. Exists for test harnesses that need to
    /// perturb rows underneath the repositories.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

/// Translate a rusqlite error into the store taxonomy. Uniqueness
/// violations keep the constraint name so callers can tell a lost
/// (email, event) race apart from payment-reference reuse.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::QueryReturnedNoRows => {
            StoreError::NotFound("query returned no rows".to_string())
        }
        rusqlite::Error::SqliteFailure(inner, message)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            let message = message.unwrap_or_else(|| "constraint violation".to_string());
            let constraint = message
                .strip_prefix("UNIQUE constraint failed: ")
                .unwrap_or(&message)
                .to_string();
            StoreError::Conflict { constraint }
        }
        other => StoreError::Storage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_applies_cleanly() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('registrations', 'payment_intent_lockdowns', 'critical_error_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_conflict_mapping_names_the_constraint() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        conn.execute(
            "INSERT INTO payment_intent_lockdowns \
             (payment_ref, correlation_id, amount_cents, currency, event, status, \
              client_secret_hash, created_at, status_updated_at) \
             VALUES ('pi_1', 'reg_1', 100, 'usd', 'open-mat-night', 'created', '00', \
                     '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let err = conn
            .execute(
                "INSERT INTO payment_intent_lockdowns \
                 (payment_ref, correlation_id, amount_cents, currency, event, status, \
                  client_secret_hash, created_at, status_updated_at) \
                 VALUES ('pi_1', 'reg_2', 100, 'usd', 'open-mat-night', 'created', '00', \
                         '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap_err();
        match map_sqlite_err(err) {
            StoreError::Conflict { constraint } => {
                assert!(constraint.contains("payment_ref"), "got: {}", constraint);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
