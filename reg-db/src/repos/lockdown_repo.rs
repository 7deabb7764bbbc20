//! Lockdown ledger repository (read side).
//!
//! Lockdown rows are written only by
//! [`RegistrationRepo::insert_with_lockdown`](crate::RegistrationRepo)
//! and the paired status updates, so the binding itself never changes
//! through this interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use reg_core::ledger::{LockdownLedger, QueryOptions};
use reg_core::types::{
    Checksum, ClientContext, CorrelationId, PaymentIntentLockdown, PaymentRef, PaymentStatus,
};
use reg_core::{EventId, StoreError, StoreResult};

use crate::store::{map_sqlite_err, SqliteStore};

const COLUMNS: &str = "payment_ref, correlation_id, amount_cents, currency, event, status, \
                       client_secret_hash, source_ip, user_agent, created_at, status_updated_at";

pub struct LockdownRepo {
    store: SqliteStore,
}

impl LockdownRepo {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LockdownLedger for LockdownRepo {
    async fn find(&self, payment_ref: &PaymentRef) -> StoreResult<Option<PaymentIntentLockdown>> {
        let conn = self.store.lock()?;
        let sql = format!(
            "SELECT {} FROM payment_intent_lockdowns WHERE payment_ref = ?1",
            COLUMNS
        );
        let raw = conn
            .query_row(&sql, params![payment_ref.0], read_row)
            .optional()
            .map_err(map_sqlite_err)?;
        raw.map(RawLockdown::decode).transpose()
    }

    async fn list(&self, options: QueryOptions) -> StoreResult<Vec<PaymentIntentLockdown>> {
        let conn = self.store.lock()?;
        let limit = options.limit.map(i64::from).unwrap_or(-1);
        let offset = options.offset.map(i64::from).unwrap_or(0);
        let sql = format!(
            "SELECT {} FROM payment_intent_lockdowns ORDER BY created_at ASC LIMIT ?1 OFFSET ?2",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map(params![limit, offset], read_row)
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;
        rows.into_iter().map(RawLockdown::decode).collect()
    }

    async fn count(&self) -> StoreResult<u64> {
        let conn = self.store.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM payment_intent_lockdowns", [], |row| {
                row.get(0)
            })
            .map_err(map_sqlite_err)?;
        Ok(count as u64)
    }
}

struct RawLockdown {
    payment_ref: String,
    correlation_id: String,
    amount_cents: i64,
    currency: String,
    event: String,
    status: String,
    client_secret_hash: String,
    source_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    status_updated_at: DateTime<Utc>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLockdown> {
    Ok(RawLockdown {
        payment_ref: row.get("payment_ref")?,
        correlation_id: row.get("correlation_id")?,
        amount_cents: row.get("amount_cents")?,
        currency: row.get("currency")?,
        event: row.get("event")?,
        status: row.get("status")?,
        client_secret_hash: row.get("client_secret_hash")?,
        source_ip: row.get("source_ip")?,
        user_agent: row.get("user_agent")?,
        created_at: row.get("created_at")?,
        status_updated_at: row.get("status_updated_at")?,
    })
}

impl RawLockdown {
    fn decode(self) -> StoreResult<PaymentIntentLockdown> {
        let corrupt =
            |field: &str, value: &str| StoreError::Corrupt(format!("lockdown field {}: '{}'", field, value));
        Ok(PaymentIntentLockdown {
            payment_ref: PaymentRef(self.payment_ref),
            correlation_id: CorrelationId(self.correlation_id),
            amount_cents: self.amount_cents,
            event: EventId::parse(&self.event).ok_or_else(|| corrupt("event", &self.event))?,
            status: PaymentStatus::parse(&self.status)
                .ok_or_else(|| corrupt("status", &self.status))?,
            client_secret_hash: Checksum::from_hex(&self.client_secret_hash)
                .map_err(|_| corrupt("client_secret_hash", &self.client_secret_hash))?,
            currency: self.currency,
            origin: ClientContext {
                source_ip: self.source_ip,
                user_agent: self.user_agent,
            },
            created_at: self.created_at,
            status_updated_at: self.status_updated_at,
        })
    }
}
