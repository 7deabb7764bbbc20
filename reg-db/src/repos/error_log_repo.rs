//! Critical error log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use reg_core::ledger::{CriticalErrorLedger, QueryOptions};
use reg_core::types::{
    CorrelationId, CriticalErrorCode, CriticalErrorEntry, ErrorContext, PaymentRef, Severity,
};
use reg_core::{EventId, StoreError, StoreResult};

use crate::store::{map_sqlite_err, SqliteStore};

const COLUMNS: &str = "entry_id, code, severity, correlation_id, payment_ref, email, event, \
                       message, context, resolved, resolved_by, resolution_action, created_at, \
                       resolved_at";

pub struct ErrorLogRepo {
    store: SqliteStore,
}

impl ErrorLogRepo {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    fn find_sync(&self, entry_id: &str) -> StoreResult<Option<CriticalErrorEntry>> {
        let conn = self.store.lock()?;
        let sql = format!(
            "SELECT {} FROM critical_error_log WHERE entry_id = ?1",
            COLUMNS
        );
        let raw = conn
            .query_row(&sql, params![entry_id], read_row)
            .optional()
            .map_err(map_sqlite_err)?;
        raw.map(RawEntry::decode).transpose()
    }
}

#[async_trait]
impl CriticalErrorLedger for ErrorLogRepo {
    async fn append(&self, entry: &CriticalErrorEntry) -> StoreResult<()> {
        let context = serde_json::to_string(&entry.context)?;
        let conn = self.store.lock()?;
        conn.execute(
            "INSERT INTO critical_error_log (entry_id, code, severity, correlation_id, \
             payment_ref, email, event, message, context, resolved, resolved_by, \
             resolution_action, created_at, resolved_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                entry.entry_id,
                entry.code.as_str(),
                entry.severity.as_str(),
                entry.correlation_id.as_ref().map(|c| c.0.clone()),
                entry.payment_ref.as_ref().map(|p| p.0.clone()),
                entry.email,
                entry.event.map(|e| e.as_str()),
                entry.message,
                context,
                entry.resolved as i64,
                entry.resolved_by,
                entry.resolution_action,
                entry.created_at,
                entry.resolved_at,
            ],
        )
        .map_err(map_sqlite_err)?;
        Ok(())
    }

    async fn find(&self, entry_id: &str) -> StoreResult<Option<CriticalErrorEntry>> {
        self.find_sync(entry_id)
    }

    async fn list_unresolved(
        &self,
        options: QueryOptions,
    ) -> StoreResult<Vec<CriticalErrorEntry>> {
        let conn = self.store.lock()?;
        let limit = options.limit.map(i64::from).unwrap_or(-1);
        let offset = options.offset.map(i64::from).unwrap_or(0);
        let sql = format!(
            "SELECT {} FROM critical_error_log WHERE resolved = 0 \
             ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map(params![limit, offset], read_row)
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;
        rows.into_iter().map(RawEntry::decode).collect()
    }

    async fn resolve(
        &self,
        entry_id: &str,
        resolved_by: &str,
        action: &str,
    ) -> StoreResult<CriticalErrorEntry> {
        {
            let conn = self.store.lock()?;
            let changed = conn
                .execute(
                    "UPDATE critical_error_log SET resolved = 1, resolved_by = ?1, \
                     resolution_action = ?2, resolved_at = ?3 WHERE entry_id = ?4",
                    params![resolved_by, action, Utc::now(), entry_id],
                )
                .map_err(map_sqlite_err)?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("error entry {}", entry_id)));
            }
        }
        self.find_sync(entry_id)?
            .ok_or_else(|| StoreError::NotFound(format!("error entry {}", entry_id)))
    }
}

struct RawEntry {
    entry_id: String,
    code: String,
    severity: String,
    correlation_id: Option<String>,
    payment_ref: Option<String>,
    email: Option<String>,
    event: Option<String>,
    message: String,
    context: String,
    resolved: i64,
    resolved_by: Option<String>,
    resolution_action: Option<String>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        entry_id: row.get("entry_id")?,
        code: row.get("code")?,
        severity: row.get("severity")?,
        correlation_id: row.get("correlation_id")?,
        payment_ref: row.get("payment_ref")?,
        email: row.get("email")?,
        event: row.get("event")?,
        message: row.get("message")?,
        context: row.get("context")?,
        resolved: row.get("resolved")?,
        resolved_by: row.get("resolved_by")?,
        resolution_action: row.get("resolution_action")?,
        created_at: row.get("created_at")?,
        resolved_at: row.get("resolved_at")?,
    })
}

impl RawEntry {
    fn decode(self) -> StoreResult<CriticalErrorEntry> {
        let corrupt =
            |field: &str, value: &str| StoreError::Corrupt(format!("error entry field {}: '{}'", field, value));
        let context: ErrorContext = serde_json::from_str(&self.context)?;
        let event = self
            .event
            .map(|e| EventId::parse(&e).ok_or_else(|| corrupt("event", &e)))
            .transpose()?;
        Ok(CriticalErrorEntry {
            code: CriticalErrorCode::parse(&self.code)
                .ok_or_else(|| corrupt("code", &self.code))?,
            severity: Severity::parse(&self.severity)
                .ok_or_else(|| corrupt("severity", &self.severity))?,
            entry_id: self.entry_id,
            correlation_id: self.correlation_id.map(CorrelationId),
            payment_ref: self.payment_ref.map(PaymentRef),
            email: self.email,
            event,
            message: self.message,
            context,
            resolved: self.resolved != 0,
            resolved_by: self.resolved_by,
            resolution_action: self.resolution_action,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        })
    }
}
