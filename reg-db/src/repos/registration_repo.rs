//! Registration repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use reg_core::ledger::{QueryOptions, RegistrationStore};
use reg_core::types::{
    Checksum, ClientContext, CorrelationId, Experience, Gender, Grade, PaymentIntentLockdown,
    PaymentRef, PaymentStatus, Registration, ShirtSize,
};
use reg_core::{EventId, StoreError, StoreResult};

use crate::store::{map_sqlite_err, SqliteStore};

const COLUMNS: &str = "correlation_id, payment_ref, event, locked_price_cents, first_name, \
                       last_name, email, phone, age, grade, gender, shirt_size, experience, \
                       guardian_name, guardian_phone, payment_status, checksum, created_at, \
                       completed_at, source_ip, user_agent";

pub struct RegistrationRepo {
    store: SqliteStore,
}

impl RegistrationRepo {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    fn find_where(&self, predicate: &str, params: &[&dyn rusqlite::ToSql]) -> StoreResult<Option<Registration>> {
        let conn = self.store.lock()?;
        let sql = format!("SELECT {} FROM registrations WHERE {}", COLUMNS, predicate);
        let raw = conn
            .query_row(&sql, params, read_row)
            .optional()
            .map_err(map_sqlite_err)?;
        raw.map(RawRegistration::decode).transpose()
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepo {
    async fn insert_with_lockdown(
        &self,
        registration: &Registration,
        lockdown: &PaymentIntentLockdown,
    ) -> StoreResult<()> {
        let mut conn = self.store.lock()?;
        let tx = conn.transaction().map_err(map_sqlite_err)?;

        tx.execute(
            "INSERT INTO registrations (correlation_id, payment_ref, event, locked_price_cents, \
             first_name, last_name, email, phone, age, grade, gender, shirt_size, experience, \
             guardian_name, guardian_phone, payment_status, checksum, created_at, completed_at, \
             source_ip, user_agent) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
                     ?17, ?18, ?19, ?20, ?21)",
            params![
                registration.correlation_id.0,
                registration.payment_ref.0,
                registration.event.as_str(),
                registration.locked_price_cents,
                registration.first_name,
                registration.last_name,
                registration.email,
                registration.phone,
                registration.age as i64,
                registration.grade.as_str(),
                registration.gender.as_str(),
                registration.shirt_size.as_str(),
                registration.experience.as_str(),
                registration.guardian_name,
                registration.guardian_phone,
                registration.payment_status.as_str(),
                registration.checksum.to_hex(),
                registration.created_at,
                registration.completed_at,
                registration.origin.source_ip,
                registration.origin.user_agent,
            ],
        )
        .map_err(map_sqlite_err)?;

        tx.execute(
            "INSERT INTO payment_intent_lockdowns (payment_ref, correlation_id, amount_cents, \
             currency, event, status, client_secret_hash, source_ip, user_agent, created_at, \
             status_updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                lockdown.payment_ref.0,
                lockdown.correlation_id.0,
                lockdown.amount_cents,
                lockdown.currency,
                lockdown.event.as_str(),
                lockdown.status.as_str(),
                lockdown.client_secret_hash.to_hex(),
                lockdown.origin.source_ip,
                lockdown.origin.user_agent,
                lockdown.created_at,
                lockdown.status_updated_at,
            ],
        )
        .map_err(map_sqlite_err)?;

        tx.commit().map_err(map_sqlite_err)
    }

    async fn find_by_correlation_id(
        &self,
        correlation_id: &CorrelationId,
    ) -> StoreResult<Option<Registration>> {
        self.find_where("correlation_id = ?1", &[&correlation_id.0])
    }

    async fn find_by_payment_ref(
        &self,
        payment_ref: &PaymentRef,
    ) -> StoreResult<Option<Registration>> {
        self.find_where("payment_ref = ?1", &[&payment_ref.0])
    }

    async fn find_by_email_event(
        &self,
        email: &str,
        event: EventId,
    ) -> StoreResult<Option<Registration>> {
        self.find_where("email = ?1 AND event = ?2", &[&email, &event.as_str()])
    }

    async fn mark_succeeded(
        &self,
        correlation_id: &CorrelationId,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<Registration> {
        let mut conn = self.store.lock()?;
        let tx = conn.transaction().map_err(map_sqlite_err)?;

        let sql = format!(
            "SELECT {} FROM registrations WHERE correlation_id = ?1",
            COLUMNS
        );
        let current = tx
            .query_row(&sql, params![correlation_id.0], read_row)
            .optional()
            .map_err(map_sqlite_err)?
            .ok_or_else(|| StoreError::NotFound(format!("registration {}", correlation_id)))?
            .decode()?;

        match current.payment_status {
            // Already advanced; repeated verification is a no-op.
            PaymentStatus::Succeeded => Ok(current),
            // A failed registration is terminal and never resurrected.
            PaymentStatus::Failed => Err(StoreError::conflict("registrations.payment_status")),
            _ => {
                tx.execute(
                    "UPDATE registrations SET payment_status = 'succeeded', completed_at = ?1 \
                     WHERE correlation_id = ?2",
                    params![completed_at, correlation_id.0],
                )
                .map_err(map_sqlite_err)?;
                tx.execute(
                    "UPDATE payment_intent_lockdowns SET status = 'succeeded', \
                     status_updated_at = ?1 WHERE correlation_id = ?2",
                    params![completed_at, correlation_id.0],
                )
                .map_err(map_sqlite_err)?;
                tx.commit().map_err(map_sqlite_err)?;

                let mut updated = current;
                updated.payment_status = PaymentStatus::Succeeded;
                updated.completed_at = Some(completed_at);
                Ok(updated)
            }
        }
    }

    async fn mark_failed(&self, correlation_id: &CorrelationId) -> StoreResult<Registration> {
        let mut conn = self.store.lock()?;
        let tx = conn.transaction().map_err(map_sqlite_err)?;

        let sql = format!(
            "SELECT {} FROM registrations WHERE correlation_id = ?1",
            COLUMNS
        );
        let current = tx
            .query_row(&sql, params![correlation_id.0], read_row)
            .optional()
            .map_err(map_sqlite_err)?
            .ok_or_else(|| StoreError::NotFound(format!("registration {}", correlation_id)))?
            .decode()?;

        match current.payment_status {
            PaymentStatus::Failed => Ok(current),
            // Never regress a completed registration.
            PaymentStatus::Succeeded => Err(StoreError::conflict("registrations.payment_status")),
            _ => {
                let now = Utc::now();
                tx.execute(
                    "UPDATE registrations SET payment_status = 'failed' WHERE correlation_id = ?1",
                    params![correlation_id.0],
                )
                .map_err(map_sqlite_err)?;
                tx.execute(
                    "UPDATE payment_intent_lockdowns SET status = 'failed', \
                     status_updated_at = ?1 WHERE correlation_id = ?2",
                    params![now, correlation_id.0],
                )
                .map_err(map_sqlite_err)?;
                tx.commit().map_err(map_sqlite_err)?;

                let mut updated = current;
                updated.payment_status = PaymentStatus::Failed;
                Ok(updated)
            }
        }
    }

    async fn list(&self, options: QueryOptions) -> StoreResult<Vec<Registration>> {
        let conn = self.store.lock()?;
        let limit = options.limit.map(i64::from).unwrap_or(-1);
        let offset = options.offset.map(i64::from).unwrap_or(0);
        let sql = format!(
            "SELECT {} FROM registrations ORDER BY created_at ASC LIMIT ?1 OFFSET ?2",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map(params![limit, offset], read_row)
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;
        rows.into_iter().map(RawRegistration::decode).collect()
    }

    async fn count(&self) -> StoreResult<u64> {
        let conn = self.store.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))
            .map_err(map_sqlite_err)?;
        Ok(count as u64)
    }
}

/// Raw row image before enum decoding.
struct RawRegistration {
    correlation_id: String,
    payment_ref: String,
    event: String,
    locked_price_cents: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    age: i64,
    grade: String,
    gender: String,
    shirt_size: String,
    experience: String,
    guardian_name: String,
    guardian_phone: String,
    payment_status: String,
    checksum: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    source_ip: Option<String>,
    user_agent: Option<String>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRegistration> {
    Ok(RawRegistration {
        correlation_id: row.get("correlation_id")?,
        payment_ref: row.get("payment_ref")?,
        event: row.get("event")?,
        locked_price_cents: row.get("locked_price_cents")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        age: row.get("age")?,
        grade: row.get("grade")?,
        gender: row.get("gender")?,
        shirt_size: row.get("shirt_size")?,
        experience: row.get("experience")?,
        guardian_name: row.get("guardian_name")?,
        guardian_phone: row.get("guardian_phone")?,
        payment_status: row.get("payment_status")?,
        checksum: row.get("checksum")?,
        created_at: row.get("created_at")?,
        completed_at: row.get("completed_at")?,
        source_ip: row.get("source_ip")?,
        user_agent: row.get("user_agent")?,
    })
}

impl RawRegistration {
    fn decode(self) -> StoreResult<Registration> {
        let corrupt = |field: &str, value: &str| {
            StoreError::Corrupt(format!("registration field {}: '{}'", field, value))
        };
        Ok(Registration {
            correlation_id: CorrelationId(self.correlation_id),
            payment_ref: PaymentRef(self.payment_ref),
            event: EventId::parse(&self.event).ok_or_else(|| corrupt("event", &self.event))?,
            locked_price_cents: self.locked_price_cents,
            age: u8::try_from(self.age)
                .map_err(|_| corrupt("age", &self.age.to_string()))?,
            grade: Grade::parse(&self.grade).ok_or_else(|| corrupt("grade", &self.grade))?,
            gender: Gender::parse(&self.gender).ok_or_else(|| corrupt("gender", &self.gender))?,
            shirt_size: ShirtSize::parse(&self.shirt_size)
                .ok_or_else(|| corrupt("shirt_size", &self.shirt_size))?,
            experience: Experience::parse(&self.experience)
                .ok_or_else(|| corrupt("experience", &self.experience))?,
            payment_status: PaymentStatus::parse(&self.payment_status)
                .ok_or_else(|| corrupt("payment_status", &self.payment_status))?,
            checksum: Checksum::from_hex(&self.checksum)
                .map_err(|_| corrupt("checksum", &self.checksum))?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            created_at: self.created_at,
            completed_at: self.completed_at,
            origin: ClientContext {
                source_ip: self.source_ip,
                user_agent: self.user_agent,
            },
        })
    }
}
