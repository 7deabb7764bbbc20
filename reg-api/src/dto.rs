//! Data Transfer Objects for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reg_core::types::{Registration, RegistrationPayload};

// ============ Registration DTOs ============

/// Create registration request. Enum-valued fields are strings checked
/// by the validation gate; `amount` is the client-displayed price,
/// carried for diagnostics but never trusted.
#[derive(Debug, Deserialize)]
pub struct CreateRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<u16>,
    pub grade: String,
    pub gender: String,
    pub shirt_size: String,
    pub experience: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub event: String,
    pub amount: Option<String>,
}

impl CreateRegistrationRequest {
    pub fn into_payload(self) -> RegistrationPayload {
        RegistrationPayload {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            grade: self.grade,
            gender: self.gender,
            shirt_size: self.shirt_size,
            experience: self.experience,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            event: self.event,
            amount: self.amount,
        }
    }
}

/// Create registration response.
#[derive(Debug, Serialize)]
pub struct CreateRegistrationResponse {
    pub correlation_id: String,
    pub payment_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_status: String,
}

/// Verify payment request.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub payment_ref: String,
}

/// Registration summary returned by verify and read-back endpoints.
#[derive(Debug, Serialize)]
pub struct RegistrationSummaryResponse {
    pub correlation_id: String,
    pub payment_ref: String,
    pub event: String,
    pub event_title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub amount_cents: i64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Present on read-back, where the opportunistic integrity check runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity_valid: Option<bool>,
}

impl RegistrationSummaryResponse {
    pub fn from_registration(reg: &Registration, integrity_valid: Option<bool>) -> Self {
        Self {
            correlation_id: reg.correlation_id.0.clone(),
            payment_ref: reg.payment_ref.0.clone(),
            event: reg.event.as_str().to_string(),
            event_title: reg.event.title().to_string(),
            first_name: reg.first_name.clone(),
            last_name: reg.last_name.clone(),
            email: reg.email.clone(),
            amount_cents: reg.locked_price_cents,
            payment_status: reg.payment_status.as_str().to_string(),
            created_at: reg.created_at,
            completed_at: reg.completed_at,
            integrity_valid,
        }
    }
}

// ============ Error Ledger DTOs ============

#[derive(Debug, Deserialize)]
pub struct ListQueryParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
pub struct ResolveErrorRequest {
    pub resolved_by: String,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorEntryResponse {
    pub entry_id: String,
    pub code: String,
    pub severity: String,
    pub correlation_id: Option<String>,
    pub payment_ref: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    pub message: String,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolution_action: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ErrorEntryResponse {
    pub fn from_entry(entry: &reg_core::types::CriticalErrorEntry) -> Self {
        Self {
            entry_id: entry.entry_id.clone(),
            code: entry.code.as_str().to_string(),
            severity: entry.severity.as_str().to_string(),
            correlation_id: entry.correlation_id.as_ref().map(|c| c.0.clone()),
            payment_ref: entry.payment_ref.as_ref().map(|p| p.0.clone()),
            email: entry.email.clone(),
            event: entry.event.map(|e| e.as_str().to_string()),
            message: entry.message.clone(),
            resolved: entry.resolved,
            resolved_by: entry.resolved_by.clone(),
            resolution_action: entry.resolution_action.clone(),
            created_at: entry.created_at,
            resolved_at: entry.resolved_at,
        }
    }
}

// ============ Health DTOs ============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registration_count: u64,
}
