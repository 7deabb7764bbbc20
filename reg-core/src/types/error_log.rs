//! Critical error log entries: the append-only anomaly record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::EventId;
use crate::types::{CorrelationId, PaymentRef, RegistrationPayload};

/// Closed taxonomy of anomalies recorded in the critical error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriticalErrorCode {
    /// A second registration attempt for an (email, event) pair that
    /// already holds a row.
    DuplicateRegistrationAttempt,
    /// The creation transaction failed after validation passed; the entry
    /// carries the full request payload for forensic replay.
    RegistrationCreationFailed,
    /// A succeeded external charge with no local lockdown binding.
    PaymentIntentNotLocked,
    /// A payment reference resolved to a registration other than the one
    /// bound at creation time.
    CorrelationMismatch,
    /// A stored registration failed its integrity check.
    DataCorruptionDetected,
    /// The verification path failed for a reason other than the expected
    /// not-yet-completed state.
    VerificationFailure,
    /// A post-success collaborator (email, downstream order) failed. The
    /// registration itself stays correct.
    NotificationFailure,
}

impl CriticalErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateRegistrationAttempt => "DUPLICATE_REGISTRATION_ATTEMPT",
            Self::RegistrationCreationFailed => "REGISTRATION_CREATION_FAILED",
            Self::PaymentIntentNotLocked => "PAYMENT_INTENT_NOT_LOCKED",
            Self::CorrelationMismatch => "CORRELATION_MISMATCH",
            Self::DataCorruptionDetected => "DATA_CORRUPTION_DETECTED",
            Self::VerificationFailure => "VERIFICATION_FAILURE",
            Self::NotificationFailure => "NOTIFICATION_FAILURE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DUPLICATE_REGISTRATION_ATTEMPT" => Some(Self::DuplicateRegistrationAttempt),
            "REGISTRATION_CREATION_FAILED" => Some(Self::RegistrationCreationFailed),
            "PAYMENT_INTENT_NOT_LOCKED" => Some(Self::PaymentIntentNotLocked),
            "CORRELATION_MISMATCH" => Some(Self::CorrelationMismatch),
            "DATA_CORRUPTION_DETECTED" => Some(Self::DataCorruptionDetected),
            "VERIFICATION_FAILURE" => Some(Self::VerificationFailure),
            "NOTIFICATION_FAILURE" => Some(Self::NotificationFailure),
            _ => None,
        }
    }

    /// Severity assigned when an entry is created without an override.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DuplicateRegistrationAttempt => Severity::High,
            Self::NotificationFailure => Severity::Medium,
            Self::RegistrationCreationFailed
            | Self::PaymentIntentNotLocked
            | Self::CorrelationMismatch
            | Self::DataCorruptionDetected
            | Self::VerificationFailure => Severity::Critical,
        }
    }
}

impl fmt::Display for CriticalErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Machine context attached to an entry. A closed struct rather than a
/// free-form blob: anything not modeled here does not belong in the log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Full request payload, present when replay may be needed.
    pub request_payload: Option<RegistrationPayload>,
    /// Short system-state note (store state, processor response, ...).
    pub system_note: Option<String>,
}

/// One append-only diagnostic record. Created on any anomaly; mutated only
/// to mark resolution; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalErrorEntry {
    pub entry_id: String,
    pub code: CriticalErrorCode,
    pub severity: Severity,
    pub correlation_id: Option<CorrelationId>,
    pub payment_ref: Option<PaymentRef>,
    pub email: Option<String>,
    pub event: Option<EventId>,
    pub message: String,
    pub context: ErrorContext,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolution_action: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl CriticalErrorEntry {
    pub fn new(code: CriticalErrorCode, message: impl Into<String>) -> Self {
        let timestamp = Utc::now().timestamp_micros();
        let entropy: u32 = rand::random();
        Self {
            entry_id: format!("cel_{:016x}_{:08x}", timestamp, entropy),
            code,
            severity: code.default_severity(),
            correlation_id: None,
            payment_ref: None,
            email: None,
            event: None,
            message: message.into(),
            context: ErrorContext::default(),
            resolved: false,
            resolved_by: None,
            resolution_action: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_payment_ref(mut self, payment_ref: PaymentRef) -> Self {
        self.payment_ref = Some(payment_ref);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_event(mut self, event: EventId) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_request_payload(mut self, payload: RegistrationPayload) -> Self {
        self.context.request_payload = Some(payload);
        self
    }

    pub fn with_system_note(mut self, note: impl Into<String>) -> Self {
        self.context.system_note = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            CriticalErrorCode::DuplicateRegistrationAttempt,
            CriticalErrorCode::RegistrationCreationFailed,
            CriticalErrorCode::PaymentIntentNotLocked,
            CriticalErrorCode::CorrelationMismatch,
            CriticalErrorCode::DataCorruptionDetected,
            CriticalErrorCode::VerificationFailure,
            CriticalErrorCode::NotificationFailure,
        ] {
            assert_eq!(CriticalErrorCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(CriticalErrorCode::parse("SOMETHING_ELSE"), None);
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(
            CriticalErrorCode::DuplicateRegistrationAttempt.default_severity(),
            Severity::High
        );
        assert_eq!(
            CriticalErrorCode::RegistrationCreationFailed.default_severity(),
            Severity::Critical
        );
        assert_eq!(
            CriticalErrorCode::NotificationFailure.default_severity(),
            Severity::Medium
        );
    }

    #[test]
    fn test_entry_builder() {
        let correlation = CorrelationId::generate();
        let entry = CriticalErrorEntry::new(
            CriticalErrorCode::PaymentIntentNotLocked,
            "succeeded charge with no binding",
        )
        .with_correlation_id(correlation.clone())
        .with_payment_ref(PaymentRef("pi_1".to_string()))
        .with_system_note("observed during webhook replay");

        assert!(entry.entry_id.starts_with("cel_"));
        assert_eq!(entry.severity, Severity::Critical);
        assert_eq!(entry.correlation_id, Some(correlation));
        assert!(!entry.resolved);
    }
}
