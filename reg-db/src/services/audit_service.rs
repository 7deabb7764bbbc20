//! Correlation auditor.
//!
//! Point-in-time integrity verification over existing registrations:
//! recompute each checksum and confirm the lockdown binding. Findings
//! are reported and logged, never auto-repaired - repair is an explicit,
//! human-triggered action.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use reg_core::checksum;
use reg_core::ledger::{LockdownLedger, QueryOptions, RegistrationStore};
use reg_core::logging::operations;
use reg_core::types::{
    CorrelationId, CriticalErrorCode, CriticalErrorEntry, PaymentIntentLockdown, PaymentRef,
    Registration,
};
use reg_core::RegResult;

use crate::services::CriticalErrorRecorder;

/// Why a registration was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionKind {
    ChecksumMismatch,
    LockdownMissing,
    CorrelationMismatch,
    AmountDrift,
}

impl CorruptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChecksumMismatch => "checksum_mismatch",
            Self::LockdownMissing => "lockdown_missing",
            Self::CorrelationMismatch => "correlation_mismatch",
            Self::AmountDrift => "amount_drift",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorruptionFinding {
    pub correlation_id: CorrelationId,
    pub payment_ref: PaymentRef,
    pub kind: CorruptionKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub total: u64,
    pub valid_count: u64,
    pub corrupted: Vec<CorruptionFinding>,
}

pub struct CorrelationAuditor {
    store: Arc<dyn RegistrationStore>,
    lockdowns: Arc<dyn LockdownLedger>,
    errors: CriticalErrorRecorder,
}

impl CorrelationAuditor {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        lockdowns: Arc<dyn LockdownLedger>,
        errors: CriticalErrorRecorder,
    ) -> Self {
        Self {
            store,
            lockdowns,
            errors,
        }
    }

    /// Full sweep over every registration.
    pub async fn audit_all(&self) -> RegResult<AuditReport> {
        let registrations = self.store.list(QueryOptions::default()).await?;
        let total = registrations.len() as u64;

        let mut corrupted = Vec::new();
        for registration in &registrations {
            if let Some(finding) = self.check(registration).await? {
                corrupted.push(finding);
            }
        }

        info!(
            operation = operations::AUDIT_SWEEP,
            count = total,
            corrupted = corrupted.len(),
            "audit sweep complete"
        );

        Ok(AuditReport {
            total,
            valid_count: total - corrupted.len() as u64,
            corrupted,
        })
    }

    /// Single-record check, used opportunistically whenever a
    /// registration is read back out for display. A finding is recorded
    /// in the critical error ledger; nothing is repaired.
    pub async fn check(&self, registration: &Registration) -> RegResult<Option<CorruptionFinding>> {
        let lockdown = self.lockdowns.find(&registration.payment_ref).await?;
        let finding = evaluate(registration, lockdown.as_ref());

        if let Some(ref finding) = finding {
            self.errors
                .record(
                    CriticalErrorEntry::new(
                        CriticalErrorCode::DataCorruptionDetected,
                        finding.detail.clone(),
                    )
                    .with_correlation_id(registration.correlation_id.clone())
                    .with_payment_ref(registration.payment_ref.clone())
                    .with_event(registration.event)
                    .with_system_note(format!("kind: {}", finding.kind.as_str())),
                )
                .await;
            error!(
                correlation_id = %registration.correlation_id,
                operation = operations::AUDIT_RECORD,
                code = finding.kind.as_str(),
                "integrity check failed"
            );
        }

        Ok(finding)
    }
}

fn evaluate(
    registration: &Registration,
    lockdown: Option<&PaymentIntentLockdown>,
) -> Option<CorruptionFinding> {
    let finding = |kind: CorruptionKind, detail: String| {
        Some(CorruptionFinding {
            correlation_id: registration.correlation_id.clone(),
            payment_ref: registration.payment_ref.clone(),
            kind,
            detail,
        })
    };

    if !checksum::verify(registration) {
        return finding(
            CorruptionKind::ChecksumMismatch,
            format!(
                "stored checksum does not match recomputation for {}",
                registration.correlation_id
            ),
        );
    }
    match lockdown {
        None => finding(
            CorruptionKind::LockdownMissing,
            format!(
                "no lockdown row for payment reference {}",
                registration.payment_ref
            ),
        ),
        Some(lockdown) if lockdown.correlation_id != registration.correlation_id => finding(
            CorruptionKind::CorrelationMismatch,
            format!(
                "lockdown for {} is bound to {}, registration is {}",
                registration.payment_ref, lockdown.correlation_id, registration.correlation_id
            ),
        ),
        Some(lockdown) if lockdown.amount_cents != registration.locked_price_cents => finding(
            CorruptionKind::AmountDrift,
            format!(
                "lockdown amount {} differs from locked price {}",
                lockdown.amount_cents, registration.locked_price_cents
            ),
        ),
        Some(_) => None,
    }
}
