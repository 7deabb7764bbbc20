//! Critical error recorder.

use std::sync::Arc;

use reg_core::ledger::CriticalErrorLedger;
use reg_core::logging::operations;
use reg_core::types::CriticalErrorEntry;

/// Non-throwing front door to the critical error ledger.
///
/// Error logging must never become the reason a primary operation fails:
/// a ledger append that itself fails is demoted to process-level
/// diagnostic output carrying enough of the entry that nothing is fully
/// lost.
#[derive(Clone)]
pub struct CriticalErrorRecorder {
    ledger: Arc<dyn CriticalErrorLedger>,
}

impl CriticalErrorRecorder {
    pub fn new(ledger: Arc<dyn CriticalErrorLedger>) -> Self {
        Self { ledger }
    }

    pub async fn record(&self, entry: CriticalErrorEntry) {
        match self.ledger.append(&entry).await {
            Ok(()) => {
                tracing::debug!(
                    operation = operations::ERROR_APPEND,
                    code = entry.code.as_str(),
                    entry_id = %entry.entry_id,
                    "critical error entry persisted"
                );
            }
            Err(e) => {
                // Out-of-band fallback: the entry did not make the
                // ledger, so everything needed to reconstruct it goes to
                // the process log.
                tracing::error!(
                    operation = operations::ERROR_APPEND,
                    code = entry.code.as_str(),
                    severity = entry.severity.as_str(),
                    correlation_id = entry.correlation_id.as_ref().map(|c| c.as_str()),
                    payment_ref = entry.payment_ref.as_ref().map(|p| p.as_str()),
                    message = %entry.message,
                    error = %e,
                    "critical error entry could not be persisted"
                );
            }
        }
    }
}
