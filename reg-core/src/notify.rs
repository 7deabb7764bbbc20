//! Completion collaborators: email dispatch, downstream order creation.
//!
//! Notifiers fire only when a registration transitions to `succeeded`,
//! never on a repeated verification of an already-succeeded row. Their
//! failures are logged but never roll back the registration.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Registration;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// Invoked after a registration's payment transition commits.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn registration_succeeded(&self, registration: &Registration)
        -> Result<(), NotifyError>;
}

/// No-op notifier for deployments without side collaborators wired in.
pub struct NoopNotifier;

#[async_trait]
impl CompletionNotifier for NoopNotifier {
    async fn registration_succeeded(
        &self,
        _registration: &Registration,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
