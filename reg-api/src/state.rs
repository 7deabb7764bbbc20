//! Application state for the API server.

use std::sync::Arc;

use reg_core::ledger::{CriticalErrorLedger, RegistrationStore};
use reg_core::notify::CompletionNotifier;
use reg_core::payment::PaymentProcessor;
use reg_db::{
    CorrelationAuditor, CriticalErrorRecorder, ErrorLogRepo, LockdownRepo, RegistrationRepo,
    RegistrationService, SqliteStore,
};

/// API server state.
#[derive(Clone)]
pub struct AppState {
    /// Registration orchestrator.
    pub service: Arc<RegistrationService>,
    /// Correlation auditor.
    pub auditor: Arc<CorrelationAuditor>,
    /// Critical error ledger (operator surface).
    pub errors: Arc<dyn CriticalErrorLedger>,
    /// Registration store handle for health probes.
    pub registrations: Arc<dyn RegistrationStore>,
    /// API version.
    pub version: String,
}

impl AppState {
    /// Wire the repositories and services over an open store.
    pub fn new(
        store: SqliteStore,
        processor: Arc<dyn PaymentProcessor>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        let registrations = Arc::new(RegistrationRepo::new(store.clone()));
        let lockdowns = Arc::new(LockdownRepo::new(store.clone()));
        let errors = Arc::new(ErrorLogRepo::new(store));
        let recorder = CriticalErrorRecorder::new(errors.clone());

        let service = Arc::new(RegistrationService::new(
            registrations.clone(),
            lockdowns.clone(),
            processor,
            notifier,
            recorder.clone(),
        ));
        let auditor = Arc::new(CorrelationAuditor::new(
            registrations.clone(),
            lockdowns,
            recorder,
        ));

        Self {
            service,
            auditor,
            errors,
            registrations,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub db_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            db_path: "registrations.db".to_string(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("REG_HTTP_HOST").unwrap_or(defaults.host),
            port: std::env::var("REG_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: std::env::var("REG_ENABLE_CORS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enable_cors),
            db_path: std::env::var("REG_DB_PATH").unwrap_or(defaults.db_path),
        }
    }
}
