//! Registration API server binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reg_api::{run_server, ApiConfig, AppState};
use reg_core::notify::NoopNotifier;
use reg_db::SqliteStore;
use reg_payments::{GatewayConfig, HttpPaymentGateway};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regd=info,reg_api=info,reg_db=info,reg_payments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    let store = match SqliteStore::open(&config.db_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, path = %config.db_path, "could not open database");
            std::process::exit(1);
        }
    };

    let gateway_config = GatewayConfig {
        base_url: std::env::var("REG_GATEWAY_URL")
            .unwrap_or_else(|_| GatewayConfig::default().base_url),
        secret_key: std::env::var("REG_GATEWAY_SECRET").unwrap_or_default(),
        ..GatewayConfig::default()
    };
    if gateway_config.secret_key.is_empty() {
        tracing::warn!("REG_GATEWAY_SECRET is not set; processor calls will be rejected");
    }
    let processor = Arc::new(HttpPaymentGateway::new(gateway_config));

    let state = AppState::new(store, processor, Arc::new(NoopNotifier));

    if let Err(e) = run_server(&config, state).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
