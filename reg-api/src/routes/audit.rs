//! Correlation audit endpoint.

use axum::{extract::State, Json};

use reg_db::AuditReport;

use crate::error::ApiResult;
use crate::state::AppState;

/// Run a full audit sweep and return the report.
pub async fn run_audit(State(state): State<AppState>) -> ApiResult<Json<AuditReport>> {
    let report = state.auditor.audit_all().await?;
    Ok(Json(report))
}
