//! Critical error ledger endpoints (operator surface).

use axum::{
    extract::{Path, Query, State},
    Json,
};

use reg_core::ledger::QueryOptions;
use reg_core::StoreError;

use crate::dto::{ErrorEntryResponse, ListQueryParams, ResolveErrorRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// List unresolved critical error entries.
pub async fn list_unresolved(
    State(state): State<AppState>,
    Query(params): Query<ListQueryParams>,
) -> ApiResult<Json<Vec<ErrorEntryResponse>>> {
    let entries = state
        .errors
        .list_unresolved(QueryOptions {
            limit: Some(params.limit),
            offset: Some(params.offset),
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(
        entries.iter().map(ErrorEntryResponse::from_entry).collect(),
    ))
}

/// Mark an entry resolved, recording the resolver and action taken.
pub async fn resolve_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<ResolveErrorRequest>,
) -> ApiResult<Json<ErrorEntryResponse>> {
    let entry = state
        .errors
        .resolve(&entry_id, &request.resolved_by, &request.action)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => {
                ApiError::NotFound(format!("error entry {} not found", entry_id))
            }
            other => ApiError::Internal(other.to_string()),
        })?;

    Ok(Json(ErrorEntryResponse::from_entry(&entry)))
}
