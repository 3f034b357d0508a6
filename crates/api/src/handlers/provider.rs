use axum::{
    extract::{Path, State},
    Json,
};
use slotkeeper_core::models::provider::{Provider, UpsertProviderRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, scoped_provider};
use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn upsert_provider(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpsertProviderRequest>,
) -> Result<Json<Provider>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let provider = state
        .engine
        .upsert_provider(provider_id, org_id, payload)
        .await?;

    Ok(Json(provider))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Provider>, AppError> {
    let provider = scoped_provider(&state.engine, org_id, provider_id)
        .await?
        .ok_or_else(|| not_found(provider_id))?;

    Ok(Json(provider))
}
