//! # Availability Handlers
//!
//! Read side of the API: resolved windows over a date range and the
//! provider's status at an instant.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use slotkeeper_core::models::{
    availability::{AvailabilityQuery, AvailabilityResponse, ProviderStatus, StatusQuery},
    time::DateRange,
};
use std::sync::Arc;
use uuid::Uuid;

use super::scoped_provider;
use crate::{middleware::error_handling::AppError, ApiState};

/// Free windows for `from..=to`, or the full timeline with `include_busy=true`
///
/// Windows are UTC instants ordered by start. Dates the provider has no
/// schedule for contribute nothing, or a single busy window in timeline mode.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let range = DateRange::new(query.from, query.to)?;
    let (timezone, windows) = state
        .engine
        .availability(provider_id, range, query.include_busy)
        .await?;

    Ok(Json(AvailabilityResponse {
        provider_id,
        timezone: timezone.name().to_string(),
        windows,
    }))
}

/// Whether the provider is free at `at` (default: now)
#[axum::debug_handler]
pub async fn get_status(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ProviderStatus>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let instant = query.at.unwrap_or_else(Utc::now);
    let status = state.engine.status(provider_id, instant).await?;

    Ok(Json(status))
}
