use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use slotkeeper_core::models::occupancy::{
    BulkOccupancyRequest, NewOccupancy, OccupancyAccepted, OccupancyInterval, OccupancyRemoved,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{scoped_provider, RangeQuery};
use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn add_occupancy(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NewOccupancy>,
) -> Result<(StatusCode, Json<OccupancyInterval>), AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let interval = state.engine.add_occupancy(provider_id, payload).await?;

    Ok((StatusCode::CREATED, Json(interval)))
}

#[axum::debug_handler]
pub async fn add_bulk_occupancy(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<BulkOccupancyRequest>,
) -> Result<(StatusCode, Json<OccupancyAccepted>), AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let accepted = state
        .engine
        .add_all_occupancies(provider_id, payload.intervals)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OccupancyAccepted {
            provider_id,
            accepted,
        }),
    ))
}

#[axum::debug_handler]
pub async fn list_occupancy(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<OccupancyInterval>>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let intervals = state
        .engine
        .list_occupancy(provider_id, query.range()?)
        .await?;

    Ok(Json(intervals))
}

/// Frees everything a cancelled booking held for providers of this
/// organization. Unknown bookings remove nothing.
#[axum::debug_handler]
pub async fn remove_booking_occupancy(
    State(state): State<Arc<ApiState>>,
    Path((org_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OccupancyRemoved>, AppError> {
    let removed = state
        .engine
        .remove_occupancy_in_organization(org_id, booking_id)
        .await?;

    Ok(Json(OccupancyRemoved {
        source_booking_id: booking_id,
        removed,
    }))
}
