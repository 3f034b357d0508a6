use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use slotkeeper_core::models::{
    schedule::{OverrideDay, SetBaseWeekRequest, SetOverrideRequest, WeeklySchedule},
    time::DayOfWeek,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{scoped_provider, RangeQuery};
use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn set_base_week(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetBaseWeekRequest>,
) -> Result<Json<WeeklySchedule>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let schedule = state.engine.set_week(provider_id, payload.days).await?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn get_base_week(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WeeklySchedule>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let schedule = state.engine.get_week(provider_id).await?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn delete_base_week(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    state.engine.delete_week(provider_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn set_override(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id, week_start, day)): Path<(Uuid, Uuid, NaiveDate, DayOfWeek)>,
    Json(payload): Json<SetOverrideRequest>,
) -> Result<Json<OverrideDay>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let override_day = state
        .engine
        .add_override(provider_id, week_start, day, payload.slots)
        .await?;

    Ok(Json(override_day))
}

#[axum::debug_handler]
pub async fn delete_override(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id, week_start, day)): Path<(Uuid, Uuid, NaiveDate, DayOfWeek)>,
) -> Result<StatusCode, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    state
        .engine
        .delete_override(provider_id, week_start, day)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_overrides(
    State(state): State<Arc<ApiState>>,
    Path((org_id, provider_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<OverrideDay>>, AppError> {
    scoped_provider(&state.engine, org_id, provider_id).await?;

    let overrides = state
        .engine
        .get_overrides(provider_id, query.range()?)
        .await?;

    Ok(Json(overrides))
}
