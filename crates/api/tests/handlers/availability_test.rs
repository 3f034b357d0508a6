use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use slotkeeper_core::models::availability::{AvailabilityResponse, ProviderStatus};
use uuid::Uuid;

use crate::test_utils::{TestContext, MONDAY};

async fn monday_clinic(ctx: &TestContext) {
    ctx.server
        .put(&ctx.provider_path("/schedule/base"))
        .json(&json!({ "days": { "MON": [{ "start": "09:00", "end": "17:00" }] } }))
        .await
        .assert_status_ok();
}

async fn lunch_booking(ctx: &TestContext) {
    ctx.server
        .post(&ctx.provider_path("/occupancy"))
        .json(&json!({
            "date": MONDAY,
            "start": "12:00",
            "end": "13:00",
            "source_booking_id": Uuid::new_v4()
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

fn instant(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

#[tokio::test]
async fn test_availability_excludes_occupancy() {
    let ctx = TestContext::new();
    monday_clinic(&ctx).await;
    lunch_booking(&ctx).await;

    let response: AvailabilityResponse = ctx
        .server
        .get(&ctx.provider_path("/availability"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", MONDAY)
        .await
        .json();

    assert_eq!(response.timezone, "UTC");
    let spans: Vec<(DateTime<Utc>, DateTime<Utc>)> =
        response.windows.iter().map(|w| (w.start, w.end)).collect();
    assert_eq!(
        spans,
        vec![
            (instant("2025-03-10T09:00:00Z"), instant("2025-03-10T12:00:00Z")),
            (instant("2025-03-10T13:00:00Z"), instant("2025-03-10T17:00:00Z")),
        ]
    );
}

#[tokio::test]
async fn test_availability_with_busy_windows() {
    let ctx = TestContext::new();
    monday_clinic(&ctx).await;
    lunch_booking(&ctx).await;

    let response: AvailabilityResponse = ctx
        .server
        .get(&ctx.provider_path("/availability"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", MONDAY)
        .add_query_param("include_busy", true)
        .await
        .json();

    let flags: Vec<bool> = response.windows.iter().map(|w| w.is_available).collect();
    assert_eq!(flags, vec![false, true, false, true, false]);
}

#[tokio::test]
async fn test_availability_in_provider_timezone() {
    let ctx = TestContext::new();
    ctx.server
        .put(&ctx.provider_path(""))
        .json(&json!({ "timezone": "America/New_York" }))
        .await
        .assert_status_ok();
    monday_clinic(&ctx).await;

    let response: AvailabilityResponse = ctx
        .server
        .get(&ctx.provider_path("/availability"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", MONDAY)
        .await
        .json();

    // EDT (UTC-4) from 2025-03-09
    assert_eq!(response.timezone, "America/New_York");
    assert_eq!(response.windows[0].start, instant("2025-03-10T13:00:00Z"));
    assert_eq!(response.windows[0].end, instant("2025-03-10T21:00:00Z"));
}

#[tokio::test]
async fn test_status_during_booking() {
    let ctx = TestContext::new();
    monday_clinic(&ctx).await;
    lunch_booking(&ctx).await;

    let status: ProviderStatus = ctx
        .server
        .get(&ctx.provider_path("/status"))
        .add_query_param("at", "2025-03-10T12:30:00Z")
        .await
        .json();

    assert!(!status.available);
    assert_eq!(status.current_window, None);
    assert_eq!(status.next_available_at, Some(instant("2025-03-10T13:00:00Z")));
}

#[tokio::test]
async fn test_status_inside_window() {
    let ctx = TestContext::new();
    monday_clinic(&ctx).await;

    let status: ProviderStatus = ctx
        .server
        .get(&ctx.provider_path("/status"))
        .add_query_param("at", "2025-03-10T09:00:00Z")
        .await
        .json();

    assert!(status.available);
    assert_eq!(
        status.current_window.map(|w| w.end),
        Some(instant("2025-03-10T17:00:00Z"))
    );
}

#[tokio::test]
async fn test_range_too_long_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&ctx.provider_path("/availability"))
        .add_query_param("from", "2025-01-01")
        .add_query_param("to", "2025-12-31")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
