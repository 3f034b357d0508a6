use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotkeeper_core::{errors::EngineError, models::occupancy::OccupancyInterval, Stores};
use slotkeeper_db::mock::MockStore;
use uuid::Uuid;

use crate::test_utils::{TestContext, MONDAY};

fn booking(start: &str, end: &str, booking_id: Uuid) -> Value {
    json!({ "date": MONDAY, "start": start, "end": end, "source_booking_id": booking_id })
}

#[tokio::test]
async fn test_add_and_list_occupancy() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("12:00", "13:00", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::CREATED);

    let intervals: Vec<OccupancyInterval> = ctx
        .server
        .get(&ctx.provider_path("/occupancy"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", MONDAY)
        .await
        .json();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].provider_id, ctx.provider_id);
}

#[tokio::test]
async fn test_overlapping_occupancy_conflicts() {
    let ctx = TestContext::new();
    ctx.server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("10:00", "11:00", Uuid::new_v4()))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("10:30", "11:30", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_inverted_occupancy_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("13:00", "12:00", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_occupancy_is_atomic() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy/bulk"))
        .json(&json!({
            "intervals": [
                booking("09:00", "10:00", Uuid::new_v4()),
                booking("09:30", "10:30", Uuid::new_v4())
            ]
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy/bulk"))
        .json(&json!({
            "intervals": [
                booking("09:00", "10:00", Uuid::new_v4()),
                booking("10:00", "11:00", Uuid::new_v4())
            ]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["accepted"], 2);
}

#[tokio::test]
async fn test_remove_booking_occupancy() {
    let ctx = TestContext::new();
    let booking_id = Uuid::new_v4();
    for (start, end) in [("09:00", "10:00"), ("14:00", "15:00")] {
        ctx.server
            .post(&ctx.provider_path("/occupancy"))
            .json(&booking(start, end, booking_id))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let path = format!(
        "/api/organizations/{}/bookings/{}/occupancy",
        ctx.org_id, booking_id
    );
    let body: Value = ctx.server.delete(&path).await.json();
    assert_eq!(body["removed"], 2);

    let body: Value = ctx.server.delete(&path).await.json();
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn test_booking_removal_is_scoped_to_the_organization() {
    let ctx = TestContext::new();
    ctx.server
        .put(&ctx.provider_path(""))
        .json(&json!({ "timezone": "UTC" }))
        .await
        .assert_status_ok();
    let booking_id = Uuid::new_v4();
    ctx.server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("09:00", "10:00", booking_id))
        .await
        .assert_status(StatusCode::CREATED);

    let foreign = format!(
        "/api/organizations/{}/bookings/{}/occupancy",
        Uuid::new_v4(),
        booking_id
    );
    let response = ctx.server.delete(&foreign).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["removed"], 0);

    let intervals: Vec<OccupancyInterval> = ctx
        .server
        .get(&ctx.provider_path("/occupancy"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", MONDAY)
        .await
        .json();
    assert_eq!(intervals.len(), 1);

    let own = format!(
        "/api/organizations/{}/bookings/{}/occupancy",
        ctx.org_id, booking_id
    );
    let body: Value = ctx.server.delete(&own).await.json();
    assert_eq!(body["removed"], 1);
}

#[test_log::test(tokio::test)]
async fn test_store_failure_maps_to_server_error() {
    let mut store = MockStore::new();
    store.expect_get_provider().returning(|_| Ok(None));
    store
        .expect_insert_occupancies()
        .returning(|_, _| Err(EngineError::Database(eyre::eyre!("connection reset"))));
    let ctx = TestContext::with_stores(Stores::shared(Arc::new(store)));

    let response = ctx
        .server
        .post(&ctx.provider_path("/occupancy"))
        .json(&booking("09:00", "10:00", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}
