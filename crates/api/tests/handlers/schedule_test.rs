use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotkeeper_core::models::{
    schedule::{OverrideDay, WeeklySchedule},
    time::DayOfWeek,
};

use crate::test_utils::{TestContext, MONDAY};

fn clinic_week() -> Value {
    json!({
        "days": {
            "MON": [
                { "start": "13:00", "end": "17:00" },
                { "start": "09:00", "end": "12:00" }
            ],
            "FRI": [{ "start": "09:00", "end": "12:00", "is_available": false }]
        }
    })
}

#[tokio::test]
async fn test_set_and_get_base_week() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path("/schedule/base"))
        .json(&clinic_week())
        .await;
    response.assert_status_ok();

    let week: WeeklySchedule = ctx
        .server
        .get(&ctx.provider_path("/schedule/base"))
        .await
        .json();
    let monday: Vec<String> = week
        .slots_for(DayOfWeek::Mon)
        .iter()
        .map(|slot| slot.start.to_string())
        .collect();
    assert_eq!(monday, vec!["09:00", "13:00"]);
    assert!(!week.slots_for(DayOfWeek::Fri)[0].is_available);
}

#[tokio::test]
async fn test_overlapping_slots_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path("/schedule/base"))
        .json(&json!({
            "days": {
                "TUE": [
                    { "start": "09:00", "end": "12:00" },
                    { "start": "11:30", "end": "14:00" }
                ]
            }
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_wall_time_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path("/schedule/base"))
        .json(&json!({ "days": { "MON": [{ "start": "25:00", "end": "26:00" }] } }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_delete_base_week() {
    let ctx = TestContext::new();
    ctx.server
        .put(&ctx.provider_path("/schedule/base"))
        .json(&clinic_week())
        .await
        .assert_status_ok();

    ctx.server
        .delete(&ctx.provider_path("/schedule/base"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let week: WeeklySchedule = ctx
        .server
        .get(&ctx.provider_path("/schedule/base"))
        .await
        .json();
    assert!(week.is_empty());
}

#[tokio::test]
async fn test_override_lifecycle() {
    let ctx = TestContext::new();
    let path = ctx.provider_path(&format!("/schedule/overrides/{MONDAY}/WED"));

    let stored: OverrideDay = ctx
        .server
        .put(&path)
        .json(&json!({ "slots": [{ "start": "10:00", "end": "14:00" }] }))
        .await
        .json();
    assert_eq!(stored.date.to_string(), "2025-03-12");

    let listed: Vec<OverrideDay> = ctx
        .server
        .get(&ctx.provider_path("/schedule/overrides"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", "2025-03-16")
        .await
        .json();
    assert_eq!(listed, vec![stored]);

    ctx.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);

    let listed: Vec<OverrideDay> = ctx
        .server
        .get(&ctx.provider_path("/schedule/overrides"))
        .add_query_param("from", MONDAY)
        .add_query_param("to", "2025-03-16")
        .await
        .json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_override_needs_monday_anchor() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path("/schedule/overrides/2025-03-11/WED"))
        .json(&json!({ "slots": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&ctx.provider_path("/schedule/overrides"))
        .add_query_param("from", "2025-03-16")
        .add_query_param("to", MONDAY)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
