use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotkeeper_core::models::provider::Provider;
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_upsert_then_get_provider() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path(""))
        .json(&json!({ "display_name": "Dr. Okafor", "timezone": "America/New_York" }))
        .await;
    response.assert_status_ok();

    let provider: Provider = ctx.server.get(&ctx.provider_path("")).await.json();
    assert_eq!(provider.id, ctx.provider_id);
    assert_eq!(provider.organization_id, ctx.org_id);
    assert_eq!(provider.timezone, "America/New_York");
    assert_eq!(provider.display_name.as_deref(), Some("Dr. Okafor"));
}

#[tokio::test]
async fn test_get_unknown_provider() {
    let ctx = TestContext::new();

    let response = ctx.server.get(&ctx.provider_path("")).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_unknown_timezone_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put(&ctx.provider_path(""))
        .json(&json!({ "timezone": "Atlantis/Central" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_is_hidden_from_other_organizations() {
    let ctx = TestContext::new();
    ctx.server
        .put(&ctx.provider_path(""))
        .json(&json!({ "timezone": "UTC" }))
        .await
        .assert_status_ok();

    let foreign = format!(
        "/api/organizations/{}/providers/{}",
        Uuid::new_v4(),
        ctx.provider_id
    );

    ctx.server.get(&foreign).await.assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .get(&format!("{foreign}/schedule/base"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .put(&foreign)
        .json(&json!({ "timezone": "UTC" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_storage() {
    let ctx = TestContext::new();

    let body: Value = ctx.server.get("/health").await.json();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["cache_enabled"], true);
}
