use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/organizations/:org_id/providers/:provider_id",
        get(handlers::provider::get_provider).put(handlers::provider::upsert_provider),
    )
}
