use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/organizations/:org_id/providers/:provider_id/availability",
            get(handlers::availability::get_availability),
        )
        .route(
            "/api/organizations/:org_id/providers/:provider_id/status",
            get(handlers::availability::get_status),
        )
}
