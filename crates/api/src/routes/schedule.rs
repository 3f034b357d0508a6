use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

const PROVIDER: &str = "/api/organizations/:org_id/providers/:provider_id";

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            &format!("{PROVIDER}/schedule/base"),
            put(handlers::schedule::set_base_week)
                .get(handlers::schedule::get_base_week)
                .delete(handlers::schedule::delete_base_week),
        )
        .route(
            &format!("{PROVIDER}/schedule/overrides"),
            get(handlers::schedule::get_overrides),
        )
        .route(
            &format!("{PROVIDER}/schedule/overrides/:week_start/:day"),
            put(handlers::schedule::set_override).delete(handlers::schedule::delete_override),
        )
}
