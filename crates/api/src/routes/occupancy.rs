use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/organizations/:org_id/providers/:provider_id/occupancy",
            post(handlers::occupancy::add_occupancy).get(handlers::occupancy::list_occupancy),
        )
        .route(
            "/api/organizations/:org_id/providers/:provider_id/occupancy/bulk",
            post(handlers::occupancy::add_bulk_occupancy),
        )
        .route(
            "/api/organizations/:org_id/bookings/:booking_id/occupancy",
            delete(handlers::occupancy::remove_booking_occupancy),
        )
}
