pub mod accounts;
pub mod bookings;
pub mod extract;
pub mod health;
pub mod resources;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All HTTP routes with request tracing. Shared by the server and tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/bikes",
            get(resources::list_bikes).post(resources::create_bike),
        )
        .route(
            "/api/timeslots",
            get(resources::list_timeslots).post(resources::create_timeslot),
        )
        .route("/api/customers", post(accounts::create_customer))
        .route(
            "/api/customers/:id/bookings",
            get(accounts::customer_bookings),
        )
        .route("/api/admins", post(accounts::create_admin))
        .route("/api/admins/:id/bookings", get(accounts::admin_bookings))
        .route("/api/bookings", post(bookings::create_booking))
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
