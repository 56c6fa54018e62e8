//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Only matched routes are recorded, labelled by route template
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/rentals", rental_routes())
        .nest("/items", item_routes())
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::user::create_user))
        .route(
            "/{user_id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
        .route("/{user_id}/rentals", get(handlers::user::get_user_rentals))
        .route("/{user_id}/owned-rentals", get(handlers::user::get_owned_rentals))
}

/// Rental routes
fn rental_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::rental::create_rental))
        .route("/{rental_id}", get(handlers::rental::get_rental))
        .route(
            "/{rental_id}/status",
            patch(handlers::rental::update_rental_status),
        )
}

/// Item routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/{item_id}/rentals", get(handlers::rental::get_item_rentals))
        .route(
            "/{item_id}/availability",
            get(handlers::rental::check_availability),
        )
}
