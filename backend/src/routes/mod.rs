//! Route definitions for the Gym Freak API
//!
//! Everything under `/api` except the health probe requires a bearer token.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod ai;
mod foods;
mod health;
mod history;
mod metrics;
mod profile;
mod water;
mod workouts;

#[cfg(test)]
mod router_tests;

pub use ai::ai_routes;
pub use foods::food_routes;
pub use history::{dashboard_routes, history_routes};
pub use profile::profile_routes;
pub use water::water_routes;
pub use workouts::workout_routes;

/// Request timeout applied to every route
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::render_metrics))
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/user", profile::profile_routes())
        .nest("/foods", foods::food_routes())
        .nest("/workouts", workouts::workout_routes())
        .nest("/water", water::water_routes())
        .nest("/history", history::history_routes())
        .nest("/dashboard", history::dashboard_routes())
        .nest("/ai", ai::ai_routes())
}
