//! Route definitions for WeatherWise

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Batch analyses per location
        .nest("/analysis", analysis_routes())
        // Real-time alerting
        .nest("/realtime", realtime_routes())
}

/// Batch analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/:location/patterns", get(handlers::get_patterns))
        .route("/:location/anomalies", get(handlers::get_anomalies))
        .route("/:location/trends", get(handlers::get_trends))
        .route("/:location/risk", get(handlers::get_risk))
}

/// Real-time event routes
fn realtime_routes() -> Router<AppState> {
    Router::new()
        .route("/weather-update", post(handlers::weather_update))
        .route("/active-events", get(handlers::get_active_events))
        .route("/status", get(handlers::get_status))
        .route("/ws", get(handlers::websocket))
        // Development only
        .route("/simulate", post(handlers::simulate_event))
        .route("/events", delete(handlers::clear_events))
}
