//! WeatherWise backend
//!
//! Weather analysis and real-time disaster alerting for Philippine DRRM
//! offices: batch pattern, anomaly, trend and risk analyses over stored
//! observations, plus live hazard detection with WebSocket fan-out.

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::EmergencyWorkflow;
use services::{ProcessorCollaborators, RealTimeEventProcessor};
use store::{EventStore, InMemoryStore, WeatherStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when running against PostgreSQL
    pub db: Option<PgPool>,
    pub config: Arc<Config>,
    pub weather_store: Arc<dyn WeatherStore>,
    pub processor: Arc<RealTimeEventProcessor>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Option<PgPool>,
        weather_store: Arc<dyn WeatherStore>,
        event_store: Arc<dyn EventStore>,
        workflow: Arc<dyn EmergencyWorkflow>,
    ) -> Self {
        let processor = RealTimeEventProcessor::new(
            config.thresholds(),
            ProcessorCollaborators {
                weather_store: weather_store.clone(),
                event_store,
                workflow,
            },
            &config.realtime,
        )
        .with_debug_operations(config.is_development());

        Self {
            db,
            config: Arc::new(config),
            weather_store,
            processor: Arc::new(processor),
        }
    }

    /// State backed entirely by one in-memory store
    pub fn in_memory(
        config: Config,
        store: Arc<InMemoryStore>,
        workflow: Arc<dyn EmergencyWorkflow>,
    ) -> Self {
        Self::new(config, None, store.clone(), store, workflow)
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "WeatherWise Disaster Risk API v1.0"
}
