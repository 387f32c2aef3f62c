//! WeatherWise - Backend Server
//!
//! Weather analytics and real-time disaster alerts for local DRRM offices.

use std::{sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weatherwise_backend::{
    config::Config,
    create_app,
    external::{EmergencyWorkflow, LoggingEmergencyWorkflow, WebhookEmergencyWorkflow},
    store::PgWeatherStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "weatherwise_server=debug,weatherwise_backend=debug,tower_http=debug,sqlx=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting WeatherWise Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.is_development() {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Emergency escalation target
    let workflow: Arc<dyn EmergencyWorkflow> = match &config.emergency.webhook_url {
        Some(url) => {
            tracing::info!("Emergency webhook configured");
            Arc::new(WebhookEmergencyWorkflow::new(
                url.clone(),
                Duration::from_secs(config.emergency.timeout_secs),
            )?)
        }
        None => {
            tracing::warn!("No emergency webhook configured; escalations will only be logged");
            Arc::new(LoggingEmergencyWorkflow)
        }
    };

    // Create application state
    let store = Arc::new(PgWeatherStore::new(db_pool.clone()));
    let addr = config.socket_addr()?;
    let state = AppState::new(config, Some(db_pool), store.clone(), store, workflow);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
