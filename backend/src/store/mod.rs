//! Collaborator stores consumed by the analysis service and event processor

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::{ForecastEntry, Observation, RealTimeEvent};

use crate::error::AppResult;

pub use memory::InMemoryStore;
pub use postgres::PgWeatherStore;

/// Source of observation, forecast and rainfall data
#[async_trait]
pub trait WeatherStore: Send + Sync {
    /// Observations from the last `days` days, oldest first
    async fn get_observations(&self, location: &str, days: u32) -> AppResult<Vec<Observation>>;

    /// Forecast entries for the next `hours` hours, earliest first
    async fn get_forecast(&self, location: &str, hours: u32) -> AppResult<Vec<ForecastEntry>>;

    /// Rainfall over the last 24 hours, mm
    async fn get_recent_rainfall(&self, location: &str) -> AppResult<f64>;

    async fn store_observation(&self, observation: &Observation) -> AppResult<()>;
}

/// Durable storage for raised events
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn persist_event(&self, event: &RealTimeEvent) -> AppResult<()>;
}
