//! PostgreSQL-backed weather and event store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{ForecastEntry, Observation, RealTimeEvent};
use sqlx::{FromRow, PgPool};

use super::{EventStore, WeatherStore};
use crate::error::AppResult;

/// Store over the `current_weather`, `weather_forecasts` and `realtime_events` tables
#[derive(Clone)]
pub struct PgWeatherStore {
    db: PgPool,
}

/// Row of `current_weather`
#[derive(Debug, Clone, FromRow)]
struct ObservationRow {
    location: String,
    temperature: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    wind_direction: f64,
    visibility: Option<f64>,
    weather_condition: String,
    rainfall_mm: Option<f64>,
    recorded_at: DateTime<Utc>,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        Observation {
            location: row.location,
            temperature: row.temperature,
            humidity: row.humidity,
            pressure: row.pressure,
            wind_speed: row.wind_speed,
            wind_direction: row.wind_direction,
            visibility: row.visibility,
            condition: row.weather_condition,
            rainfall_mm: row.rainfall_mm,
            timestamp: row.recorded_at,
        }
    }
}

/// Row of `weather_forecasts`
#[derive(Debug, Clone, FromRow)]
struct ForecastRow {
    forecast_time: DateTime<Utc>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    wind_speed: Option<f64>,
    weather_condition: Option<String>,
    precipitation_probability: Option<f64>,
}

impl From<ForecastRow> for ForecastEntry {
    fn from(row: ForecastRow) -> Self {
        ForecastEntry {
            timestamp: row.forecast_time,
            temperature: row.temperature,
            humidity: row.humidity,
            pressure: row.pressure,
            wind_speed: row.wind_speed,
            condition: row.weather_condition,
            precipitation_probability: row.precipitation_probability,
        }
    }
}

impl PgWeatherStore {
    /// Create a new PgWeatherStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeatherStore for PgWeatherStore {
    async fn get_observations(&self, location: &str, days: u32) -> AppResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r#"
            SELECT location, temperature, humidity, pressure, wind_speed, wind_direction,
                   visibility, weather_condition, rainfall_mm, recorded_at
            FROM current_weather
            WHERE location = $1
              AND recorded_at >= NOW() - ($2::int * INTERVAL '1 day')
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(location)
        .bind(days as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Observation::from).collect())
    }

    async fn get_forecast(&self, location: &str, hours: u32) -> AppResult<Vec<ForecastEntry>> {
        let rows = sqlx::query_as::<_, ForecastRow>(
            r#"
            SELECT forecast_time, temperature, humidity, pressure, wind_speed,
                   weather_condition, precipitation_probability
            FROM weather_forecasts
            WHERE location = $1
              AND forecast_time BETWEEN NOW() AND NOW() + ($2::int * INTERVAL '1 hour')
            ORDER BY forecast_time ASC
            "#,
        )
        .bind(location)
        .bind(hours as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ForecastEntry::from).collect())
    }

    async fn get_recent_rainfall(&self, location: &str) -> AppResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(rainfall_mm), 0)::double precision
            FROM current_weather
            WHERE location = $1
              AND recorded_at >= NOW() - INTERVAL '24 hours'
            "#,
        )
        .bind(location)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }

    async fn store_observation(&self, observation: &Observation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO current_weather (
                location, temperature, humidity, pressure, wind_speed, wind_direction,
                visibility, weather_condition, rainfall_mm, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&observation.location)
        .bind(observation.temperature)
        .bind(observation.humidity)
        .bind(observation.pressure)
        .bind(observation.wind_speed)
        .bind(observation.wind_direction)
        .bind(observation.visibility)
        .bind(&observation.condition)
        .bind(observation.rainfall_mm)
        .bind(observation.timestamp)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl EventStore for PgWeatherStore {
    async fn persist_event(&self, event: &RealTimeEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO realtime_events (
                id, event_type, location, severity, event_data,
                triggered_by, created_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.event_id)
        .bind(&event.event_type)
        .bind(&event.location)
        .bind(event.severity.as_str())
        .bind(&event.data)
        .bind(&event.triggered_by)
        .bind(event.timestamp)
        .bind(event.expires_at)
        .execute(&self.db)
        .await?;

        tracing::debug!(event_id = %event.event_id, "Stored event in database");
        Ok(())
    }
}
