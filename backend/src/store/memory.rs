//! In-memory store for development and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::{ForecastEntry, Observation, RealTimeEvent};
use tokio::sync::RwLock;

use super::{EventStore, WeatherStore};
use crate::error::{AppError, AppResult};

/// Process-local weather and event store
///
/// Time windows are measured from the anchor when one is set, otherwise from
/// the wall clock at query time.
#[derive(Default)]
pub struct InMemoryStore {
    observations: RwLock<HashMap<String, Vec<Observation>>>,
    forecasts: RwLock<HashMap<String, Vec<ForecastEntry>>>,
    events: RwLock<Vec<RealTimeEvent>>,
    anchor: Option<DateTime<Utc>>,
    fail_persistence: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose windows are measured from a fixed instant
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.anchor.unwrap_or_else(Utc::now)
    }

    /// Make every `persist_event` call fail
    pub fn set_fail_persistence(&self, fail: bool) {
        self.fail_persistence.store(fail, Ordering::SeqCst);
    }

    /// Make every read fail as if the store were down
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn insert_observations(&self, observations: impl IntoIterator<Item = Observation>) {
        let mut map = self.observations.write().await;
        for observation in observations {
            map.entry(observation.location.clone())
                .or_default()
                .push(observation);
        }
    }

    pub async fn insert_forecast(&self, location: &str, entries: impl IntoIterator<Item = ForecastEntry>) {
        self.forecasts
            .write()
            .await
            .entry(location.to_string())
            .or_default()
            .extend(entries);
    }

    /// Events accepted by `persist_event`, in call order
    pub async fn persisted_events(&self) -> Vec<RealTimeEvent> {
        self.events.read().await.clone()
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "in-memory store configured to fail reads".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherStore for InMemoryStore {
    async fn get_observations(&self, location: &str, days: u32) -> AppResult<Vec<Observation>> {
        self.check_reads()?;
        let now = self.now();
        let since = now - Duration::days(i64::from(days));

        let mut rows: Vec<Observation> = self
            .observations
            .read()
            .await
            .get(location)
            .map(|all| {
                all.iter()
                    .filter(|o| o.timestamp >= since && o.timestamp <= now)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|o| o.timestamp);
        Ok(rows)
    }

    async fn get_forecast(&self, location: &str, hours: u32) -> AppResult<Vec<ForecastEntry>> {
        self.check_reads()?;
        let now = self.now();
        let until = now + Duration::hours(i64::from(hours));

        let mut entries: Vec<ForecastEntry> = self
            .forecasts
            .read()
            .await
            .get(location)
            .map(|all| {
                all.iter()
                    .filter(|f| f.timestamp >= now && f.timestamp <= until)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by_key(|f| f.timestamp);
        Ok(entries)
    }

    async fn get_recent_rainfall(&self, location: &str) -> AppResult<f64> {
        self.check_reads()?;
        let now = self.now();
        let since = now - Duration::hours(24);

        let total = self
            .observations
            .read()
            .await
            .get(location)
            .map(|all| {
                all.iter()
                    .filter(|o| o.timestamp >= since && o.timestamp <= now)
                    .filter_map(|o| o.rainfall_mm)
                    .sum()
            })
            .unwrap_or(0.0);
        Ok(total)
    }

    async fn store_observation(&self, observation: &Observation) -> AppResult<()> {
        self.insert_observations([observation.clone()]).await;
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn persist_event(&self, event: &RealTimeEvent) -> AppResult<()> {
        if self.fail_persistence.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "in-memory store configured to fail persistence".to_string(),
            ));
        }
        self.events.write().await.push(event.clone());
        Ok(())
    }
}
