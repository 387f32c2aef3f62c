//! Weather analysis service
//!
//! Fetches observation windows and forecasts from the store and runs the
//! batch analyzers over them. Store failures degrade to empty input so the
//! caller still receives a well-typed result.

use std::sync::Arc;

use shared::{
    AnomalyDetector, AnomalyResult, ForecastEntry, Observation, ObservationWindow,
    PatternAnalyzer, RiskScore, RiskScorer, TrendAnalyzer, TrendOutcome, WeatherPattern,
};

use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};
use crate::store::WeatherStore;

/// Weather analysis service over a weather store
#[derive(Clone)]
pub struct WeatherAnalysisService {
    store: Arc<dyn WeatherStore>,
    defaults: AnalysisConfig,
}

impl WeatherAnalysisService {
    /// Create a new WeatherAnalysisService instance
    pub fn new(store: Arc<dyn WeatherStore>, defaults: AnalysisConfig) -> Self {
        Self { store, defaults }
    }

    /// Detect weather patterns over the last `days` days
    pub async fn analyze_patterns(
        &self,
        location: &str,
        days: Option<u32>,
    ) -> AppResult<Vec<WeatherPattern>> {
        let location = require_location(location)?;
        let days = days.unwrap_or(self.defaults.pattern_days);
        tracing::info!(location, days, "Analyzing weather patterns");

        let window = self.window(location, days).await;
        Ok(PatternAnalyzer::new().analyze(&window))
    }

    /// Detect anomalies in the last `days` days against the baseline span
    pub async fn detect_anomalies(
        &self,
        location: &str,
        days: Option<u32>,
    ) -> AppResult<Vec<AnomalyResult>> {
        let location = require_location(location)?;
        let days = days.unwrap_or(self.defaults.anomaly_days);
        tracing::info!(location, days, "Detecting anomalies");

        let recent = self.window(location, days).await;
        let baseline = self.window(location, self.defaults.baseline_days).await;
        Ok(AnomalyDetector::new().detect(&recent, &baseline))
    }

    /// Trend report over the last `days` days
    pub async fn analyze_trends(&self, location: &str, days: Option<u32>) -> AppResult<TrendOutcome> {
        let location = require_location(location)?;
        let days = days.unwrap_or(self.defaults.trend_days);
        tracing::info!(location, days, "Analyzing weather trends");

        let window = self.window(location, days).await;
        Ok(TrendAnalyzer::new().analyze(&window))
    }

    /// Risk score from the last day of observations plus the forecast
    pub async fn calculate_risk(
        &self,
        location: &str,
        forecast_hours: Option<u32>,
    ) -> AppResult<RiskScore> {
        let location = require_location(location)?;
        let hours = forecast_hours.unwrap_or(self.defaults.forecast_hours);
        tracing::info!(location, forecast_hours = hours, "Calculating risk score");

        let current = self.window(location, 1).await;
        let forecast = self.forecast(location, hours).await;
        Ok(RiskScorer::new().score(&current, &forecast))
    }

    async fn window(&self, location: &str, days: u32) -> ObservationWindow {
        let observations: Vec<Observation> = match self.store.get_observations(location, days).await {
            Ok(observations) => observations,
            Err(e) => {
                tracing::error!(location, days, error = %e, "Failed to load observations");
                Vec::new()
            }
        };
        ObservationWindow::new(observations)
    }

    async fn forecast(&self, location: &str, hours: u32) -> Vec<ForecastEntry> {
        match self.store.get_forecast(location, hours).await {
            Ok(entries) => entries
                .iter()
                .map(|entry| shared::clean_forecast_entry(entry).0)
                .collect(),
            Err(e) => {
                tracing::error!(location, hours, error = %e, "Failed to load forecast");
                Vec::new()
            }
        }
    }
}

fn require_location(location: &str) -> AppResult<&str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        Err(AppError::MissingLocation)
    } else {
        Ok(trimmed)
    }
}
