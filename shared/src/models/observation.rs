//! Weather observation and forecast models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::WeatherField;

/// A single weather observation for a named location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    /// Degrees Celsius
    #[validate(range(min = -50.0, max = 60.0, message = "must be within [-50, 60] °C"))]
    pub temperature: f64,
    /// Relative humidity, 0-100 %
    pub humidity: f64,
    /// Sea-level pressure in hPa
    #[validate(range(min = 800.0, max = 1200.0, message = "must be within [800, 1200] hPa"))]
    pub pressure: f64,
    /// km/h
    pub wind_speed: f64,
    /// Degrees from north
    pub wind_direction: f64,
    /// km
    #[serde(default)]
    pub visibility: Option<f64>,
    pub condition: String,
    /// Rain over the preceding hour, mm
    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// One forecast entry; every measurement is optional upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    /// 0-100 %
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
}

/// Time-ordered slice of observations for one location
///
/// Construction sorts by timestamp (stable), so every analyzer can rely on
/// chronological order regardless of how the store returned the rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ObservationWindow(Vec<Observation>);

impl ObservationWindow {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self(observations)
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.0
    }

    /// Values of one field in chronological order
    pub fn values(&self, field: WeatherField) -> Vec<f64> {
        self.0.iter().map(|o| field.value(o)).collect()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.0.last()
    }

    pub fn into_inner(self) -> Vec<Observation> {
        self.0
    }
}

impl From<Vec<Observation>> for ObservationWindow {
    fn from(observations: Vec<Observation>) -> Self {
        Self::new(observations)
    }
}

impl From<ObservationWindow> for Vec<Observation> {
    fn from(window: ObservationWindow) -> Self {
        window.0
    }
}

impl std::ops::Deref for ObservationWindow {
    type Target = [Observation];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
