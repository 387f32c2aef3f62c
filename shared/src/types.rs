//! Common types used across the platform

use serde::{Deserialize, Serialize};

use crate::models::Observation;

/// Qualitative level attached to detected patterns and anomalies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl HazardLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardLevel::Low => "LOW",
            HazardLevel::Moderate => "MODERATE",
            HazardLevel::High => "HIGH",
            HazardLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk level of a [`crate::RiskScore`]
///
/// `Unknown` is only produced when no data at all was available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Unknown,
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a weighted overall score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            RiskLevel::Critical
        } else if score >= 0.6 {
            RiskLevel::High
        } else if score >= 0.4 {
            RiskLevel::Moderate
        } else if score >= 0.2 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "UNKNOWN",
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a real-time alert, in ascending order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
    Emergency,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
            AlertSeverity::Emergency => "emergency",
        }
    }

    /// Critical and emergency events are escalated to the emergency workflow
    pub fn requires_escalation(&self) -> bool {
        matches!(self, AlertSeverity::Critical | AlertSeverity::Emergency)
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric observation fields the analyzers work over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherField {
    Temperature,
    Pressure,
    Humidity,
    WindSpeed,
}

impl WeatherField {
    /// Fields checked by the statistical and multivariate passes
    pub const ALL: [WeatherField; 4] = [
        WeatherField::Temperature,
        WeatherField::Pressure,
        WeatherField::Humidity,
        WeatherField::WindSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherField::Temperature => "temperature",
            WeatherField::Pressure => "pressure",
            WeatherField::Humidity => "humidity",
            WeatherField::WindSpeed => "wind_speed",
        }
    }

    pub fn value(&self, observation: &Observation) -> f64 {
        match self {
            WeatherField::Temperature => observation.temperature,
            WeatherField::Pressure => observation.pressure,
            WeatherField::Humidity => observation.humidity,
            WeatherField::WindSpeed => observation.wind_speed,
        }
    }
}

impl std::fmt::Display for WeatherField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a score or confidence into [0, 1]; NaN collapses to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
