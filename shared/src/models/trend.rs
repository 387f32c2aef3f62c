//! Trend analysis models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignificance {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stability {
    Stable,
    Changing,
    Unstable,
}

/// Linear trend of one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldTrend {
    pub direction: TrendDirection,
    /// Slope per sample, rounded to three decimals
    pub rate: f64,
    pub significance: TrendSignificance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
    pub overall_stability: Stability,
    pub risk_indicators: Vec<String>,
    pub significant_trends_count: usize,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub temperature: FieldTrend,
    pub pressure: FieldTrend,
    pub humidity: FieldTrend,
    pub wind_speed: FieldTrend,
    pub assessment: TrendAssessment,
}

impl TrendReport {
    pub fn field_trends(&self) -> [&FieldTrend; 4] {
        [
            &self.temperature,
            &self.pressure,
            &self.humidity,
            &self.wind_speed,
        ]
    }
}

/// Result of a trend analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    InsufficientData {
        required: usize,
        available: usize,
        message: String,
    },
    Complete(TrendReport),
}

impl TrendOutcome {
    pub fn report(&self) -> Option<&TrendReport> {
        match self {
            TrendOutcome::Complete(report) => Some(report),
            TrendOutcome::InsufficientData { .. } => None,
        }
    }
}
