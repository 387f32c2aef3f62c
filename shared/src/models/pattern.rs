//! Weather pattern models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::HazardLevel;

/// Qualitative meteorological pattern kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    RapidPressureDrop,
    HeatStress,
    HighHumidity,
    StrongWinds,
    ModerateWinds,
    StormDevelopment,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::RapidPressureDrop => "rapid_pressure_drop",
            PatternType::HeatStress => "heat_stress",
            PatternType::HighHumidity => "high_humidity",
            PatternType::StrongWinds => "strong_winds",
            PatternType::ModerateWinds => "moderate_winds",
            PatternType::StormDevelopment => "storm_development",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How soon a pattern is expected to matter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternTimeline {
    Immediate,
    Current,
    ShortTerm,
    Developing,
}

/// A detected weather pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPattern {
    pub pattern_type: PatternType,
    /// 0-1
    pub confidence: f64,
    pub description: String,
    pub risk_level: HazardLevel,
    pub indicators: BTreeMap<String, f64>,
    pub timeline: PatternTimeline,
}
