//! Qualitative weather pattern detection over a short window

use std::collections::BTreeMap;

use crate::analysis::stats;
use crate::models::{ObservationWindow, PatternTimeline, PatternType, WeatherPattern};
use crate::types::{HazardLevel, WeatherField};

/// Observations required before any rule runs
pub const MIN_PATTERN_OBSERVATIONS: usize = 5;

/// Observations required by the sequence-based rules
const MIN_RULE_POINTS: usize = 3;

/// Flags pressure collapse, heat buildup, humidity saturation, wind
/// escalation and composite storm development
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer;

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule; each emits at most one pattern, in rule order
    pub fn analyze(&self, window: &ObservationWindow) -> Vec<WeatherPattern> {
        if window.len() < MIN_PATTERN_OBSERVATIONS {
            tracing::warn!(
                observations = window.len(),
                "Insufficient data for pattern analysis"
            );
            return Vec::new();
        }

        let rules: [fn(&ObservationWindow) -> Option<WeatherPattern>; 5] = [
            pressure_pattern,
            temperature_pattern,
            humidity_pattern,
            wind_pattern,
            storm_development_pattern,
        ];

        let patterns: Vec<WeatherPattern> = rules.iter().filter_map(|rule| rule(window)).collect();
        tracing::info!(patterns = patterns.len(), "Identified weather patterns");
        patterns
    }
}

fn indicators<const N: usize>(pairs: [(&str, f64); N]) -> BTreeMap<String, f64> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn pressure_pattern(window: &ObservationWindow) -> Option<WeatherPattern> {
    if window.len() < MIN_RULE_POINTS {
        return None;
    }
    let max_drop = stats::min(&stats::deltas(&window.values(WeatherField::Pressure)))?;
    if max_drop >= -10.0 {
        return None;
    }

    Some(WeatherPattern {
        pattern_type: PatternType::RapidPressureDrop,
        confidence: 0.9,
        description: format!(
            "Rapid atmospheric pressure drop of {:.1} hPa detected",
            max_drop.abs()
        ),
        risk_level: HazardLevel::High,
        indicators: indicators([("pressure_drop", max_drop.abs())]),
        timeline: PatternTimeline::Immediate,
    })
}

fn temperature_pattern(window: &ObservationWindow) -> Option<WeatherPattern> {
    let temps = window.values(WeatherField::Temperature);
    let avg = stats::mean(&temps)?;
    let max = stats::max(&temps)?;
    if max <= 35.0 && avg <= 32.0 {
        return None;
    }

    Some(WeatherPattern {
        pattern_type: PatternType::HeatStress,
        confidence: 0.8,
        description: format!(
            "Elevated temperatures detected (max: {:.1}°C, avg: {:.1}°C)",
            max, avg
        ),
        risk_level: if max >= 38.0 {
            HazardLevel::High
        } else {
            HazardLevel::Moderate
        },
        indicators: indicators([("max_temp", max), ("avg_temp", avg)]),
        timeline: PatternTimeline::Current,
    })
}

fn humidity_pattern(window: &ObservationWindow) -> Option<WeatherPattern> {
    let avg = stats::mean(&window.values(WeatherField::Humidity))?;
    if avg <= 85.0 {
        return None;
    }

    Some(WeatherPattern {
        pattern_type: PatternType::HighHumidity,
        confidence: 0.7,
        description: format!(
            "Sustained high humidity levels ({:.1}%) indicating potential precipitation",
            avg
        ),
        risk_level: HazardLevel::Moderate,
        indicators: indicators([("avg_humidity", avg)]),
        timeline: PatternTimeline::ShortTerm,
    })
}

fn wind_pattern(window: &ObservationWindow) -> Option<WeatherPattern> {
    let winds = window.values(WeatherField::WindSpeed);
    let max = stats::max(&winds)?;
    let avg = stats::mean(&winds)?;

    if max > 60.0 {
        Some(WeatherPattern {
            pattern_type: PatternType::StrongWinds,
            confidence: 0.95,
            description: format!("Strong winds detected (max: {:.1} km/h)", max),
            risk_level: if max > 120.0 {
                HazardLevel::Critical
            } else {
                HazardLevel::High
            },
            indicators: indicators([("max_wind", max), ("avg_wind", avg)]),
            timeline: PatternTimeline::Immediate,
        })
    } else if max > 40.0 {
        Some(WeatherPattern {
            pattern_type: PatternType::ModerateWinds,
            confidence: 0.8,
            description: format!("Moderate strong winds (max: {:.1} km/h)", max),
            risk_level: HazardLevel::Moderate,
            indicators: indicators([("max_wind", max)]),
            timeline: PatternTimeline::Current,
        })
    } else {
        None
    }
}

fn storm_development_pattern(window: &ObservationWindow) -> Option<WeatherPattern> {
    if window.len() < MIN_RULE_POINTS {
        return None;
    }

    let pressure_drop = stats::min(&stats::deltas(&window.values(WeatherField::Pressure)))?;
    let wind_increase = stats::max(&stats::deltas(&window.values(WeatherField::WindSpeed)))?;
    let avg_humidity = stats::mean(&window.values(WeatherField::Humidity))?;

    let indicator_count = [pressure_drop < -5.0, wind_increase > 10.0, avg_humidity > 80.0]
        .iter()
        .filter(|hit| **hit)
        .count();

    if indicator_count < 2 {
        return None;
    }

    Some(WeatherPattern {
        pattern_type: PatternType::StormDevelopment,
        confidence: 0.85,
        description: "Multiple indicators suggest storm system development".to_string(),
        risk_level: HazardLevel::High,
        indicators: indicators([
            ("pressure_drop", pressure_drop),
            ("wind_increase", wind_increase),
            ("avg_humidity", avg_humidity),
            ("indicator_count", indicator_count as f64),
        ]),
        timeline: PatternTimeline::Developing,
    })
}
