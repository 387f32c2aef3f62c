//! Composite disaster risk scoring from current and forecast data

use crate::analysis::stats;
use crate::models::{CategoryRisks, ForecastEntry, Observation, RiskScore};
use crate::types::{round_to, RiskLevel};

/// Confidence attached to every computed score
pub const RISK_CONFIDENCE: f64 = 0.85;

const SEVERE_CONDITIONS: [&str; 4] = ["Thunderstorm", "Snow", "Tornado", "Severe"];

const WIND_LADDER: [(f64, f64); 4] = [(120.0, 0.4), (90.0, 0.3), (60.0, 0.2), (40.0, 0.1)];
const PRESSURE_DROP_LADDER: [(f64, f64); 3] = [(25.0, 0.3), (15.0, 0.2), (10.0, 0.1)];
const HUMIDITY_LADDER: [(f64, f64); 3] = [(95.0, 0.3), (90.0, 0.2), (80.0, 0.1)];
const PRECIPITATION_LADDER: [(f64, f64); 3] = [(90.0, 0.4), (70.0, 0.3), (50.0, 0.2)];
const TEMPERATURE_LADDER: [(f64, f64); 4] = [(42.0, 0.4), (38.0, 0.3), (35.0, 0.2), (32.0, 0.1)];

/// Points for the first (highest) cut point reached, if any
fn ladder(value: f64, steps: &[(f64, f64)]) -> f64 {
    steps
        .iter()
        .find(|(cut, _)| value >= *cut)
        .map_or(0.0, |(_, points)| *points)
}

/// Measurements merged from current observations and forecast entries,
/// in input order with absent values skipped
#[derive(Debug, Default)]
struct MergedSeries {
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    pressure: Vec<f64>,
    wind_speed: Vec<f64>,
    visibility: Vec<f64>,
    conditions: Vec<String>,
    precipitation: Vec<f64>,
}

impl MergedSeries {
    fn collect(current: &[Observation], forecast: &[ForecastEntry]) -> Self {
        let mut merged = Self::default();

        for obs in current {
            merged.temperature.push(obs.temperature);
            merged.humidity.push(obs.humidity);
            merged.pressure.push(obs.pressure);
            merged.wind_speed.push(obs.wind_speed);
            merged.visibility.extend(obs.visibility);
            merged.conditions.push(obs.condition.clone());
        }

        for entry in forecast {
            merged.temperature.extend(entry.temperature);
            merged.humidity.extend(entry.humidity);
            merged.pressure.extend(entry.pressure);
            merged.wind_speed.extend(entry.wind_speed);
            merged.conditions.extend(entry.condition.clone());
            merged
                .precipitation
                .push(entry.precipitation_probability.unwrap_or(0.0));
        }

        merged
    }

    /// Largest fall between consecutive pressure samples, zero when none fell
    fn max_pressure_drop(&self) -> f64 {
        stats::min(&stats::deltas(&self.pressure)).map_or(0.0, |d| (-d).max(0.0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, current: &[Observation], forecast: &[ForecastEntry]) -> RiskScore {
        if current.is_empty() && forecast.is_empty() {
            tracing::error!("No data available for risk calculation");
            return RiskScore::unavailable();
        }

        let merged = MergedSeries::collect(current, forecast);

        let category_risks = CategoryRisks {
            typhoon: typhoon_risk(&merged),
            flooding: flood_risk(&merged),
            heat_stress: heat_risk(&merged),
            general_weather: general_weather_risk(&merged),
        }
        .normalized();

        let overall_risk = round_to(category_risks.weighted_overall(), 2);

        RiskScore {
            overall_risk,
            category_risks,
            risk_level: RiskLevel::from_score(overall_risk),
            confidence: RISK_CONFIDENCE,
            contributing_factors: contributing_factors(&merged),
            recommendations: recommendations(&category_risks, overall_risk),
        }
    }
}

fn typhoon_risk(m: &MergedSeries) -> f64 {
    let wind = stats::max(&m.wind_speed).map_or(0.0, |w| ladder(w, &WIND_LADDER));
    wind + ladder(m.max_pressure_drop(), &PRESSURE_DROP_LADDER)
}

fn flood_risk(m: &MergedSeries) -> f64 {
    let humidity = stats::mean(&m.humidity).map_or(0.0, |h| ladder(h, &HUMIDITY_LADDER));
    let precipitation =
        stats::max(&m.precipitation).map_or(0.0, |p| ladder(p, &PRECIPITATION_LADDER));
    humidity + precipitation
}

fn heat_risk(m: &MergedSeries) -> f64 {
    stats::max(&m.temperature).map_or(0.0, |t| ladder(t, &TEMPERATURE_LADDER))
}

fn general_weather_risk(m: &MergedSeries) -> f64 {
    let visibility = match stats::min(&m.visibility) {
        Some(v) if v < 2.0 => 0.2,
        Some(v) if v < 5.0 => 0.1,
        _ => 0.0,
    };
    let severe = m
        .conditions
        .iter()
        .any(|c| SEVERE_CONDITIONS.contains(&c.as_str()));

    visibility + if severe { 0.3 } else { 0.0 }
}

fn contributing_factors(m: &MergedSeries) -> Vec<String> {
    let mut factors = Vec::new();

    if let Some(t) = stats::max(&m.temperature).filter(|t| *t > 35.0) {
        factors.push(format!("High temperatures up to {:.1}°C", t));
    }
    if let Some(w) = stats::max(&m.wind_speed).filter(|w| *w > 40.0) {
        factors.push(format!("Strong winds up to {:.1} km/h", w));
    }
    if let (Some(hi), Some(lo)) = (stats::max(&m.pressure), stats::min(&m.pressure)) {
        if hi - lo > 10.0 {
            factors.push(format!("Significant pressure changes ({:.1} hPa)", hi - lo));
        }
    }
    if let Some(h) = stats::max(&m.humidity).filter(|h| *h > 85.0) {
        factors.push(format!("High humidity levels up to {:.0}%", h));
    }

    factors
}

/// Severe list at 0.6 and above, elevated list at 0.4 and above
fn tiered(
    score: f64,
    severe: &'static [&'static str],
    elevated: &'static [&'static str],
) -> &'static [&'static str] {
    if score >= 0.6 {
        severe
    } else if score >= 0.4 {
        elevated
    } else {
        &[]
    }
}

fn recommendations(risks: &CategoryRisks, overall: f64) -> Vec<String> {
    let mut lines: Vec<&str> = Vec::new();

    lines.extend(tiered(
        risks.typhoon,
        &[
            "Activate emergency response teams",
            "Issue typhoon warning signals",
            "Prepare evacuation centers",
            "Secure infrastructure and equipment",
        ],
        &[
            "Monitor typhoon development closely",
            "Prepare emergency supplies",
            "Review evacuation plans",
        ],
    ));
    lines.extend(tiered(
        risks.flooding,
        &[
            "Deploy flood monitoring teams",
            "Prepare sandbags and flood barriers",
            "Alert residents in flood-prone areas",
            "Monitor river levels and dam releases",
        ],
        &[
            "Check drainage systems",
            "Monitor rainfall intensity",
            "Prepare flood emergency kits",
        ],
    ));
    lines.extend(tiered(
        risks.heat_stress,
        &[
            "Issue heat advisory warnings",
            "Open cooling centers",
            "Ensure adequate water supply",
            "Monitor vulnerable populations",
        ],
        &[
            "Advise reduced outdoor activities",
            "Increase hydration reminders",
            "Check air conditioning systems",
        ],
    ));
    if overall >= 0.6 {
        lines.extend([
            "Activate disaster response protocols",
            "Coordinate with all emergency services",
            "Prepare public communication systems",
        ]);
    }

    let mut unique: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if !unique.iter().any(|existing| existing == line) {
            unique.push(line.to_string());
        }
    }
    unique
}
