//! Anomaly detection of a recent window against a historical baseline

use chrono::Duration;

use crate::analysis::stats::{self, StatsError, Standardizer};
use crate::models::{AnomalyResult, Observation, ObservationWindow};
use crate::types::{HazardLevel, WeatherField};

pub const MIN_RECENT_OBSERVATIONS: usize = 3;
pub const MIN_BASELINE_OBSERVATIONS: usize = 10;

/// Maximum anomalies returned after deduplication
pub const MAX_ANOMALIES: usize = 10;

const Z_SCORE_THRESHOLD: f64 = 2.5;
const Z_SCORE_HIGH: f64 = 3.5;

const DENSITY_EPS: f64 = 0.5;
const DENSITY_MIN_SAMPLES: usize = 3;

/// Fields checked for rapid change, with the largest tolerated step per sample
const RAPID_CHANGE_LIMITS: [(WeatherField, f64); 3] = [
    (WeatherField::Pressure, 15.0),
    (WeatherField::Temperature, 8.0),
    (WeatherField::WindSpeed, 30.0),
];

/// Combines statistical, rapid-change and multivariate passes
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(
        &self,
        recent: &ObservationWindow,
        baseline: &ObservationWindow,
    ) -> Vec<AnomalyResult> {
        if recent.len() < MIN_RECENT_OBSERVATIONS || baseline.len() < MIN_BASELINE_OBSERVATIONS {
            tracing::warn!(
                recent = recent.len(),
                baseline = baseline.len(),
                "Insufficient data for anomaly detection"
            );
            return Vec::new();
        }

        let mut candidates = statistical_outliers(recent, baseline);
        candidates.extend(rapid_changes(recent));

        match multivariate_outliers(recent, baseline) {
            Ok(found) => candidates.extend(found),
            Err(e) => tracing::warn!(error = %e, "Multivariate anomaly detection failed"),
        }

        let anomalies = deduplicate(candidates);
        tracing::info!(anomalies = anomalies.len(), "Detected unique anomalies");
        anomalies
    }
}

fn statistical_outliers(recent: &ObservationWindow, baseline: &ObservationWindow) -> Vec<AnomalyResult> {
    let mut found = Vec::new();

    for field in WeatherField::ALL {
        let history = baseline.values(field);
        let (Some(mean), Some(std)) = (stats::mean(&history), stats::sample_std(&history)) else {
            continue;
        };
        if !(std > 0.0) {
            continue;
        }

        for obs in recent.iter() {
            let value = field.value(obs);
            let z = (value - mean).abs() / std;
            if z <= Z_SCORE_THRESHOLD {
                continue;
            }

            let severity = if z > Z_SCORE_HIGH {
                HazardLevel::High
            } else {
                HazardLevel::Moderate
            };

            found.push(AnomalyResult::new(
                format!("{}_outlier", field),
                severity,
                value,
                (mean - 2.0 * std, mean + 2.0 * std),
                (z / 4.0).min(0.95),
                obs.timestamp,
                risk_implications(field, value, mean),
            ));
        }
    }

    found
}

fn risk_implications(field: WeatherField, value: f64, baseline: f64) -> Vec<String> {
    let lines: &[&str] = match field {
        WeatherField::Temperature if value > baseline + 5.0 => {
            &["Increased heat stress risk", "Higher energy demand for cooling"]
        }
        WeatherField::Temperature if value < baseline - 5.0 => &["Unusual cold conditions"],
        WeatherField::Pressure if value < baseline - 10.0 => {
            &["Possible storm system development", "Increased typhoon risk"]
        }
        WeatherField::Pressure if value > baseline + 10.0 => {
            &["High pressure system", "Stable weather expected"]
        }
        WeatherField::WindSpeed if value > baseline + 20.0 => {
            &["Strong wind conditions", "Potential structural damage risk"]
        }
        WeatherField::Humidity if value > baseline + 15.0 => {
            &["Increased precipitation likelihood", "Higher flood risk potential"]
        }
        _ => &[],
    };
    lines.iter().map(|s| s.to_string()).collect()
}

fn rapid_changes(recent: &ObservationWindow) -> Vec<AnomalyResult> {
    let Some(last) = recent.latest() else {
        return Vec::new();
    };

    RAPID_CHANGE_LIMITS
        .iter()
        .filter_map(|(field, limit)| {
            let largest = stats::max(
                &stats::deltas(&recent.values(*field))
                    .iter()
                    .map(|d| d.abs())
                    .collect::<Vec<_>>(),
            )?;
            (largest > *limit).then(|| {
                AnomalyResult::new(
                    format!("rapid_{}_change", field),
                    HazardLevel::High,
                    largest,
                    (0.0, *limit),
                    0.9,
                    last.timestamp,
                    vec![format!("Rapid {} change indicates unstable conditions", field)],
                )
            })
        })
        .collect()
}

fn feature_row(obs: &Observation) -> Vec<f64> {
    WeatherField::ALL.iter().map(|f| f.value(obs)).collect()
}

/// Recent points that fall outside every dense region of baseline plus recent
fn multivariate_outliers(
    recent: &ObservationWindow,
    baseline: &ObservationWindow,
) -> Result<Vec<AnomalyResult>, StatsError> {
    let baseline_rows: Vec<Vec<f64>> = baseline.iter().map(feature_row).collect();
    let recent_rows: Vec<Vec<f64>> = recent.iter().map(feature_row).collect();

    let scaler = Standardizer::fit(&baseline_rows)?;
    let mut combined = scaler.transform(&baseline_rows)?;
    combined.extend(scaler.transform(&recent_rows)?);

    let noise = stats::density_noise(&combined, DENSITY_EPS, DENSITY_MIN_SAMPLES)?;

    Ok(noise[baseline_rows.len()..]
        .iter()
        .zip(recent.iter())
        .filter(|(is_noise, _)| **is_noise)
        .map(|(_, obs)| {
            AnomalyResult::new(
                "multivariate_anomaly",
                HazardLevel::Moderate,
                0.0,
                (0.0, 1.0),
                0.75,
                obs.timestamp,
                vec!["Unusual combination of weather parameters detected".to_string()],
            )
        })
        .collect())
}

/// Keep the strongest anomaly per (type, hour), strongest first
pub fn deduplicate(mut candidates: Vec<AnomalyResult>) -> Vec<AnomalyResult> {
    candidates.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });

    let window_ms = Duration::hours(1).num_milliseconds();
    let mut kept: Vec<AnomalyResult> = Vec::new();

    for candidate in candidates {
        let duplicate = kept.iter().any(|existing| {
            existing.anomaly_type == candidate.anomaly_type
                && (candidate.timestamp - existing.timestamp)
                    .num_milliseconds()
                    .abs()
                    < window_ms
        });
        if !duplicate {
            kept.push(candidate);
        }
    }

    kept.truncate(MAX_ANOMALIES);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{observation, series, series_from};
    use chrono::Utc;

    fn baseline() -> ObservationWindow {
        series_from(-40, 20, |i, o| {
            o.temperature = if i % 2 == 0 { 24.5 } else { 25.5 };
        })
    }

    #[test]
    fn test_insufficient_windows_return_empty() {
        let detector = AnomalyDetector::new();
        let short_recent = series(2, |_, o| o.temperature = 60.0);
        assert!(detector.detect(&short_recent, &baseline()).is_empty());

        let short_baseline = series_from(-20, 9, |_, _| {});
        assert!(detector.detect(&series(5, |_, _| {}), &short_baseline).is_empty());
    }

    #[test]
    fn test_temperature_spike_is_high_outlier() {
        let temps = [25.0, 25.0, 25.0, 25.0, 25.0, 50.0];
        let recent = series(6, |i, o| o.temperature = temps[i]);
        let anomalies = AnomalyDetector::new().detect(&recent, &baseline());

        let outlier = anomalies
            .iter()
            .find(|a| a.anomaly_type == "temperature_outlier")
            .expect("temperature outlier");
        assert_eq!(outlier.severity, HazardLevel::High);
        assert_eq!(outlier.value, 50.0);
        assert_eq!(outlier.confidence, 0.95);
        assert!(outlier.expected_range.0 <= outlier.expected_range.1);
        assert!(outlier
            .risk_implications
            .contains(&"Increased heat stress risk".to_string()));

        assert!(anomalies
            .iter()
            .any(|a| a.anomaly_type == "rapid_temperature_change" && a.value == 25.0));
        assert!(anomalies.iter().any(|a| a.anomaly_type == "multivariate_anomaly"));
    }

    #[test]
    fn test_uniform_data_has_no_anomalies() {
        let recent = series(5, |_, _| {});
        let flat = series_from(-40, 12, |_, _| {});
        assert!(AnomalyDetector::new().detect(&recent, &flat).is_empty());
    }

    #[test]
    fn test_rapid_change_uses_last_timestamp() {
        let pressures = [1010.0, 1009.0, 990.0];
        let recent = series(3, |i, o| o.pressure = pressures[i]);
        let found = rapid_changes(&recent);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].anomaly_type, "rapid_pressure_change");
        assert_eq!(found[0].expected_range, (0.0, 15.0));
        assert_eq!(found[0].timestamp, recent.latest().unwrap().timestamp);
    }

    #[test]
    fn test_deduplicate_keeps_strongest_per_hour() {
        let ts = Utc::now();
        let make = |severity, confidence, minutes| {
            AnomalyResult::new(
                "pressure_outlier",
                severity,
                1.0,
                (0.0, 1.0),
                confidence,
                ts + Duration::minutes(minutes),
                vec![],
            )
        };

        let kept = deduplicate(vec![
            make(HazardLevel::Moderate, 0.7, 0),
            make(HazardLevel::High, 0.9, 30),
            make(HazardLevel::Moderate, 0.8, 120),
        ]);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].severity, HazardLevel::High);
        assert_eq!(kept[1].confidence, 0.8);
    }

    #[test]
    fn test_deduplicate_caps_results() {
        let candidates: Vec<_> = (0..15)
            .map(|i| {
                let obs = observation(i * 2);
                AnomalyResult::new(
                    "humidity_outlier",
                    HazardLevel::Moderate,
                    90.0,
                    (50.0, 70.0),
                    0.7,
                    obs.timestamp,
                    vec![],
                )
            })
            .collect();
        assert_eq!(deduplicate(candidates).len(), MAX_ANOMALIES);
    }
}
