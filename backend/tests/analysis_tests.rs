//! Batch analysis integration tests
//!
//! Tests for pattern, anomaly and trend analysis including:
//! - minimum sample boundaries
//! - the temperature spike scenario through the analysis service
//! - degraded store behaviour
//! - expected-range ordering, deduplication and idempotence properties

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::analysis::anomaly::deduplicate;
use shared::{
    AnomalyDetector, AnomalyResult, HazardLevel, Observation, ObservationWindow, PatternAnalyzer,
    RiskLevel, TrendAnalyzer, TrendOutcome,
};
use weatherwise_backend::config::AnalysisConfig;
use weatherwise_backend::services::WeatherAnalysisService;
use weatherwise_backend::store::InMemoryStore;
use weatherwise_backend::AppError;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
}

fn observation(hour: i64) -> Observation {
    Observation {
        location: "Manila".to_string(),
        temperature: 25.0,
        humidity: 60.0,
        pressure: 1012.0,
        wind_speed: 10.0,
        wind_direction: 90.0,
        visibility: Some(10.0),
        condition: "Clear".to_string(),
        rainfall_mm: None,
        timestamp: epoch() + Duration::hours(hour),
    }
}

fn window(start: i64, n: usize, mut customize: impl FnMut(usize, &mut Observation)) -> Vec<Observation> {
    (0..n)
        .map(|i| {
            let mut o = observation(start + i as i64);
            customize(i, &mut o);
            o
        })
        .collect()
}

/// Store holding a quiet baseline a week back and a temperature spike now
async fn spike_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::anchored_at(epoch() + Duration::hours(5)));
    store
        .insert_observations(window(-200, 20, |i, o| {
            o.temperature = if i % 2 == 0 { 24.5 } else { 25.5 };
        }))
        .await;
    let temps = [25.0, 25.0, 25.0, 25.0, 25.0, 50.0];
    store
        .insert_observations(window(0, 6, |i, o| o.temperature = temps[i]))
        .await;
    store
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Four observations are below the pattern minimum
    #[test]
    fn test_four_observations_yield_no_patterns() {
        let stormy = ObservationWindow::new(window(0, 4, |i, o| {
            o.pressure = 1010.0 - 10.0 * i as f64;
            o.wind_speed = 80.0;
            o.humidity = 95.0;
        }));
        assert!(PatternAnalyzer::new().analyze(&stormy).is_empty());
    }

    /// Five uniform observations have zero spread and raise nothing
    #[test]
    fn test_five_uniform_observations_yield_no_anomalies() {
        let recent = ObservationWindow::new(window(0, 5, |_, _| {}));
        let baseline = ObservationWindow::new(window(-100, 12, |_, _| {}));
        assert!(AnomalyDetector::new().detect(&recent, &baseline).is_empty());
    }

    /// Six observations are below the trend minimum
    #[test]
    fn test_short_window_has_insufficient_trend_data() {
        let short = ObservationWindow::new(window(0, 6, |_, _| {}));
        match TrendAnalyzer::new().analyze(&short) {
            TrendOutcome::InsufficientData {
                required,
                available,
                ..
            } => {
                assert_eq!(required, 7);
                assert_eq!(available, 6);
            }
            TrendOutcome::Complete(_) => panic!("expected insufficient data"),
        }
    }

    /// A 50°C reading against a 25°C baseline is a high temperature outlier
    #[tokio::test]
    async fn test_service_flags_temperature_spike() {
        let store = spike_store().await;
        let service = WeatherAnalysisService::new(store, AnalysisConfig::default());

        let anomalies = service.detect_anomalies("Manila", Some(3)).await.unwrap();
        let outlier = anomalies
            .iter()
            .find(|a| a.anomaly_type == "temperature_outlier")
            .expect("temperature outlier");
        assert_eq!(outlier.severity, HazardLevel::High);
        assert_eq!(outlier.value, 50.0);
    }

    /// Blank locations are rejected before any store access
    #[tokio::test]
    async fn test_service_requires_location() {
        let service = WeatherAnalysisService::new(
            Arc::new(InMemoryStore::new()),
            AnalysisConfig::default(),
        );
        assert!(matches!(
            service.analyze_patterns("  ", None).await,
            Err(AppError::MissingLocation)
        ));
        assert!(matches!(
            service.calculate_risk("", Some(24)).await,
            Err(AppError::MissingLocation)
        ));
    }

    /// A failing store degrades to empty input, never to an error
    #[tokio::test]
    async fn test_store_failure_degrades_to_empty_results() {
        let store = spike_store().await;
        store.set_fail_reads(true);
        let service = WeatherAnalysisService::new(store, AnalysisConfig::default());

        assert!(service.analyze_patterns("Manila", None).await.unwrap().is_empty());
        assert!(service.detect_anomalies("Manila", None).await.unwrap().is_empty());
        assert!(service
            .analyze_trends("Manila", None)
            .await
            .unwrap()
            .report()
            .is_none());
        let risk = service.calculate_risk("Manila", None).await.unwrap();
        assert_eq!(risk.risk_level, RiskLevel::Unknown);
    }

    /// Risk uses the last day of observations
    #[tokio::test]
    async fn test_service_scores_recent_heat() {
        let store = spike_store().await;
        let service = WeatherAnalysisService::new(store, AnalysisConfig::default());

        let risk = service.calculate_risk("Manila", Some(24)).await.unwrap();
        assert_eq!(risk.category_risks.heat_stress, 0.4);
        assert_eq!(risk.confidence, 0.85);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn reading_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (15.0f64..45.0, 40.0f64..100.0, 960.0f64..1025.0, 0.0f64..120.0)
    }

    fn window_strategy(min: usize, max: usize, start: i64) -> impl Strategy<Value = ObservationWindow> {
        prop::collection::vec(reading_strategy(), min..max).prop_map(move |readings| {
            let observations = readings
                .into_iter()
                .enumerate()
                .map(|(i, (temperature, humidity, pressure, wind_speed))| {
                    let mut o = observation(start + i as i64);
                    o.temperature = temperature;
                    o.humidity = humidity;
                    o.pressure = pressure;
                    o.wind_speed = wind_speed;
                    o
                })
                .collect();
            ObservationWindow::new(observations)
        })
    }

    fn candidate_strategy() -> impl Strategy<Value = AnomalyResult> {
        (
            prop::sample::select(vec!["pressure_outlier", "temperature_outlier", "rapid_wind_speed_change"]),
            prop::bool::ANY,
            0.0f64..1.0,
            0i64..600,
        )
            .prop_map(|(kind, high, confidence, minutes)| {
                AnomalyResult::new(
                    kind,
                    if high { HazardLevel::High } else { HazardLevel::Moderate },
                    1.0,
                    (2.0, -2.0),
                    confidence,
                    epoch() + Duration::minutes(minutes),
                    vec![],
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every reported expected range is ordered
        #[test]
        fn prop_expected_range_is_ordered(
            recent in window_strategy(3, 10, 0),
            baseline in window_strategy(10, 30, -100),
        ) {
            for anomaly in AnomalyDetector::new().detect(&recent, &baseline) {
                prop_assert!(anomaly.expected_range.0 <= anomaly.expected_range.1);
                prop_assert!((0.0..=1.0).contains(&anomaly.confidence));
            }
        }

        /// No two surviving anomalies share a type within one hour
        #[test]
        fn prop_deduplicated_anomalies_are_distinct(candidates in prop::collection::vec(candidate_strategy(), 0..30)) {
            let kept = deduplicate(candidates);
            prop_assert!(kept.len() <= 10);
            for (i, a) in kept.iter().enumerate() {
                for b in kept.iter().skip(i + 1) {
                    if a.anomaly_type == b.anomaly_type {
                        prop_assert!((a.timestamp - b.timestamp).num_minutes().abs() >= 60);
                    }
                }
            }
        }

        /// The batch analyzers are deterministic
        #[test]
        fn prop_batch_analyzers_are_idempotent(
            recent in window_strategy(3, 12, 0),
            baseline in window_strategy(10, 20, -100),
        ) {
            prop_assert_eq!(
                PatternAnalyzer::new().analyze(&recent),
                PatternAnalyzer::new().analyze(&recent)
            );
            prop_assert_eq!(
                AnomalyDetector::new().detect(&recent, &baseline),
                AnomalyDetector::new().detect(&recent, &baseline)
            );
            prop_assert_eq!(
                TrendAnalyzer::new().analyze(&recent),
                TrendAnalyzer::new().analyze(&recent)
            );
        }

        /// Windows below the pattern minimum never produce patterns
        #[test]
        fn prop_short_windows_have_no_patterns(short in window_strategy(0, 5, 0)) {
            prop_assert!(PatternAnalyzer::new().analyze(&short).is_empty());
        }
    }
}
