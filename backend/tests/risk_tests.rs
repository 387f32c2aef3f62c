//! Risk scoring integration tests
//!
//! Covers the composite risk score:
//! - category and overall bounds
//! - overall equals the weighted category sum
//! - monotonicity of each category in its driving measurement
//! - the no-data and all-calm scenarios

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{ForecastEntry, Observation, RiskCategory, RiskLevel, RiskScorer};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
}

fn calm(hour: i64) -> Observation {
    Observation {
        location: "Manila".to_string(),
        temperature: 27.0,
        humidity: 65.0,
        pressure: 1012.0,
        wind_speed: 8.0,
        wind_direction: 90.0,
        visibility: Some(10.0),
        condition: "Clear".to_string(),
        rainfall_mm: None,
        timestamp: epoch() + Duration::hours(hour),
    }
}

fn forecast(hour: i64, precipitation: f64) -> ForecastEntry {
    ForecastEntry {
        timestamp: epoch() + Duration::hours(hour),
        temperature: Some(28.0),
        humidity: Some(70.0),
        pressure: Some(1010.0),
        wind_speed: Some(12.0),
        condition: Some("Cloudy".to_string()),
        precipitation_probability: Some(precipitation),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// No observations and no forecast yields the unavailable score
    #[test]
    fn test_no_data_is_unknown() {
        let score = RiskScorer::new().score(&[], &[]);
        assert_eq!(score.overall_risk, 0.0);
        assert_eq!(score.risk_level, RiskLevel::Unknown);
        assert_eq!(score.confidence, 0.0);
        assert_eq!(
            score.contributing_factors,
            vec!["No data available for analysis".to_string()]
        );
    }

    /// All categories at zero give a minimal overall score
    #[test]
    fn test_calm_conditions_are_minimal() {
        let current: Vec<_> = (0..6).map(calm).collect();
        let score = RiskScorer::new().score(&current, &[]);

        for category in RiskCategory::ALL {
            assert_eq!(score.category_risks.get(category), 0.0);
        }
        assert_eq!(score.overall_risk, 0.0);
        assert_eq!(score.risk_level, RiskLevel::Minimal);
        assert_eq!(score.risk_level.as_str(), "MINIMAL");
        assert_eq!(score.confidence, 0.85);
    }

    /// Forecast precipitation alone drives the flood category
    #[test]
    fn test_forecast_precipitation_raises_flooding() {
        let current: Vec<_> = (0..3).map(calm).collect();
        let dry = RiskScorer::new().score(&current, &[forecast(3, 10.0)]);
        let wet = RiskScorer::new().score(&current, &[forecast(3, 95.0)]);

        assert_eq!(dry.category_risks.flooding, 0.0);
        assert!(wet.category_risks.flooding > dry.category_risks.flooding);
        assert!(wet.overall_risk > dry.overall_risk);
    }

    /// Recommendations never repeat
    #[test]
    fn test_recommendations_are_unique() {
        let current: Vec<_> = (0..4)
            .map(|h| {
                let mut o = calm(h);
                o.wind_speed = 130.0;
                o.pressure = 1010.0 - 30.0 * h as f64;
                o.humidity = 96.0;
                o.temperature = 43.0;
                o.condition = "Thunderstorm".to_string();
                o
            })
            .collect();
        let score = RiskScorer::new().score(&current, &[forecast(5, 95.0)]);

        let mut seen = std::collections::HashSet::new();
        for line in &score.recommendations {
            assert!(seen.insert(line.clone()), "duplicate recommendation: {}", line);
        }
        assert!(!score.recommendations.is_empty());
        assert_eq!(score.category_risks.typhoon, 0.7);
        assert_eq!(score.risk_level, RiskLevel::Moderate);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn observation_strategy() -> impl Strategy<Value = Observation> {
        (
            -10.0f64..50.0,
            0.0f64..100.0,
            950.0f64..1030.0,
            0.0f64..200.0,
            prop::option::of(0.0f64..20.0),
            prop::sample::select(vec!["Clear", "Rain", "Thunderstorm", "Severe", "Cloudy"]),
        )
            .prop_map(|(temperature, humidity, pressure, wind_speed, visibility, condition)| {
                let mut o = calm(0);
                o.temperature = temperature;
                o.humidity = humidity;
                o.pressure = pressure;
                o.wind_speed = wind_speed;
                o.visibility = visibility;
                o.condition = condition.to_string();
                o
            })
    }

    fn window_strategy() -> impl Strategy<Value = Vec<Observation>> {
        prop::collection::vec(observation_strategy(), 1..12).prop_map(|mut observations| {
            for (i, o) in observations.iter_mut().enumerate() {
                o.timestamp = epoch() + Duration::hours(i as i64);
            }
            observations
        })
    }

    fn forecast_strategy() -> impl Strategy<Value = Vec<ForecastEntry>> {
        prop::collection::vec(0.0f64..100.0, 0..6).prop_map(|probabilities| {
            probabilities
                .into_iter()
                .enumerate()
                .map(|(i, p)| forecast(24 + i as i64, p))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every category and the overall score stay within [0, 1]
        #[test]
        fn prop_scores_are_bounded(current in window_strategy(), forecast in forecast_strategy()) {
            let score = RiskScorer::new().score(&current, &forecast);
            for category in RiskCategory::ALL {
                let value = score.category_risks.get(category);
                prop_assert!((0.0..=1.0).contains(&value));
            }
            prop_assert!((0.0..=1.0).contains(&score.overall_risk));
        }

        /// Overall is the 0.4/0.3/0.2/0.1 weighted category sum
        #[test]
        fn prop_overall_is_weighted_sum(current in window_strategy(), forecast in forecast_strategy()) {
            let score = RiskScorer::new().score(&current, &forecast);
            let c = score.category_risks;
            let expected = 0.4 * c.typhoon + 0.3 * c.flooding + 0.2 * c.heat_stress + 0.1 * c.general_weather;
            prop_assert!((score.overall_risk - expected).abs() < 1e-6);
            prop_assert_eq!(score.risk_level, RiskLevel::from_score(score.overall_risk));
        }

        /// Stronger wind never lowers the typhoon category
        #[test]
        fn prop_wind_is_monotone(base in observation_strategy(), extra in 0.0f64..150.0) {
            let mut stronger = base.clone();
            stronger.wind_speed += extra;
            let low = RiskScorer::new().score(&[base], &[]);
            let high = RiskScorer::new().score(&[stronger], &[]);
            prop_assert!(high.category_risks.typhoon >= low.category_risks.typhoon);
        }

        /// Hotter air never lowers the heat category
        #[test]
        fn prop_temperature_is_monotone(base in observation_strategy(), extra in 0.0f64..20.0) {
            let mut hotter = base.clone();
            hotter.temperature += extra;
            let low = RiskScorer::new().score(&[base], &[]);
            let high = RiskScorer::new().score(&[hotter], &[]);
            prop_assert!(high.category_risks.heat_stress >= low.category_risks.heat_stress);
        }

        /// Higher precipitation probability never lowers the flood category
        #[test]
        fn prop_precipitation_is_monotone(base in observation_strategy(), p in 0.0f64..100.0, extra in 0.0f64..100.0) {
            let low = RiskScorer::new().score(&[base.clone()], &[forecast(24, p)]);
            let high = RiskScorer::new().score(&[base], &[forecast(24, (p + extra).min(100.0))]);
            prop_assert!(high.category_risks.flooding >= low.category_risks.flooding);
        }

        /// Identical input gives identical output
        #[test]
        fn prop_scoring_is_idempotent(current in window_strategy(), forecast in forecast_strategy()) {
            let first = RiskScorer::new().score(&current, &forecast);
            let second = RiskScorer::new().score(&current, &forecast);
            prop_assert_eq!(first, second);
        }
    }
}
