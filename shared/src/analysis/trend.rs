//! Linear trend analysis over a longer observation window

use crate::analysis::stats;
use crate::models::{
    FieldTrend, ObservationWindow, Stability, TrendAssessment, TrendDirection, TrendOutcome,
    TrendReport, TrendSignificance,
};
use crate::types::{round_to, WeatherField};

pub const MIN_TREND_OBSERVATIONS: usize = 7;

/// Per-field cut points for direction and significance, in units per sample
#[derive(Debug, Clone, Copy)]
struct TrendBands {
    deadband: f64,
    high: f64,
    moderate: f64,
}

impl TrendBands {
    fn for_field(field: WeatherField) -> Self {
        match field {
            WeatherField::Temperature => Self { deadband: 0.1, high: 0.5, moderate: 0.2 },
            WeatherField::Pressure => Self { deadband: 0.1, high: 2.0, moderate: 1.0 },
            WeatherField::Humidity => Self { deadband: 0.5, high: 2.0, moderate: 1.0 },
            WeatherField::WindSpeed => Self { deadband: 0.5, high: 5.0, moderate: 2.0 },
        }
    }

    fn classify(&self, slope: f64) -> FieldTrend {
        let direction = if slope > self.deadband {
            TrendDirection::Increasing
        } else if slope < -self.deadband {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        let magnitude = slope.abs();
        let significance = if magnitude > self.high {
            TrendSignificance::High
        } else if magnitude > self.moderate {
            TrendSignificance::Moderate
        } else {
            TrendSignificance::Low
        };

        FieldTrend {
            direction,
            rate: round_to(slope, 3),
            significance,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, window: &ObservationWindow) -> TrendOutcome {
        if window.len() < MIN_TREND_OBSERVATIONS {
            tracing::warn!(observations = window.len(), "Insufficient data for trend analysis");
            return TrendOutcome::InsufficientData {
                required: MIN_TREND_OBSERVATIONS,
                available: window.len(),
                message: "Insufficient data for trend analysis".to_string(),
            };
        }

        let trend = |field: WeatherField| {
            TrendBands::for_field(field).classify(stats::linear_slope(&window.values(field)))
        };

        let temperature = trend(WeatherField::Temperature);
        let pressure = trend(WeatherField::Pressure);
        let humidity = trend(WeatherField::Humidity);
        let wind_speed = trend(WeatherField::WindSpeed);

        let assessment = assess(&temperature, &pressure, &humidity, &wind_speed);

        TrendOutcome::Complete(TrendReport {
            temperature,
            pressure,
            humidity,
            wind_speed,
            assessment,
        })
    }
}

fn assess(
    temperature: &FieldTrend,
    pressure: &FieldTrend,
    humidity: &FieldTrend,
    wind_speed: &FieldTrend,
) -> TrendAssessment {
    use TrendDirection::*;
    use TrendSignificance::*;

    let mut risk_indicators = Vec::new();

    if pressure.direction == Decreasing && pressure.significance == High {
        risk_indicators.push("Rapid pressure drop indicates potential storm development");
    }
    if wind_speed.direction == Increasing && wind_speed.significance >= Moderate {
        risk_indicators.push("Increasing wind speeds suggest strengthening weather system");
    }
    if temperature.direction == Increasing && temperature.significance == High {
        risk_indicators.push("Rising temperatures increase heat stress risk");
    }
    if humidity.direction == Increasing && humidity.significance >= Moderate {
        risk_indicators.push("Increasing humidity suggests higher precipitation potential");
    }

    let significant_trends_count = [temperature, pressure, humidity, wind_speed]
        .iter()
        .filter(|t| t.significance == High)
        .count();

    let overall_stability = match significant_trends_count {
        n if n >= 3 => Stability::Unstable,
        2 => Stability::Changing,
        _ => Stability::Stable,
    };

    let recommendation = match overall_stability {
        Stability::Unstable => "Enhanced monitoring recommended due to unstable weather patterns",
        Stability::Changing if !risk_indicators.is_empty() => {
            "Monitor weather conditions closely as patterns suggest potential risks"
        }
        _ if !risk_indicators.is_empty() => {
            "Continue routine monitoring with attention to identified risk factors"
        }
        _ => "Weather patterns appear stable, maintain standard monitoring",
    };

    TrendAssessment {
        overall_stability,
        risk_indicators: risk_indicators.into_iter().map(String::from).collect(),
        significant_trends_count,
        recommendation: recommendation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::series;

    #[test]
    fn test_six_points_is_insufficient() {
        let outcome = TrendAnalyzer::new().analyze(&series(6, |_, _| {}));
        assert_eq!(
            outcome,
            TrendOutcome::InsufficientData {
                required: 7,
                available: 6,
                message: "Insufficient data for trend analysis".to_string(),
            }
        );
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_flat_series_is_stable() {
        let outcome = TrendAnalyzer::new().analyze(&series(7, |_, _| {}));
        let report = outcome.report().unwrap();
        for trend in report.field_trends() {
            assert_eq!(trend.direction, TrendDirection::Stable);
            assert_eq!(trend.significance, TrendSignificance::Low);
            assert_eq!(trend.rate, 0.0);
        }
        assert_eq!(report.assessment.overall_stability, Stability::Stable);
        assert_eq!(
            report.assessment.recommendation,
            "Weather patterns appear stable, maintain standard monitoring"
        );
    }

    #[test]
    fn test_falling_pressure_and_rising_wind() {
        let w = series(10, |i, o| {
            o.pressure = 1012.0 - 3.0 * i as f64;
            o.wind_speed = 10.0 + 6.0 * i as f64;
        });
        let outcome = TrendAnalyzer::new().analyze(&w);
        let report = outcome.report().unwrap();

        assert_eq!(report.pressure.direction, TrendDirection::Decreasing);
        assert_eq!(report.pressure.significance, TrendSignificance::High);
        assert_eq!(report.pressure.rate, -3.0);
        assert_eq!(report.wind_speed.significance, TrendSignificance::High);

        let a = &report.assessment;
        assert_eq!(a.significant_trends_count, 2);
        assert_eq!(a.overall_stability, Stability::Changing);
        assert_eq!(
            a.risk_indicators,
            vec![
                "Rapid pressure drop indicates potential storm development".to_string(),
                "Increasing wind speeds suggest strengthening weather system".to_string(),
            ]
        );
        assert_eq!(
            a.recommendation,
            "Monitor weather conditions closely as patterns suggest potential risks"
        );
    }

    #[test]
    fn test_three_high_trends_is_unstable() {
        let w = series(8, |i, o| {
            o.temperature = 25.0 + i as f64;
            o.pressure = 1012.0 - 3.0 * i as f64;
            o.humidity = 50.0 + 3.0 * i as f64;
        });
        let report = TrendAnalyzer::new().analyze(&w).report().cloned().unwrap();
        assert_eq!(report.assessment.significant_trends_count, 3);
        assert_eq!(report.assessment.overall_stability, Stability::Unstable);
    }

    #[test]
    fn test_moderate_humidity_rise_is_flagged() {
        let w = series(7, |i, o| o.humidity = 60.0 + 1.5 * i as f64);
        let report = TrendAnalyzer::new().analyze(&w).report().cloned().unwrap();
        assert_eq!(report.humidity.significance, TrendSignificance::Moderate);
        assert_eq!(report.assessment.overall_stability, Stability::Stable);
        assert_eq!(
            report.assessment.recommendation,
            "Continue routine monitoring with attention to identified risk factors"
        );
    }
}
