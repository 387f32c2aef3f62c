//! WebAssembly module for WeatherWise
//!
//! Provides client-side computation for dashboards:
//! - Heat index and storm warning signal estimates
//! - Risk scoring from observations and forecasts
//! - Pattern detection over an observation window
//! - Offline observation validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::analysis::hazard;
use shared::{PatternAnalyzer, RiskScorer};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("WeatherWise WASM module loaded"));
}

/// Apparent temperature in °C, rounded to one decimal
#[wasm_bindgen]
pub fn calculate_heat_index(temperature_c: f64, humidity: f64) -> f64 {
    round_to(hazard::heat_index(temperature_c, humidity), 1)
}

/// Storm warning signal label for a sustained wind speed in km/h
#[wasm_bindgen]
pub fn estimate_warning_signal(wind_speed: f64) -> String {
    hazard::estimate_warning_signal(wind_speed).to_string()
}

/// Health risk label for a heat index in °C
#[wasm_bindgen]
pub fn classify_heat_health_risk(heat_index: f64) -> String {
    hazard::health_risk_level(heat_index).to_string()
}

/// Risk level label for an overall score in [0, 1]
#[wasm_bindgen]
pub fn classify_risk_level(score: f64) -> String {
    RiskLevel::from_score(score).to_string()
}

/// Score risk from JSON arrays of observations and forecast entries
///
/// Returns the RiskScore as JSON.
#[wasm_bindgen]
pub fn score_risk(observations_json: &str, forecast_json: &str) -> Result<String, JsValue> {
    score_risk_json(observations_json, forecast_json).map_err(|e| JsValue::from_str(&e))
}

/// Detect patterns in a JSON array of observations
///
/// Returns the detected patterns as a JSON array.
#[wasm_bindgen]
pub fn analyze_patterns(observations_json: &str) -> Result<String, JsValue> {
    analyze_patterns_json(observations_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate one observation; returns `{valid, errors, warnings}` as JSON
#[wasm_bindgen]
pub fn validate_observation(observation_json: &str) -> Result<String, JsValue> {
    validate_observation_json(observation_json).map_err(|e| JsValue::from_str(&e))
}

fn score_risk_json(observations_json: &str, forecast_json: &str) -> Result<String, String> {
    let current: Vec<Observation> = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;
    let forecast: Vec<ForecastEntry> = serde_json::from_str(forecast_json)
        .map_err(|e| format!("Invalid forecast JSON: {}", e))?;

    let score = RiskScorer::new().score(&current, &forecast);
    serde_json::to_string(&score).map_err(|e| e.to_string())
}

fn analyze_patterns_json(observations_json: &str) -> Result<String, String> {
    let window: ObservationWindow = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;

    let patterns = PatternAnalyzer::new().analyze(&window);
    serde_json::to_string(&patterns).map_err(|e| e.to_string())
}

fn validate_observation_json(observation_json: &str) -> Result<String, String> {
    let observation: Observation = serde_json::from_str(observation_json)
        .map_err(|e| format!("Invalid observation JSON: {}", e))?;

    let outcome = shared::validate_observation(&observation);
    let body = serde_json::json!({
        "valid": outcome.is_valid(),
        "errors": outcome.errors,
        "warnings": outcome.warnings,
    });
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation_json(hour: u32, pressure: f64, wind: f64) -> serde_json::Value {
        serde_json::json!({
            "location": "Manila",
            "temperature": 29.0,
            "humidity": 75.0,
            "pressure": pressure,
            "wind_speed": wind,
            "wind_direction": 180.0,
            "condition": "Cloudy",
            "timestamp": format!("2024-09-01T{:02}:00:00Z", hour),
        })
    }

    #[test]
    fn test_heat_index_below_regression_range() {
        assert_eq!(calculate_heat_index(25.0, 60.0), 25.0);
        assert!(calculate_heat_index(35.0, 70.0) > 35.0);
    }

    #[test]
    fn test_warning_signal_labels() {
        assert_eq!(estimate_warning_signal(20.0), "No Signal");
        assert_eq!(estimate_warning_signal(100.0), "Signal #3");
        assert_eq!(estimate_warning_signal(200.0), "Signal #5");
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!(classify_risk_level(0.0), "MINIMAL");
        assert_eq!(classify_risk_level(0.45), "MODERATE");
        assert_eq!(classify_risk_level(0.85), "CRITICAL");
        assert_eq!(classify_heat_health_risk(41.0), "Extreme Caution");
    }

    #[test]
    fn test_score_risk_round_trip() {
        let observations = serde_json::json!([observation_json(0, 1010.0, 130.0)]).to_string();
        let json = score_risk_json(&observations, "[]").unwrap();
        let score: RiskScore = serde_json::from_str(&json).unwrap();
        assert_eq!(score.category_risks.typhoon, 0.4);
        assert_eq!(score.confidence, 0.85);
    }

    #[test]
    fn test_score_risk_rejects_bad_json() {
        let err = score_risk_json("not json", "[]").unwrap_err();
        assert!(err.starts_with("Invalid observations JSON"));
    }

    #[test]
    fn test_patterns_need_five_observations() {
        let four: Vec<_> = (0..4).map(|h| observation_json(h, 1010.0, 10.0)).collect();
        let json = analyze_patterns_json(&serde_json::Value::from(four).to_string()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_validate_observation_flags_pressure() {
        let json = validate_observation_json(&observation_json(0, 700.0, 10.0).to_string()).unwrap();
        let body: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(body["valid"], false);
        assert!(body["errors"][0].as_str().unwrap().starts_with("pressure"));
    }
}
