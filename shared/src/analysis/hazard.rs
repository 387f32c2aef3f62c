//! Threshold evaluators for the real-time hazard checks
//!
//! Each evaluator is a pure function of one observation, the loaded
//! thresholds and the external rainfall signal. Dispatch is a closed match
//! over [`HazardKind`].

use serde_json::{json, Map, Value};

use crate::models::{AlertThresholds, HazardAssessment, HazardKind, Observation};
use crate::types::{round_to, AlertSeverity};

/// Standard sea-level pressure the typhoon pressure drop is measured from, hPa
pub const BASELINE_PRESSURE_HPA: f64 = 1013.25;

pub const FLOOD_CRITICAL_SCORE: f64 = 0.7;
pub const FLOOD_WARNING_SCORE: f64 = 0.5;

/// Run one hazard check
pub fn evaluate(
    kind: HazardKind,
    observation: &Observation,
    thresholds: &AlertThresholds,
    recent_rainfall_mm: f64,
) -> Option<HazardAssessment> {
    match kind {
        HazardKind::Typhoon => evaluate_typhoon(observation, thresholds),
        HazardKind::Heat => evaluate_heat(observation, thresholds),
        HazardKind::Flood => evaluate_flood(observation, thresholds, recent_rainfall_mm),
    }
}

/// Run every hazard check in [`HazardKind::ALL`] order
pub fn evaluate_all(
    observation: &Observation,
    thresholds: &AlertThresholds,
    recent_rainfall_mm: f64,
) -> Vec<HazardAssessment> {
    HazardKind::ALL
        .iter()
        .filter_map(|kind| evaluate(*kind, observation, thresholds, recent_rainfall_mm))
        .collect()
}

fn evaluate_typhoon(obs: &Observation, thresholds: &AlertThresholds) -> Option<HazardAssessment> {
    let ladders = &thresholds.typhoon;
    let wind_speed = obs.wind_speed;
    let pressure_drop = BASELINE_PRESSURE_HPA - obs.pressure;

    let wind_severity = ladders.wind_speed.classify(wind_speed);
    let drop_severity = ladders.pressure_drop.classify(pressure_drop);

    let mut conditions = Vec::new();
    match wind_severity {
        Some(AlertSeverity::Emergency) => conditions.push(format!("Extreme winds: {} km/h", wind_speed)),
        Some(AlertSeverity::Critical) => {
            conditions.push(format!("Very strong winds: {} km/h", wind_speed))
        }
        Some(_) => conditions.push(format!("Strong winds: {} km/h", wind_speed)),
        None => {}
    }
    match drop_severity {
        Some(AlertSeverity::Emergency) => {
            conditions.push(format!("Extreme pressure drop: {:.1} hPa", pressure_drop))
        }
        Some(AlertSeverity::Critical) => {
            conditions.push(format!("Significant pressure drop: {:.1} hPa", pressure_drop))
        }
        Some(_) => conditions.push(format!("Pressure drop detected: {:.1} hPa", pressure_drop)),
        None => {}
    }

    let severity = wind_severity.max(drop_severity)?;

    let mut data = Map::new();
    data.insert("wind_speed".into(), json!(wind_speed));
    data.insert("pressure".into(), json!(obs.pressure));
    data.insert("pressure_drop".into(), json!(round_to(pressure_drop, 2)));
    data.insert("conditions".into(), json!(conditions.join("; ")));
    data.insert("recommendations".into(), json!(typhoon_recommendations(severity)));
    data.insert("warning_signal".into(), json!(estimate_warning_signal(wind_speed)));

    Some(HazardAssessment {
        kind: HazardKind::Typhoon,
        severity,
        data,
    })
}

fn evaluate_heat(obs: &Observation, thresholds: &AlertThresholds) -> Option<HazardAssessment> {
    let index = heat_index(obs.temperature, obs.humidity);

    let severity = thresholds
        .heat
        .heat_index
        .classify(index)
        .max(thresholds.heat.temperature.classify(obs.temperature))?;

    let mut data = Map::new();
    data.insert("temperature".into(), json!(obs.temperature));
    data.insert("humidity".into(), json!(obs.humidity));
    data.insert("heat_index".into(), json!(round_to(index, 1)));
    data.insert(
        "conditions".into(),
        json!(format!("Dangerous heat conditions - Heat Index: {:.1}°C", index)),
    );
    data.insert("recommendations".into(), json!(heat_recommendations(severity)));
    data.insert("health_risk".into(), json!(health_risk_level(index)));

    Some(HazardAssessment {
        kind: HazardKind::Heat,
        severity,
        data,
    })
}

fn evaluate_flood(
    obs: &Observation,
    thresholds: &AlertThresholds,
    recent_rainfall_mm: f64,
) -> Option<HazardAssessment> {
    let humidity_ladder = &thresholds.flooding.humidity;
    let mut score = 0.0;
    let mut risk_factors = Vec::new();

    if obs.humidity > humidity_ladder.critical {
        score += 0.4;
        risk_factors.push(format!("Very high humidity: {}%", obs.humidity));
    } else if obs.humidity > humidity_ladder.warning {
        score += 0.2;
        risk_factors.push(format!("High humidity: {}%", obs.humidity));
    }

    if obs.pressure < 995.0 {
        score += 0.3;
        risk_factors.push(format!("Low pressure: {} hPa", obs.pressure));
    } else if obs.pressure < 1005.0 {
        score += 0.1;
        risk_factors.push(format!("Below normal pressure: {} hPa", obs.pressure));
    }

    if obs.temperature > 30.0 && obs.humidity > 80.0 {
        score += 0.2;
        risk_factors.push("Warm, humid conditions".to_string());
    }

    if recent_rainfall_mm > 50.0 {
        score += 0.4;
        risk_factors.push(format!("Recent heavy rainfall: {}mm", recent_rainfall_mm));
    }

    let score = round_to(score, 2);
    let severity = if score >= FLOOD_CRITICAL_SCORE {
        AlertSeverity::Critical
    } else if score >= FLOOD_WARNING_SCORE {
        AlertSeverity::Warning
    } else {
        return None;
    };

    let mut data = Map::new();
    data.insert("flood_risk_score".into(), json!(score));
    data.insert("risk_factors".into(), json!(risk_factors));
    data.insert("recent_rainfall".into(), json!(recent_rainfall_mm));
    data.insert(
        "conditions".into(),
        json!(format!("Flood risk detected - Score: {:.1}", score)),
    );
    data.insert("recommendations".into(), json!(flood_recommendations(severity)));

    Some(HazardAssessment {
        kind: HazardKind::Flood,
        severity,
        data,
    })
}

/// Apparent temperature in °C (Rothfusz regression)
///
/// Below 80°F the regression is not valid and the air temperature is
/// returned unchanged, which leaves a small discontinuity near 26.7°C.
pub fn heat_index(temperature_c: f64, humidity: f64) -> f64 {
    let t = temperature_c * 9.0 / 5.0 + 32.0;
    if t < 80.0 {
        return temperature_c;
    }
    let rh = humidity;

    let hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 6.837_83e-3 * t * t
        - 5.481_717e-2 * rh * rh
        + 1.228_74e-3 * t * t * rh
        + 8.528_2e-4 * t * rh * rh
        - 1.99e-6 * t * t * rh * rh;

    (hi - 32.0) * 5.0 / 9.0
}

/// Public storm warning signal for a sustained wind speed in km/h
pub fn estimate_warning_signal(wind_speed: f64) -> &'static str {
    match wind_speed {
        w if w >= 185.0 => "Signal #5",
        w if w >= 118.0 => "Signal #4",
        w if w >= 89.0 => "Signal #3",
        w if w >= 62.0 => "Signal #2",
        w if w >= 39.0 => "Signal #1",
        _ => "No Signal",
    }
}

pub fn health_risk_level(heat_index: f64) -> &'static str {
    match heat_index {
        h if h >= 54.0 => "Extreme Danger",
        h if h >= 52.0 => "Danger",
        h if h >= 40.0 => "Extreme Caution",
        h if h >= 32.0 => "Caution",
        _ => "Normal",
    }
}

fn with_base(base: &[&str], extra: &[&str]) -> Vec<String> {
    base.iter().chain(extra).map(|s| s.to_string()).collect()
}

pub fn typhoon_recommendations(severity: AlertSeverity) -> Vec<String> {
    let base = [
        "Monitor PAGASA updates continuously",
        "Secure loose objects outdoors",
        "Check emergency supplies (food, water, flashlight)",
    ];
    let extra: &[&str] = match severity {
        AlertSeverity::Emergency => &[
            "IMMEDIATE EVACUATION REQUIRED for danger zones",
            "Activate all emergency protocols",
            "Deploy rescue teams to standby positions",
            "Suspend all transportation services",
        ],
        AlertSeverity::Critical => &[
            "Evacuate coastal and low-lying areas",
            "Activate emergency response teams",
            "Prepare for extended power outages",
            "Cancel outdoor activities and classes",
        ],
        AlertSeverity::Warning => &[
            "Prepare evacuation plans",
            "Monitor local government announcements",
            "Avoid unnecessary travel",
        ],
        AlertSeverity::Info => &[],
    };
    with_base(&base, extra)
}

pub fn heat_recommendations(severity: AlertSeverity) -> Vec<String> {
    let base = [
        "Stay hydrated with plenty of water",
        "Avoid outdoor activities during peak hours (10 AM - 4 PM)",
        "Wear light-colored, loose-fitting clothing",
    ];
    let extra: &[&str] = match severity {
        AlertSeverity::Critical | AlertSeverity::Emergency => &[
            "Open emergency cooling centers",
            "Check on elderly and vulnerable populations",
            "Activate heat emergency protocols",
            "Seek immediate medical attention for heat exhaustion",
        ],
        AlertSeverity::Warning => &[
            "Use cooling centers if available",
            "Take frequent breaks in shade/AC",
            "Monitor for signs of heat exhaustion",
        ],
        AlertSeverity::Info => &[],
    };
    with_base(&base, extra)
}

pub fn flood_recommendations(severity: AlertSeverity) -> Vec<String> {
    let base = [
        "Avoid low-lying and flood-prone areas",
        "Do not drive through flooded roads",
        "Monitor water levels closely",
    ];
    let extra: &[&str] = if severity >= AlertSeverity::Critical {
        &[
            "Evacuate flood-prone areas immediately",
            "Move to higher ground",
            "Prepare emergency supplies",
            "Contact local emergency services if stranded",
        ]
    } else {
        &[
            "Prepare evacuation routes",
            "Check drainage systems",
            "Monitor rainfall updates",
        ]
    };
    with_base(&base, extra)
}

/// Convenience accessor for string fields of an assessment's data
pub fn data_str<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}
