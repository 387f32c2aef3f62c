//! Validation and cleaning of incoming weather data

use validator::Validate;

use crate::models::{ForecastEntry, Observation};

/// Condition labels reported by the upstream weather provider
pub const KNOWN_CONDITIONS: &[&str] = &[
    "Clear",
    "Clouds",
    "Rain",
    "Drizzle",
    "Thunderstorm",
    "Snow",
    "Mist",
    "Fog",
    "Haze",
    "Smoke",
    "Dust",
    "Sand",
];

/// Typical ranges; values outside are clamped and reported as warnings
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
pub const WIND_SPEED_RANGE: (f64, f64) = (0.0, 200.0);
pub const WIND_DIRECTION_RANGE: (f64, f64) = (0.0, 360.0);
pub const VISIBILITY_RANGE: (f64, f64) = (0.0, 50.0);
pub const PRECIPITATION_PROBABILITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Outcome of validating one observation
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Present only when there are no errors
    pub cleaned: Option<Observation>,
}

impl ObservationValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// Observation Validation
// ============================================================================

/// Validate an observation and produce a cleaned copy
///
/// Temperature and pressure outside their physical ranges, non-finite
/// measurements and a blank location are errors. Other measurements are
/// clamped into their typical range with a warning.
pub fn validate_observation(observation: &Observation) -> ObservationValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = observation.validate() {
        let mut fields: Vec<_> = e.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);
        for (field, field_errors) in fields {
            for err in field_errors {
                let detail = err
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.code.to_string());
                errors.push(format!("{} {}", field, detail));
            }
        }
    }

    let numeric = [
        ("temperature", Some(observation.temperature)),
        ("humidity", Some(observation.humidity)),
        ("pressure", Some(observation.pressure)),
        ("wind_speed", Some(observation.wind_speed)),
        ("wind_direction", Some(observation.wind_direction)),
        ("visibility", observation.visibility),
        ("rainfall_mm", observation.rainfall_mm),
    ];
    for (field, value) in numeric {
        if value.is_some_and(|v| !v.is_finite()) {
            errors.push(format!("{} must be a finite number", field));
        }
    }

    let location = observation.location.trim();
    if location.is_empty() && !errors.iter().any(|e| e.starts_with("location")) {
        errors.push("location is required".to_string());
    }

    if !errors.is_empty() {
        tracing::error!(errors = %errors.join("; "), "Weather data validation failed");
        return ObservationValidation {
            errors,
            warnings,
            cleaned: None,
        };
    }

    let mut cleaned = observation.clone();
    cleaned.location = location.to_string();
    cleaned.humidity = clamp_with_warning("humidity", cleaned.humidity, HUMIDITY_RANGE, &mut warnings);
    cleaned.wind_speed =
        clamp_with_warning("wind_speed", cleaned.wind_speed, WIND_SPEED_RANGE, &mut warnings);
    cleaned.wind_direction = clamp_with_warning(
        "wind_direction",
        cleaned.wind_direction,
        WIND_DIRECTION_RANGE,
        &mut warnings,
    );
    cleaned.visibility = cleaned
        .visibility
        .map(|v| clamp_with_warning("visibility", v, VISIBILITY_RANGE, &mut warnings));
    cleaned.rainfall_mm = cleaned.rainfall_mm.map(|r| r.max(0.0));

    if !KNOWN_CONDITIONS.contains(&cleaned.condition.as_str()) {
        warnings.push(format!("Unusual weather condition: {}", cleaned.condition));
    }

    if !warnings.is_empty() {
        tracing::warn!(warnings = %warnings.join("; "), "Weather data warnings");
    }

    ObservationValidation {
        errors,
        warnings,
        cleaned: Some(cleaned),
    }
}

/// Clamp forecast measurements into their typical ranges
pub fn clean_forecast_entry(entry: &ForecastEntry) -> (ForecastEntry, Vec<String>) {
    let mut warnings = Vec::new();
    let mut cleaned = entry.clone();

    cleaned.humidity = cleaned
        .humidity
        .map(|h| clamp_with_warning("humidity", h, HUMIDITY_RANGE, &mut warnings));
    cleaned.wind_speed = cleaned
        .wind_speed
        .map(|w| clamp_with_warning("wind_speed", w, WIND_SPEED_RANGE, &mut warnings));
    cleaned.precipitation_probability = cleaned.precipitation_probability.map(|p| {
        clamp_with_warning(
            "precipitation_probability",
            p,
            PRECIPITATION_PROBABILITY_RANGE,
            &mut warnings,
        )
    });

    (cleaned, warnings)
}

fn clamp_with_warning(
    field: &str,
    value: f64,
    (min, max): (f64, f64),
    warnings: &mut Vec<String>,
) -> f64 {
    if value < min || value > max {
        warnings.push(format!(
            "Unusual {}: {} outside typical range [{}, {}]",
            field, value, min, max
        ));
        value.clamp(min, max)
    } else {
        value
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Trimmed location name, or an error when blank
pub fn validate_location(location: &str) -> Result<&str, &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location is required");
    }
    if trimmed.len() > 100 {
        return Err("Location must be at most 100 characters");
    }
    Ok(trimmed)
}

/// Span in days for a batch analysis request
pub fn validate_days(days: u32) -> Result<u32, &'static str> {
    if days == 0 || days > 365 {
        return Err("Days must be between 1 and 365");
    }
    Ok(days)
}

/// Forecast horizon in hours
pub fn validate_forecast_hours(hours: u32) -> Result<u32, &'static str> {
    if hours == 0 || hours > 240 {
        return Err("Forecast hours must be between 1 and 240");
    }
    Ok(hours)
}
