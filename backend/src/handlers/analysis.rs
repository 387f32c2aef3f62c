//! HTTP handlers for the batch weather analyses

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{
    validate_days, validate_forecast_hours, validate_location, AnomalyResult, RiskScore,
    TrendOutcome, WeatherPattern,
};

use crate::error::{AppError, AppResult};
use crate::services::WeatherAnalysisService;
use crate::AppState;

/// Query parameters for window-based analyses
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// Query parameters for risk scoring
#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    pub forecast_hours: Option<u32>,
}

/// Analysis result tagged with its location
#[derive(Debug, Serialize)]
pub struct AnalysisResponse<T> {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub result: T,
}

fn service(state: &AppState) -> WeatherAnalysisService {
    WeatherAnalysisService::new(state.weather_store.clone(), state.config.analysis.clone())
}

fn location(raw: &str) -> AppResult<String> {
    if raw.trim().is_empty() {
        return Err(AppError::MissingLocation);
    }
    validate_location(raw)
        .map(str::to_string)
        .map_err(|msg| AppError::validation("location", msg))
}

fn days(days: Option<u32>) -> AppResult<Option<u32>> {
    days.map(validate_days)
        .transpose()
        .map_err(|msg| AppError::validation("days", msg))
}

/// Detect weather patterns for a location
pub async fn get_patterns(
    State(state): State<AppState>,
    Path(raw_location): Path<String>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<AnalysisResponse<Vec<WeatherPattern>>>> {
    let location = location(&raw_location)?;
    let patterns = service(&state)
        .analyze_patterns(&location, days(query.days)?)
        .await?;
    Ok(Json(AnalysisResponse {
        location,
        count: Some(patterns.len()),
        result: patterns,
    }))
}

/// Detect anomalies for a location
pub async fn get_anomalies(
    State(state): State<AppState>,
    Path(raw_location): Path<String>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<AnalysisResponse<Vec<AnomalyResult>>>> {
    let location = location(&raw_location)?;
    let anomalies = service(&state)
        .detect_anomalies(&location, days(query.days)?)
        .await?;
    Ok(Json(AnalysisResponse {
        location,
        count: Some(anomalies.len()),
        result: anomalies,
    }))
}

/// Trend report for a location
pub async fn get_trends(
    State(state): State<AppState>,
    Path(raw_location): Path<String>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<AnalysisResponse<TrendOutcome>>> {
    let location = location(&raw_location)?;
    let trends = service(&state)
        .analyze_trends(&location, days(query.days)?)
        .await?;
    Ok(Json(AnalysisResponse {
        location,
        count: None,
        result: trends,
    }))
}

/// Composite risk score for a location
pub async fn get_risk(
    State(state): State<AppState>,
    Path(raw_location): Path<String>,
    Query(query): Query<RiskQuery>,
) -> AppResult<Json<AnalysisResponse<RiskScore>>> {
    let location = location(&raw_location)?;
    let hours = query
        .forecast_hours
        .map(validate_forecast_hours)
        .transpose()
        .map_err(|msg| AppError::validation("forecast_hours", msg))?;
    let risk = service(&state).calculate_risk(&location, hours).await?;
    Ok(Json(AnalysisResponse {
        location,
        count: None,
        result: risk,
    }))
}
