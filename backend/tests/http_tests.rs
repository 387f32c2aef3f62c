//! HTTP surface integration tests
//!
//! Drives the axum router in-process against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use weatherwise_backend::external::LoggingEmergencyWorkflow;
use weatherwise_backend::store::InMemoryStore;
use weatherwise_backend::{create_app, AppState, Config};

fn app_with(config: Config) -> Router {
    let state = AppState::in_memory(
        config,
        Arc::new(InMemoryStore::new()),
        Arc::new(LoggingEmergencyWorkflow),
    );
    create_app(state)
}

fn app() -> Router {
    app_with(Config::development())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_without_database() {
        let (status, body) = send(app(), Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "not_configured");
    }

    #[tokio::test]
    async fn test_weather_update_raises_typhoon() {
        let payload = json!({
            "location": "Manila",
            "temperature": 26.0,
            "humidity": 70.0,
            "wind_speed": 100.0,
            "pressure": 980.0,
            "weather_condition": "Storm"
        });
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/v1/realtime/weather-update",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["events_generated"], 1);
        assert_eq!(body["events"][0]["type"], "typhoon_warning");
        assert_eq!(body["events"][0]["severity"], "emergency");
    }

    #[tokio::test]
    async fn test_weather_update_rejects_blank_location() {
        let payload = json!({
            "location": " ",
            "temperature": 26.0,
            "humidity": 70.0,
            "wind_speed": 10.0,
            "pressure": 1010.0,
            "weather_condition": "Clear"
        });
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/v1/realtime/weather-update",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_LOCATION");
        assert_eq!(body["error"]["field"], "location");
    }

    #[tokio::test]
    async fn test_weather_update_rejects_impossible_pressure() {
        let payload = json!({
            "location": "Manila",
            "temperature": 26.0,
            "humidity": 70.0,
            "wind_speed": 10.0,
            "pressure": 700.0,
            "weather_condition": "Clear"
        });
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/v1/realtime/weather-update",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "pressure");
    }

    #[tokio::test]
    async fn test_risk_without_data_is_unknown() {
        let (status, body) = send(app(), Method::GET, "/api/v1/analysis/Manila/risk", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Manila");
        assert_eq!(body["result"]["risk_level"], "UNKNOWN");
    }

    #[tokio::test]
    async fn test_analysis_rejects_out_of_range_days() {
        let (status, body) = send(
            app(),
            Method::GET,
            "/api/v1/analysis/Manila/patterns?days=0",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "days");
    }

    #[tokio::test]
    async fn test_trends_report_insufficient_data() {
        let (status, body) = send(
            app(),
            Method::GET,
            "/api/v1/analysis/Manila/trends?days=14",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["status"], "insufficient_data");
        assert_eq!(body["result"]["required"], 7);
    }

    #[tokio::test]
    async fn test_status_and_active_events() {
        let app = app();
        let (status, body) = send(app.clone(), Method::GET, "/api/v1/realtime/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["real_time_system"]["alert_thresholds_loaded"], 3);
        assert_eq!(body["real_time_system"]["event_history_size"], 0);

        let (status, body) = send(
            app,
            Method::GET,
            "/api/v1/realtime/active-events?location=Manila",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_simulate_then_clear_in_development() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/v1/realtime/simulate",
            Some(json!({"event_type": "heat", "severity": "critical"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["test_data"]["location"], "Manila,PH");
        assert_eq!(body["events"][0]["type"], "heat_warning");

        let (status, body) = send(app, Method::DELETE, "/api/v1/realtime/events", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events_cleared"], 1);
    }

    #[tokio::test]
    async fn test_debug_endpoints_forbidden_in_production() {
        let mut config = Config::development();
        config.environment = "production".to_string();
        let (status, body) = send(
            app_with(config),
            Method::DELETE,
            "/api/v1/realtime/events",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }
}
