//! HTTP and WebSocket handlers for real-time alerts

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{analysis::hazard, EventPayload, HazardKind, Observation, RealTimeEvent};

use crate::error::AppResult;
use crate::services::{ProcessorStatus, RealTimeEventProcessor, SimulationSeverity};
use crate::AppState;

// ============================================================================
// Weather updates
// ============================================================================

/// Incoming observation from a monitoring station
#[derive(Debug, Deserialize)]
pub struct WeatherUpdateRequest {
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub weather_condition: String,
    #[serde(default)]
    pub wind_direction: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_visibility() -> f64 {
    10.0
}

impl From<WeatherUpdateRequest> for Observation {
    fn from(req: WeatherUpdateRequest) -> Self {
        Observation {
            location: req.location,
            temperature: req.temperature,
            humidity: req.humidity,
            pressure: req.pressure,
            wind_speed: req.wind_speed,
            wind_direction: req.wind_direction,
            visibility: Some(req.visibility),
            condition: req.weather_condition,
            rainfall_mm: req.rainfall_mm,
            timestamp: req.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Short form of a raised event
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: uuid::Uuid,
    #[serde(rename = "type")]
    pub event_type: String,
    pub severity: String,
    pub location: String,
    pub conditions: String,
    pub recommendations_count: usize,
}

impl From<&RealTimeEvent> for EventSummary {
    fn from(event: &RealTimeEvent) -> Self {
        let data = event.data.as_object();
        Self {
            id: event.event_id,
            event_type: event.event_type.clone(),
            severity: event.severity.as_str().to_string(),
            location: event.location.clone(),
            conditions: data
                .and_then(|d| hazard::data_str(d, "conditions"))
                .unwrap_or_default()
                .to_string(),
            recommendations_count: data
                .and_then(|d| d.get("recommendations"))
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: String,
    pub location: String,
    pub events_generated: usize,
    pub events: Vec<EventSummary>,
    pub active_connections: usize,
}

/// Ingest an observation and raise any alerts it triggers
pub async fn weather_update(
    State(state): State<AppState>,
    Json(input): Json<WeatherUpdateRequest>,
) -> AppResult<Json<ProcessResponse>> {
    let observation = Observation::from(input);
    let events = state.processor.ingest_observation(&observation).await?;

    Ok(Json(ProcessResponse {
        status: "success".to_string(),
        location: observation.location.trim().to_string(),
        events_generated: events.len(),
        events: events.iter().map(EventSummary::from).collect(),
        active_connections: state.processor.subscriber_count().await,
    }))
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ActiveEventsQuery {
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActiveEventsResponse {
    pub status: String,
    pub active_events: Vec<RealTimeEvent>,
    pub count: usize,
    pub active_connections: usize,
}

/// Events that have not yet expired
pub async fn get_active_events(
    State(state): State<AppState>,
    Query(query): Query<ActiveEventsQuery>,
) -> Json<ActiveEventsResponse> {
    let events = state
        .processor
        .get_active_events(query.location.as_deref())
        .await;

    Json(ActiveEventsResponse {
        status: "success".to_string(),
        count: events.len(),
        active_events: events,
        active_connections: state.processor.subscriber_count().await,
    })
}

#[derive(Debug, Serialize)]
pub struct SystemStatusResponse {
    pub status: String,
    pub real_time_system: ProcessorStatus,
    pub system_health: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    Json(SystemStatusResponse {
        status: "operational".to_string(),
        real_time_system: state.processor.status().await,
        system_health: "healthy".to_string(),
    })
}

// ============================================================================
// Development operations
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub event_type: HazardKind,
    #[serde(default = "default_simulation_location")]
    pub location: String,
    #[serde(default)]
    pub severity: SimulationSeverity,
}

fn default_simulation_location() -> String {
    "Manila,PH".to_string()
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub status: String,
    pub message: String,
    pub test_data: Observation,
    pub events_generated: usize,
    pub events: Vec<EventSummary>,
    pub broadcasted_to: usize,
}

/// Run a preset hazard observation through the processor
pub async fn simulate_event(
    State(state): State<AppState>,
    Json(input): Json<SimulateRequest>,
) -> AppResult<Json<SimulateResponse>> {
    let report = state
        .processor
        .simulate(input.event_type, input.severity, &input.location)
        .await?;

    Ok(Json(SimulateResponse {
        status: "success".to_string(),
        message: format!("Simulated {} event", input.event_type.event_type()),
        events_generated: report.events.len(),
        events: report.events.iter().map(EventSummary::from).collect(),
        test_data: report.observation,
        broadcasted_to: report.broadcasted_to,
    }))
}

#[derive(Debug, Serialize)]
pub struct ClearEventsResponse {
    pub status: String,
    pub message: String,
    pub events_cleared: usize,
}

pub async fn clear_events(State(state): State<AppState>) -> AppResult<Json<ClearEventsResponse>> {
    let cleared = state.processor.clear_history().await?;
    Ok(Json(ClearEventsResponse {
        status: "success".to_string(),
        message: "All events cleared".to_string(),
        events_cleared: cleared,
    }))
}

// ============================================================================
// WebSocket subscribers
// ============================================================================

/// Messages a client may send over the socket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping {
        #[serde(default)]
        timestamp: Option<Value>,
    },
    GetActiveEvents,
    Subscribe {
        #[serde(default)]
        locations: Vec<String>,
        #[serde(default)]
        alert_types: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct SubscriptionData {
    pub locations: Vec<String>,
    pub alert_types: Vec<String>,
    pub status: String,
}

/// Direct replies to a client, outside the alert stream
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionEstablished {
        message: String,
        active_events_count: usize,
    },
    Pong {
        timestamp: Option<Value>,
    },
    ActiveEvents {
        events: Vec<EventPayload>,
        count: usize,
    },
    SubscriptionConfirmed {
        data: SubscriptionData,
    },
}

/// Answer a client message
pub async fn reply_to(processor: &RealTimeEventProcessor, message: ClientMessage) -> ServerMessage {
    match message {
        ClientMessage::Ping { timestamp } => ServerMessage::Pong { timestamp },
        ClientMessage::GetActiveEvents => {
            let events: Vec<EventPayload> = processor
                .get_active_events(None)
                .await
                .iter()
                .map(EventPayload::from)
                .collect();
            ServerMessage::ActiveEvents {
                count: events.len(),
                events,
            }
        }
        ClientMessage::Subscribe {
            locations,
            alert_types,
        } => ServerMessage::SubscriptionConfirmed {
            data: SubscriptionData {
                locations,
                alert_types,
                status: "subscribed".to_string(),
            },
        },
    }
}

/// Upgrade to a WebSocket that streams alerts
pub async fn websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let processor = state.processor.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, processor))
}

fn encode<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Returns false once the socket is closed; encode failures are logged and skipped
async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    match encode(value) {
        Ok(text) => socket.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode WebSocket message");
            true
        }
    }
}

async fn handle_socket(mut socket: WebSocket, processor: Arc<RealTimeEventProcessor>) {
    let welcome = ServerMessage::ConnectionEstablished {
        message: "Connected to WeatherWise real-time alerts".to_string(),
        active_events_count: processor.get_active_events(None).await.len(),
    };
    if !send_json(&mut socket, &welcome).await {
        return;
    }

    let (id, mut alerts) = processor.add_subscriber().await;

    loop {
        tokio::select! {
            alert = alerts.recv() => {
                // None: the registry dropped this subscriber
                let Some(alert) = alert else { break };
                if !send_json(&mut socket, &alert).await {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(message) => {
                                let reply = reply_to(&processor, message).await;
                                if !send_json(&mut socket, &reply).await {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "Invalid client message received"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(subscriber = %id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
        }
    }

    processor.remove_subscriber(id).await;
}
