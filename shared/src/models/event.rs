//! Real-time alert event models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::types::AlertSeverity;

/// Hazards evaluated on every incoming observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Typhoon,
    Heat,
    Flood,
}

impl HazardKind {
    /// Evaluation order for one observation
    pub const ALL: [HazardKind; 3] = [HazardKind::Typhoon, HazardKind::Heat, HazardKind::Flood];

    pub fn event_type(&self) -> &'static str {
        match self {
            HazardKind::Typhoon => "typhoon_warning",
            HazardKind::Heat => "heat_warning",
            HazardKind::Flood => "flood_warning",
        }
    }

    pub fn triggered_by(&self) -> &'static str {
        match self {
            HazardKind::Typhoon => "WeatherMonitor",
            HazardKind::Heat => "HeatMonitor",
            HazardKind::Flood => "FloodMonitor",
        }
    }

    /// How long an event of this kind stays active
    pub fn expiry(&self) -> Duration {
        match self {
            HazardKind::Typhoon => Duration::hours(6),
            HazardKind::Heat => Duration::hours(12),
            HazardKind::Flood => Duration::hours(24),
        }
    }
}

/// Outcome of a single hazard check before it becomes an event
#[derive(Debug, Clone, PartialEq)]
pub struct HazardAssessment {
    pub kind: HazardKind,
    pub severity: AlertSeverity,
    pub data: Map<String, Value>,
}

/// An alert raised by the real-time detector
///
/// Events never change after creation; a different severity is a new event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub location: String,
    pub severity: AlertSeverity,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub triggered_by: String,
}

impl RealTimeEvent {
    pub fn from_assessment(
        location: impl Into<String>,
        assessment: HazardAssessment,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: assessment.kind.event_type().to_string(),
            location: location.into(),
            severity: assessment.severity,
            data: Value::Object(assessment.data),
            timestamp: now,
            expires_at: Some(now + assessment.kind.expiry()),
            triggered_by: assessment.kind.triggered_by().to_string(),
        }
    }

    /// Active when there is no expiry or the expiry lies in the future
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Event body of a subscriber message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: String,
    pub location: String,
    pub severity: AlertSeverity,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&RealTimeEvent> for EventPayload {
    fn from(event: &RealTimeEvent) -> Self {
        Self {
            id: event.event_id,
            event_type: event.event_type.clone(),
            location: event.location.clone(),
            severity: event.severity,
            data: event.data.clone(),
            timestamp: event.timestamp,
            expires_at: event.expires_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventMessageType {
    /// A freshly raised alert
    RealTimeAlert,
    /// History replayed to a newly connected subscriber
    RecentEvent,
}

/// Message pushed to live subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: EventMessageType,
    pub event: EventPayload,
}

impl EventMessage {
    pub fn alert(event: &RealTimeEvent) -> Self {
        Self {
            message_type: EventMessageType::RealTimeAlert,
            event: event.into(),
        }
    }

    pub fn recent(event: &RealTimeEvent) -> Self {
        Self {
            message_type: EventMessageType::RecentEvent,
            event: event.into(),
        }
    }
}
