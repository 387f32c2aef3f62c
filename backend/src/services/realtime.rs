//! Real-time event processor
//!
//! Evaluates every incoming observation against the alert thresholds, keeps a
//! bounded history of raised events, fans them out to live subscribers and
//! hands them to the persistence and emergency collaborators.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::analysis::hazard;
use shared::{
    validate_observation, AlertThresholds, EventMessage, HazardKind, Observation,
    RealTimeEvent,
};
use tokio::sync::{mpsc, RwLock};

use crate::config::RealtimeConfig;
use crate::error::{AppError, AppResult};
use crate::external::EmergencyWorkflow;
use crate::services::subscribers::{SubscriberId, SubscriberRegistry};
use crate::store::{EventStore, WeatherStore};

/// Collaborators handed to the processor at construction
#[derive(Clone)]
pub struct ProcessorCollaborators {
    pub weather_store: Arc<dyn WeatherStore>,
    pub event_store: Arc<dyn EventStore>,
    pub workflow: Arc<dyn EmergencyWorkflow>,
}

/// Snapshot of the processor's runtime state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessorStatus {
    pub active_connections: usize,
    pub active_events: usize,
    pub event_history_size: usize,
    pub alert_thresholds_loaded: usize,
}

/// Result of a simulated hazard
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub observation: Observation,
    pub events: Vec<RealTimeEvent>,
    pub broadcasted_to: usize,
}

/// Requested preset strength for a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationSeverity {
    #[default]
    Warning,
    Critical,
}

pub struct RealTimeEventProcessor {
    thresholds: AlertThresholds,
    collaborators: ProcessorCollaborators,
    subscribers: SubscriberRegistry,
    history: RwLock<VecDeque<RealTimeEvent>>,
    history_capacity: usize,
    recent_on_connect: usize,
    debug_operations: bool,
}

impl RealTimeEventProcessor {
    pub fn new(
        thresholds: AlertThresholds,
        collaborators: ProcessorCollaborators,
        config: &RealtimeConfig,
    ) -> Self {
        let history_capacity = config.history_capacity.max(1);
        Self {
            thresholds,
            collaborators,
            subscribers: SubscriberRegistry::new(config.subscriber_buffer),
            history: RwLock::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            recent_on_connect: config.recent_events_on_connect,
            debug_operations: false,
        }
    }

    /// Allow history clearing and event simulation
    pub fn with_debug_operations(mut self, enabled: bool) -> Self {
        self.debug_operations = enabled;
        self
    }

    // ========================================================================
    // Processing
    // ========================================================================

    pub async fn process_update(&self, observation: &Observation) -> AppResult<Vec<RealTimeEvent>> {
        self.process_update_at(observation, Utc::now()).await
    }

    /// Evaluate one observation with `now` as the event timestamp
    pub async fn process_update_at(
        &self,
        observation: &Observation,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RealTimeEvent>> {
        let observation = validated(observation)?;
        Ok(self.evaluate(&observation, now).await)
    }

    /// Validate, store and then process an incoming observation
    ///
    /// Storage is best effort; a failure is logged and processing continues.
    pub async fn ingest_observation(&self, observation: &Observation) -> AppResult<Vec<RealTimeEvent>> {
        let observation = validated(observation)?;
        if let Err(e) = self
            .collaborators
            .weather_store
            .store_observation(&observation)
            .await
        {
            tracing::error!(location = %observation.location, error = %e, "Failed to store observation");
        }
        Ok(self.evaluate(&observation, Utc::now()).await)
    }

    async fn evaluate(&self, observation: &Observation, now: DateTime<Utc>) -> Vec<RealTimeEvent> {
        let rainfall = match self
            .collaborators
            .weather_store
            .get_recent_rainfall(&observation.location)
            .await
        {
            Ok(mm) => mm,
            Err(e) => {
                tracing::warn!(location = %observation.location, error = %e, "Recent rainfall unavailable, assuming none");
                0.0
            }
        };

        let assessments = hazard::evaluate_all(observation, &self.thresholds, rainfall);
        let events: Vec<RealTimeEvent> = assessments
            .into_iter()
            .map(|assessment| RealTimeEvent::from_assessment(&observation.location, assessment, now))
            .collect();

        // Every subscriber sees every alert before any collaborator call
        for event in &events {
            self.record(event.clone()).await;

            let delivered = self.subscribers.broadcast(&EventMessage::alert(event)).await;
            tracing::info!(
                event_type = %event.event_type,
                severity = event.severity.as_str(),
                location = %event.location,
                delivered,
                "Broadcast real-time alert"
            );
        }

        for event in &events {
            if let Err(e) = self.collaborators.event_store.persist_event(event).await {
                tracing::error!(event_id = %event.event_id, error = %e, "Failed to persist event");
            }

            if event.severity.requires_escalation() {
                self.escalate(event).await;
            }
        }

        tracing::info!(
            location = %observation.location,
            events = events.len(),
            "Processed weather update"
        );
        events
    }

    async fn record(&self, event: RealTimeEvent) {
        let mut history = self.history.write().await;
        history.push_back(event);
        while history.len() > self.history_capacity {
            history.pop_front();
        }
    }

    async fn escalate(&self, event: &RealTimeEvent) {
        let cause = format!("{}_{}", event.event_type, event.severity.as_str());
        match self
            .collaborators
            .workflow
            .trigger_emergency_workflow(&event.location, &cause)
            .await
        {
            Ok(outcome) => {
                tracing::info!(location = %event.location, %cause, status = %outcome.status, "Emergency workflow triggered")
            }
            Err(e) => {
                tracing::error!(location = %event.location, %cause, error = %e, "Failed to trigger emergency workflow")
            }
        }
    }

    // ========================================================================
    // Subscribers
    // ========================================================================

    /// Register a subscriber and queue the most recent history events for it
    pub async fn add_subscriber(&self) -> (SubscriberId, mpsc::Receiver<EventMessage>) {
        let replay = self
            .recent_events(self.recent_on_connect)
            .await
            .iter()
            .map(EventMessage::recent)
            .collect();
        self.subscribers.add_with_replay(replay).await
    }

    pub async fn remove_subscriber(&self, id: SubscriberId) -> bool {
        self.subscribers.remove(id).await
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.count().await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn get_active_events(&self, location: Option<&str>) -> Vec<RealTimeEvent> {
        self.get_active_events_at(location, Utc::now()).await
    }

    /// Events in history that have not expired at `now`, oldest first
    pub async fn get_active_events_at(
        &self,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<RealTimeEvent> {
        let location = location.map(str::trim).filter(|l| !l.is_empty());
        self.history
            .read()
            .await
            .iter()
            .filter(|e| e.is_active_at(now))
            .filter(|e| location.map_or(true, |l| e.location == l))
            .cloned()
            .collect()
    }

    /// Last `n` history events, oldest first
    pub async fn recent_events(&self, n: usize) -> Vec<RealTimeEvent> {
        let history = self.history.read().await;
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).cloned().collect()
    }

    pub async fn history(&self) -> Vec<RealTimeEvent> {
        self.history.read().await.iter().cloned().collect()
    }

    pub async fn status(&self) -> ProcessorStatus {
        ProcessorStatus {
            active_connections: self.subscribers.count().await,
            active_events: self.get_active_events(None).await.len(),
            event_history_size: self.history.read().await.len(),
            alert_thresholds_loaded: AlertThresholds::CATEGORY_COUNT,
        }
    }

    // ========================================================================
    // Development operations
    // ========================================================================

    /// Empty the in-memory history; returns the number of events removed
    pub async fn clear_history(&self) -> AppResult<usize> {
        self.ensure_debug("Clearing events")?;
        let mut history = self.history.write().await;
        let cleared = history.len();
        history.clear();
        tracing::info!(cleared, "Cleared event history");
        Ok(cleared)
    }

    /// Run a preset observation for one hazard through the processor
    pub async fn simulate(
        &self,
        kind: HazardKind,
        severity: SimulationSeverity,
        location: &str,
    ) -> AppResult<SimulationReport> {
        self.ensure_debug("Simulation")?;
        let observation = simulated_observation(kind, severity, location, Utc::now());
        let events = self.process_update(&observation).await?;
        Ok(SimulationReport {
            observation,
            events,
            broadcasted_to: self.subscribers.count().await,
        })
    }

    fn ensure_debug(&self, operation: &str) -> AppResult<()> {
        if self.debug_operations {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} is only available in development",
                operation
            )))
        }
    }
}

/// Cleaned copy of an observation, or the caller-visible reason it was rejected
fn validated(observation: &Observation) -> AppResult<Observation> {
    if observation.location.trim().is_empty() {
        return Err(AppError::MissingLocation);
    }

    let validation = validate_observation(observation);
    match validation.cleaned {
        Some(cleaned) => Ok(cleaned),
        None => {
            let field = validation
                .errors
                .first()
                .and_then(|e| e.split_whitespace().next())
                .unwrap_or("observation")
                .to_string();
            Err(AppError::validation(field, validation.errors.join("; ")))
        }
    }
}

/// Preset observation that trips the requested hazard
pub fn simulated_observation(
    kind: HazardKind,
    severity: SimulationSeverity,
    location: &str,
    timestamp: DateTime<Utc>,
) -> Observation {
    let critical = severity == SimulationSeverity::Critical;
    let (temperature, humidity, wind_speed, pressure, condition, wind_direction, visibility) =
        match kind {
            HazardKind::Typhoon => (
                28.0,
                85.0,
                if critical { 95.0 } else { 65.0 },
                if critical { 980.0 } else { 995.0 },
                "Severe Storm",
                180.0,
                5.0,
            ),
            HazardKind::Heat => (
                if critical { 42.0 } else { 37.0 },
                65.0,
                10.0,
                1010.0,
                "Hot",
                90.0,
                8.0,
            ),
            HazardKind::Flood => (30.0, 95.0, 25.0, 990.0, "Heavy Rain", 270.0, 3.0),
        };

    Observation {
        location: location.to_string(),
        temperature,
        humidity,
        pressure,
        wind_speed,
        wind_direction,
        visibility: Some(visibility),
        condition: condition.to_string(),
        rainfall_mm: None,
        timestamp,
    }
}
