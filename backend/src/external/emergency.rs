//! Emergency Workflow Client
//!
//! Escalates critical and emergency events to an external response system.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Result reported by the emergency response system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Escalation target for severe events
#[async_trait]
pub trait EmergencyWorkflow: Send + Sync {
    /// `cause` is `"{event_type}_{severity}"`, e.g. `typhoon_warning_emergency`
    async fn trigger_emergency_workflow(
        &self,
        location: &str,
        cause: &str,
    ) -> AppResult<WorkflowOutcome>;
}

/// Request body posted to the webhook
#[derive(Debug, Serialize)]
struct TriggerRequest<'a> {
    location: &'a str,
    cause: &'a str,
    source: &'static str,
}

/// Workflow triggered by a JSON POST to a configured webhook
#[derive(Clone)]
pub struct WebhookEmergencyWorkflow {
    webhook_url: String,
    http_client: Client,
}

impl WebhookEmergencyWorkflow {
    pub fn new(webhook_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            webhook_url,
            http_client,
        })
    }
}

#[async_trait]
impl EmergencyWorkflow for WebhookEmergencyWorkflow {
    async fn trigger_emergency_workflow(
        &self,
        location: &str,
        cause: &str,
    ) -> AppResult<WorkflowOutcome> {
        let request = TriggerRequest {
            location,
            cause,
            source: "weatherwise",
        };

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::EmergencyWorkflow(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::EmergencyWorkflow(format!(
                "Webhook returned {}: {}",
                status, body
            )));
        }

        let outcome: WorkflowOutcome = response.json().await.map_err(|e| {
            AppError::EmergencyWorkflow(format!("Failed to parse response: {}", e))
        })?;

        tracing::info!(location, cause, status = %outcome.status, "Emergency workflow triggered");
        Ok(outcome)
    }
}

/// Workflow used when no webhook is configured; records the escalation in the log only
#[derive(Debug, Clone, Default)]
pub struct LoggingEmergencyWorkflow;

#[async_trait]
impl EmergencyWorkflow for LoggingEmergencyWorkflow {
    async fn trigger_emergency_workflow(
        &self,
        location: &str,
        cause: &str,
    ) -> AppResult<WorkflowOutcome> {
        tracing::warn!(location, cause, "Emergency workflow requested; no webhook configured");
        Ok(WorkflowOutcome {
            status: "logged".to_string(),
            workflow_id: None,
            detail: Some(format!("{} at {}", cause, location)),
        })
    }
}
