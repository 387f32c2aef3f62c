//! External API integrations

pub mod emergency;

pub use emergency::{
    EmergencyWorkflow, LoggingEmergencyWorkflow, WebhookEmergencyWorkflow, WorkflowOutcome,
};
