//! Anomaly detection models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::HazardLevel;

/// A detected anomaly in recent observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// `<field>_outlier`, `rapid_<field>_change` or `multivariate_anomaly`
    pub anomaly_type: String,
    pub severity: HazardLevel,
    pub value: f64,
    /// Always ordered so that `lo <= hi`
    pub expected_range: (f64, f64),
    /// 0-1
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub risk_implications: Vec<String>,
}

impl AnomalyResult {
    /// Build a result, normalising the expected range and confidence
    pub fn new(
        anomaly_type: impl Into<String>,
        severity: HazardLevel,
        value: f64,
        expected_range: (f64, f64),
        confidence: f64,
        timestamp: DateTime<Utc>,
        risk_implications: Vec<String>,
    ) -> Self {
        let (a, b) = expected_range;
        Self {
            anomaly_type: anomaly_type.into(),
            severity,
            value,
            expected_range: if a <= b { (a, b) } else { (b, a) },
            confidence: crate::types::clamp_unit(confidence),
            timestamp,
            risk_implications,
        }
    }
}
