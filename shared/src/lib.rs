//! Shared types, models and the analytical engine for WeatherWise
//!
//! This crate contains the domain models shared between the backend and the
//! WASM dashboard bindings, plus the pure pattern, anomaly, trend, risk and
//! real-time hazard computations. It performs no I/O.

pub mod analysis;
pub mod models;
pub mod types;
pub mod validation;

pub use analysis::{AnomalyDetector, PatternAnalyzer, RiskScorer, StatsError, TrendAnalyzer};
pub use models::*;
pub use types::*;
pub use validation::*;
