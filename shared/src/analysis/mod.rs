//! Pure analytical engine: batch analyzers and real-time hazard evaluators

pub mod anomaly;
pub mod hazard;
pub mod pattern;
pub mod risk;
pub mod stats;
pub mod trend;

pub use anomaly::AnomalyDetector;
pub use pattern::PatternAnalyzer;
pub use risk::RiskScorer;
pub use stats::StatsError;
pub use trend::TrendAnalyzer;
