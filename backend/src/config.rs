//! Configuration management for the WeatherWise backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WW_ prefix

use std::net::SocketAddr;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AlertThresholds;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Default spans for the batch analyzers
    pub analysis: AnalysisConfig,

    /// Real-time event processor settings
    pub realtime: RealtimeConfig,

    /// Emergency workflow integration
    pub emergency: EmergencyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub pattern_days: u32,
    pub anomaly_days: u32,
    /// Historical span that defines "normal" for anomaly detection
    pub baseline_days: u32,
    pub trend_days: u32,
    pub forecast_hours: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeConfig {
    /// Events kept in the in-memory ring
    pub history_capacity: usize,

    /// History events replayed to a new subscriber
    pub recent_events_on_connect: usize,

    /// Per-subscriber channel capacity
    pub subscriber_buffer: usize,

    /// Overrides the built-in alert thresholds when present
    #[serde(default)]
    pub thresholds: Option<AlertThresholds>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmergencyConfig {
    /// Endpoint notified for critical and emergency events
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("analysis.pattern_days", 7)?
            .set_default("analysis.anomaly_days", 3)?
            .set_default("analysis.baseline_days", 30)?
            .set_default("analysis.trend_days", 14)?
            .set_default("analysis.forecast_hours", 24)?
            .set_default("realtime.history_capacity", 50)?
            .set_default("realtime.recent_events_on_connect", 5)?
            .set_default("realtime.subscriber_buffer", 64)?
            .set_default("emergency.timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WW_ prefix)
            .add_source(
                Environment::with_prefix("WW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Alert thresholds in effect: the configured override or the defaults
    pub fn thresholds(&self) -> AlertThresholds {
        self.realtime.thresholds.unwrap_or_default()
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()
            .validate()
            .map_err(|msg| ConfigError::Message(msg.to_string()))?;
        if self.realtime.history_capacity == 0 {
            return Err(ConfigError::Message(
                "realtime.history_capacity must be positive".to_string(),
            ));
        }
        if self.realtime.subscriber_buffer == 0 {
            return Err(ConfigError::Message(
                "realtime.subscriber_buffer must be positive".to_string(),
            ));
        }
        // The replay on connect must fit in a fresh channel
        if self.realtime.subscriber_buffer < self.realtime.recent_events_on_connect {
            return Err(ConfigError::Message(format!(
                "realtime.subscriber_buffer ({}) must be at least realtime.recent_events_on_connect ({})",
                self.realtime.subscriber_buffer, self.realtime.recent_events_on_connect
            )));
        }
        Ok(())
    }

    /// Address the server binds to, from `server.host` and `server.port`
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ConfigError::Message(format!("invalid server.host '{}': {}", self.server.host, e))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pattern_days: 7,
            anomaly_days: 3,
            baseline_days: 30,
            trend_days: 14,
            forecast_hours: 24,
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            recent_events_on_connect: 5,
            subscriber_buffer: 64,
            thresholds: None,
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Development configuration without a database, used by tests and tooling
    pub fn development() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                min_connections: 2,
            },
            analysis: AnalysisConfig::default(),
            realtime: RealtimeConfig::default(),
            emergency: EmergencyConfig::default(),
        }
    }
}
