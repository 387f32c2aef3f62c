//! HTTP handlers for WeatherWise endpoints

pub mod analysis;
pub mod health;
pub mod realtime;

pub use analysis::{get_anomalies, get_patterns, get_risk, get_trends};
pub use health::health_check;
pub use realtime::{
    clear_events, get_active_events, get_status, simulate_event, weather_update, websocket,
};
