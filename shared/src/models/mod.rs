//! Domain models for the WeatherWise disaster-risk engine

mod anomaly;
mod event;
mod observation;
mod pattern;
mod risk;
mod thresholds;
mod trend;

pub use anomaly::*;
pub use event::*;
pub use observation::*;
pub use pattern::*;
pub use risk::*;
pub use thresholds::*;
pub use trend::*;
