//! Business logic services for WeatherWise

pub mod realtime;
pub mod subscribers;
pub mod weather;

pub use realtime::{
    ProcessorCollaborators, ProcessorStatus, RealTimeEventProcessor, SimulationReport,
    SimulationSeverity,
};
pub use subscribers::{SubscriberId, SubscriberRegistry};
pub use weather::WeatherAnalysisService;
