//! Static alert thresholds for the real-time detector

use serde::{Deserialize, Serialize};

use crate::types::AlertSeverity;

/// Ascending cut points for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityLadder {
    pub warning: f64,
    pub critical: f64,
    pub emergency: f64,
}

impl SeverityLadder {
    pub const fn new(warning: f64, critical: f64, emergency: f64) -> Self {
        Self {
            warning,
            critical,
            emergency,
        }
    }

    /// Highest severity whose cut point `value` reaches
    pub fn classify(&self, value: f64) -> Option<AlertSeverity> {
        if value >= self.emergency {
            Some(AlertSeverity::Emergency)
        } else if value >= self.critical {
            Some(AlertSeverity::Critical)
        } else if value >= self.warning {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.warning < self.critical && self.critical < self.emergency
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TyphoonThresholds {
    /// km/h
    pub wind_speed: SeverityLadder,
    /// hPa below the standard atmosphere
    pub pressure_drop: SeverityLadder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodThresholds {
    /// mm/h
    pub rainfall_rate: SeverityLadder,
    /// m
    pub water_level: SeverityLadder,
    /// %
    pub humidity: SeverityLadder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatThresholds {
    /// °C
    pub temperature: SeverityLadder,
    /// °C
    pub heat_index: SeverityLadder,
}

/// Per-category alert thresholds, loaded once and read-only afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub typhoon: TyphoonThresholds,
    pub flooding: FloodThresholds,
    pub heat: HeatThresholds,
}

impl AlertThresholds {
    /// Number of hazard categories carried
    pub const CATEGORY_COUNT: usize = 3;

    /// Every ladder must be strictly ascending
    pub fn validate(&self) -> Result<(), &'static str> {
        let ladders = [
            self.typhoon.wind_speed,
            self.typhoon.pressure_drop,
            self.flooding.rainfall_rate,
            self.flooding.water_level,
            self.flooding.humidity,
            self.heat.temperature,
            self.heat.heat_index,
        ];
        if ladders.iter().all(SeverityLadder::is_ascending) {
            Ok(())
        } else {
            Err("Alert threshold ladders must be strictly ascending")
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            typhoon: TyphoonThresholds {
                wind_speed: SeverityLadder::new(60.0, 90.0, 120.0),
                pressure_drop: SeverityLadder::new(10.0, 20.0, 30.0),
            },
            flooding: FloodThresholds {
                rainfall_rate: SeverityLadder::new(20.0, 50.0, 100.0),
                water_level: SeverityLadder::new(1.0, 2.0, 3.0),
                humidity: SeverityLadder::new(85.0, 90.0, 95.0),
            },
            heat: HeatThresholds {
                temperature: SeverityLadder::new(35.0, 40.0, 45.0),
                heat_index: SeverityLadder::new(40.0, 52.0, 55.0),
            },
        }
    }
}
