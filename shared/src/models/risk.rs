//! Disaster risk scoring models

use serde::{Deserialize, Serialize};

use crate::types::{clamp_unit, round_to, RiskLevel};

/// Hazard categories combined into the overall risk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Typhoon,
    Flooding,
    HeatStress,
    GeneralWeather,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Typhoon,
        RiskCategory::Flooding,
        RiskCategory::HeatStress,
        RiskCategory::GeneralWeather,
    ];

    /// Fixed contribution to the overall score; the four weights sum to 1
    pub fn weight(&self) -> f64 {
        match self {
            RiskCategory::Typhoon => 0.4,
            RiskCategory::Flooding => 0.3,
            RiskCategory::HeatStress => 0.2,
            RiskCategory::GeneralWeather => 0.1,
        }
    }
}

/// Per-category risk, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRisks {
    pub typhoon: f64,
    pub flooding: f64,
    pub heat_stress: f64,
    pub general_weather: f64,
}

impl CategoryRisks {
    pub fn get(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Typhoon => self.typhoon,
            RiskCategory::Flooding => self.flooding,
            RiskCategory::HeatStress => self.heat_stress,
            RiskCategory::GeneralWeather => self.general_weather,
        }
    }

    /// Clamp every category into [0, 1] and round to two decimals
    pub fn normalized(self) -> Self {
        let norm = |v: f64| round_to(clamp_unit(v), 2);
        Self {
            typhoon: norm(self.typhoon),
            flooding: norm(self.flooding),
            heat_stress: norm(self.heat_stress),
            general_weather: norm(self.general_weather),
        }
    }

    /// Weighted overall score
    pub fn weighted_overall(&self) -> f64 {
        RiskCategory::ALL
            .iter()
            .map(|c| self.get(*c) * c.weight())
            .sum()
    }
}

/// Comprehensive risk assessment for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub overall_risk: f64,
    pub category_risks: CategoryRisks,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub contributing_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskScore {
    /// Returned when neither current nor forecast data exists
    pub fn unavailable() -> Self {
        Self {
            overall_risk: 0.0,
            category_risks: CategoryRisks::default(),
            risk_level: RiskLevel::Unknown,
            confidence: 0.0,
            contributing_factors: vec!["No data available for analysis".to_string()],
            recommendations: vec!["Ensure weather monitoring systems are operational".to_string()],
        }
    }
}
