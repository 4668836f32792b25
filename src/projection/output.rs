//! Output structures for scenario projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named return assumption a series was projected under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Pessimistic,
    Realistic,
    Optimistic,
}

impl ScenarioType {
    /// All scenarios, lowest rate assumption first
    pub const ALL: [ScenarioType; 3] = [
        ScenarioType::Pessimistic,
        ScenarioType::Realistic,
        ScenarioType::Optimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Pessimistic => "pessimistic",
            ScenarioType::Realistic => "realistic",
            ScenarioType::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionDataPoint {
    pub date: NaiveDate,

    /// Balance after this month's contribution and growth
    pub value: f64,

    /// Amount paid in this month (may be 0)
    pub contribution_amount: f64,

    /// Running total including historical contributions
    pub accumulated_contributions: f64,

    pub scenario_type: ScenarioType,

    /// Always true for engine output; false marks caller-supplied history
    pub is_projection: bool,
}

/// One projected rate path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionScenario {
    #[serde(rename = "type")]
    pub scenario_type: ScenarioType,

    /// One point per simulated month plus the horizon point
    pub data_points: Vec<ProjectionDataPoint>,

    /// Annual return in percent (7.0 means 7%)
    pub return_rate: f64,

    pub final_value: f64,
    pub total_contributions: f64,

    /// final_value - total_contributions - initial_value
    pub total_returns: f64,
}

impl ProjectionScenario {
    /// Projected value on the last point dated on or before `date`
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.data_points
            .iter()
            .take_while(|p| p.date <= date)
            .last()
            .map(|p| p.value)
    }

    /// Final horizon point
    pub fn horizon_point(&self) -> Option<&ProjectionDataPoint> {
        self.data_points.last()
    }
}

/// Run diagnostics; carries no behavioural meaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetadata {
    pub computation_time_ms: f64,

    /// Points per scenario
    pub data_points: usize,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_contributions: f64,
    pub initial_value: f64,
}

/// All three scenarios of one projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedScenariosOutput {
    pub pessimistic: ProjectionScenario,
    pub realistic: ProjectionScenario,
    pub optimistic: ProjectionScenario,
    pub metadata: ProjectionMetadata,
}

impl CombinedScenariosOutput {
    pub fn scenario(&self, scenario_type: ScenarioType) -> &ProjectionScenario {
        match scenario_type {
            ScenarioType::Pessimistic => &self.pessimistic,
            ScenarioType::Realistic => &self.realistic,
            ScenarioType::Optimistic => &self.optimistic,
        }
    }

    /// Scenarios in pessimistic, realistic, optimistic order
    pub fn scenarios(&self) -> [&ProjectionScenario; 3] {
        [&self.pessimistic, &self.realistic, &self.optimistic]
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            data_points: self.metadata.data_points,
            initial_value: self.metadata.initial_value,
            total_contributions: self.metadata.total_contributions,
            final_pessimistic: self.pessimistic.final_value,
            final_realistic: self.realistic.final_value,
            final_optimistic: self.optimistic.final_value,
            returns_pessimistic: self.pessimistic.total_returns,
            returns_realistic: self.realistic.total_returns,
            returns_optimistic: self.optimistic.total_returns,
            spread: self.optimistic.final_value - self.pessimistic.final_value,
        }
    }
}

/// Summary statistics for a combined projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub data_points: usize,
    pub initial_value: f64,
    pub total_contributions: f64,
    pub final_pessimistic: f64,
    pub final_realistic: f64,
    pub final_optimistic: f64,
    pub returns_pessimistic: f64,
    pub returns_realistic: f64,
    pub returns_optimistic: f64,
    /// Optimistic minus pessimistic final value
    pub spread: f64,
}
