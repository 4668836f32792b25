//! Running state of one scenario during a projection

use chrono::NaiveDate;

use super::output::{ProjectionDataPoint, ProjectionScenario, ScenarioType};

/// Per-scenario accumulator advanced once per simulated month
#[derive(Debug, Clone)]
pub struct ScenarioTrack {
    pub scenario_type: ScenarioType,

    /// Annual return in percent
    pub annual_rate: f64,

    /// Monthly compounding rate derived from the annual percent
    pub monthly_rate: f64,

    /// Current simulated balance
    pub value: f64,

    pub points: Vec<ProjectionDataPoint>,
}

impl ScenarioTrack {
    pub fn new(scenario_type: ScenarioType, annual_rate: f64, initial_value: f64, capacity: usize) -> Self {
        Self {
            scenario_type,
            annual_rate,
            monthly_rate: monthly_rate(annual_rate),
            value: initial_value,
            points: Vec::with_capacity(capacity),
        }
    }

    /// Apply one month: add the contribution, compound, record the point
    pub fn advance(&mut self, date: NaiveDate, contribution: f64, accumulated_contributions: f64) {
        self.value = (self.value + contribution) * (1.0 + self.monthly_rate);

        self.points.push(ProjectionDataPoint {
            date,
            value: self.value,
            contribution_amount: contribution,
            accumulated_contributions,
            scenario_type: self.scenario_type,
            is_projection: true,
        });
    }

    /// Package the finished track
    pub fn into_scenario(self, initial_value: f64, total_contributions: f64) -> ProjectionScenario {
        ProjectionScenario {
            scenario_type: self.scenario_type,
            data_points: self.points,
            return_rate: self.annual_rate,
            final_value: self.value,
            total_contributions,
            total_returns: self.value - total_contributions - initial_value,
        }
    }
}

/// Annual percent to monthly compounding rate (7.0 -> 0.07 / 12)
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}
