//! Scenario runner for batch and household projections
//!
//! Holds a default set of rate assumptions and runs many pensions (or many
//! rate sets for one pension) through the engine. Runs are independent, so
//! batches are spread across threads with rayon.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::month_start;
use crate::projection::{
    project, CombinedScenariosOutput, ProjectionEngine, ProjectionParams, ScenarioRates, ScenarioType,
};

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::with_rates(ScenarioRates::new(3.0, 5.0, 8.0));
/// let outputs = runner.run_batch(&pensions);
/// let household = HouseholdProjection::aggregate(&outputs);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Runner with the default 4% / 7% / 10% assumptions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(rates: ScenarioRates) -> Self {
        Self {
            engine: ProjectionEngine::new(rates),
        }
    }

    pub fn rates(&self) -> &ScenarioRates {
        self.engine.rates()
    }

    /// Run one pension with its own rates
    pub fn run(&self, params: &ProjectionParams) -> CombinedScenariosOutput {
        project(params)
    }

    /// Run one pension with the runner's rates instead of its own
    pub fn run_with_defaults(&self, params: &ProjectionParams) -> CombinedScenariosOutput {
        self.engine.project(params)
    }

    /// Run many pensions in parallel, output order matching input order
    pub fn run_batch(&self, pensions: &[ProjectionParams]) -> Vec<CombinedScenariosOutput> {
        pensions.par_iter().map(project).collect()
    }

    /// Run one pension under several rate sets (sensitivity testing)
    pub fn run_rate_sets(
        &self,
        params: &ProjectionParams,
        rate_sets: &[ScenarioRates],
    ) -> Vec<CombinedScenariosOutput> {
        rate_sets
            .par_iter()
            .map(|rates| ProjectionEngine::new(*rates).project(params))
            .collect()
    }
}

/// Household totals for one calendar month
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRow {
    pub pessimistic: f64,
    pub realistic: f64,
    pub optimistic: f64,
    pub contribution: f64,
    /// Pensions with a point in this month
    pub pensions: usize,
}

impl HouseholdRow {
    pub fn value(&self, scenario_type: ScenarioType) -> f64 {
        match scenario_type {
            ScenarioType::Pessimistic => self.pessimistic,
            ScenarioType::Realistic => self.realistic,
            ScenarioType::Optimistic => self.optimistic,
        }
    }

    fn value_mut(&mut self, scenario_type: ScenarioType) -> &mut f64 {
        match scenario_type {
            ScenarioType::Pessimistic => &mut self.pessimistic,
            ScenarioType::Realistic => &mut self.realistic,
            ScenarioType::Optimistic => &mut self.optimistic,
        }
    }

    fn add(&mut self, other: &HouseholdRow) {
        self.pessimistic += other.pessimistic;
        self.realistic += other.realistic;
        self.optimistic += other.optimistic;
        self.contribution += other.contribution;
        self.pensions += other.pensions;
    }
}

/// Several pensions summed by calendar month
///
/// Rows are keyed by the first of the month, so pensions on different days
/// of the month share a row. When one pension has two points in a month (a
/// mid-month horizon), its later value counts and both contributions are
/// added. Pensions whose horizons differ contribute only to the months they
/// cover; no carrying forward of finished pensions is done.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProjection {
    pub rows: BTreeMap<NaiveDate, HouseholdRow>,
    pub total_final_pessimistic: f64,
    pub total_final_realistic: f64,
    pub total_final_optimistic: f64,
    pub total_contributions: f64,
}

impl HouseholdProjection {
    pub fn aggregate(outputs: &[CombinedScenariosOutput]) -> Self {
        let mut household = Self::default();

        for output in outputs {
            let mut by_month: BTreeMap<NaiveDate, HouseholdRow> = BTreeMap::new();

            for scenario in output.scenarios() {
                for point in &scenario.data_points {
                    let row = by_month.entry(month_start(point.date)).or_default();
                    *row.value_mut(scenario.scenario_type) = point.value;
                }
            }
            for point in &output.realistic.data_points {
                by_month.entry(month_start(point.date)).or_default().contribution += point.contribution_amount;
            }

            for (month, mut row) in by_month {
                row.pensions = 1;
                household.rows.entry(month).or_default().add(&row);
            }

            household.total_final_pessimistic += output.pessimistic.final_value;
            household.total_final_realistic += output.realistic.final_value;
            household.total_final_optimistic += output.optimistic.final_value;
            household.total_contributions += output.metadata.total_contributions;
        }

        household
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ContributionStep, Frequency};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pension(initial: f64, monthly: f64, end: NaiveDate) -> ProjectionParams {
        ProjectionParams::new(initial, date(2024, 1, 1), end)
            .with_steps(vec![ContributionStep::new(monthly, Frequency::Monthly, date(2024, 1, 1))])
    }

    #[test]
    fn test_scenario_runner_batch() {
        let runner = ScenarioRunner::new();
        let pensions = vec![
            pension(1_000.0, 100.0, date(2030, 1, 1)),
            pension(50_000.0, 0.0, date(2040, 1, 1)),
            pension(0.0, 500.0, date(2035, 6, 1)),
        ];

        let outputs = runner.run_batch(&pensions);
        assert_eq!(outputs.len(), 3);
        for (params, output) in pensions.iter().zip(&outputs) {
            assert_eq!(output.metadata.end_date, params.end_date);
            assert_eq!(output.realistic, project(params).realistic);
        }
    }

    #[test]
    fn test_run_rate_sets_orders_results() {
        let runner = ScenarioRunner::new();
        let params = pension(10_000.0, 200.0, date(2044, 1, 1));

        let rate_sets: Vec<_> = [3.0, 5.0, 8.0].iter().map(|&r| ScenarioRates::uniform(r)).collect();
        let results = runner.run_rate_sets(&params, &rate_sets);

        assert_eq!(results.len(), 3);
        // Higher return assumption should result in higher final value
        assert!(results[2].realistic.final_value > results[1].realistic.final_value);
        assert!(results[1].realistic.final_value > results[0].realistic.final_value);
    }

    #[test]
    fn test_run_with_defaults_overrides_rates() {
        let runner = ScenarioRunner::with_rates(ScenarioRates::uniform(0.0));
        let params = pension(1_000.0, 100.0, date(2025, 1, 1));

        let output = runner.run_with_defaults(&params);
        assert_eq!(output.realistic.return_rate, 0.0);
        assert_eq!(output.realistic.final_value, 2_300.0);
        assert_eq!(runner.run(&params).realistic.return_rate, 7.0);
        assert_eq!(runner.rates(), &ScenarioRates::uniform(0.0));
    }

    #[test]
    fn test_household_aggregation() {
        let rates = ScenarioRates::uniform(0.0);
        let a = pension(1_000.0, 100.0, date(2024, 4, 1)).with_rates(rates);
        let b = pension(500.0, 50.0, date(2024, 3, 1)).with_rates(rates);

        let outputs = ScenarioRunner::new().run_batch(&[a, b]);
        let household = HouseholdProjection::aggregate(&outputs);

        // Jan 2024 .. Apr 2024; b's horizon is Mar
        assert_eq!(household.rows.len(), 4);
        let jan = &household.rows[&date(2024, 1, 1)];
        assert_eq!(jan.pensions, 2);
        assert_relative_eq!(jan.realistic, 1_100.0 + 550.0);

        let mar = &household.rows[&date(2024, 3, 1)];
        assert_relative_eq!(mar.value(ScenarioType::Realistic), 1_300.0 + 650.0);
        assert_relative_eq!(mar.contribution, 100.0 + 50.0);

        let apr = &household.rows[&date(2024, 4, 1)];
        assert_eq!(apr.pensions, 1);
        assert_relative_eq!(apr.optimistic, 1_400.0);

        assert_relative_eq!(household.total_final_realistic, 1_400.0 + 650.0);
        assert_relative_eq!(household.total_contributions, 400.0 + 150.0);
    }

    #[test]
    fn test_household_rows_keyed_by_month() {
        let rates = ScenarioRates::uniform(0.0);
        let a = pension(1_000.0, 100.0, date(2024, 3, 1)).with_rates(rates);
        // Starts mid-month with a mid-month horizon: Jan 15, Feb 15, Mar 15, Mar 20
        let b = ProjectionParams::new(500.0, date(2024, 1, 15), date(2024, 3, 20))
            .with_steps(vec![ContributionStep::new(50.0, Frequency::Monthly, date(2024, 1, 1))])
            .with_rates(rates);

        let outputs = ScenarioRunner::new().run_batch(&[a, b]);
        let household = HouseholdProjection::aggregate(&outputs);

        assert_eq!(household.rows.len(), 3);
        assert!(household.rows.values().all(|row| row.pensions == 2));

        let jan = &household.rows[&date(2024, 1, 1)];
        assert_relative_eq!(jan.realistic, 1_100.0 + 550.0);

        // b's horizon value wins for March; both March contributions count
        let mar = &household.rows[&date(2024, 3, 1)];
        assert_relative_eq!(mar.realistic, 1_300.0 + 700.0);
        assert_relative_eq!(mar.contribution, 100.0 + 50.0 + 50.0);
    }
}
