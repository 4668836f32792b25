//! Core projection engine for monthly multi-scenario value projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::output::{CombinedScenariosOutput, ProjectionMetadata, ProjectionScenario, ScenarioType};
use super::state::ScenarioTrack;
use crate::calendar::{months_between, next_month};
use crate::schedule::{contribution_for, historical_total, ContributionStep, HistoricalContribution};

/// Default annual return assumptions in percent
pub const DEFAULT_PESSIMISTIC_RATE: f64 = 4.0;
pub const DEFAULT_REALISTIC_RATE: f64 = 7.0;
pub const DEFAULT_OPTIMISTIC_RATE: f64 = 10.0;

/// Annual return assumptions for the three scenarios, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRates {
    pub pessimistic: f64,
    pub realistic: f64,
    pub optimistic: f64,
}

impl ScenarioRates {
    pub fn new(pessimistic: f64, realistic: f64, optimistic: f64) -> Self {
        Self { pessimistic, realistic, optimistic }
    }

    /// Same rate for every scenario
    pub fn uniform(rate: f64) -> Self {
        Self::new(rate, rate, rate)
    }

    pub fn rate(&self, scenario_type: ScenarioType) -> f64 {
        match scenario_type {
            ScenarioType::Pessimistic => self.pessimistic,
            ScenarioType::Realistic => self.realistic,
            ScenarioType::Optimistic => self.optimistic,
        }
    }

    /// (scenario, rate) pairs in pessimistic, realistic, optimistic order
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioType, f64)> + '_ {
        ScenarioType::ALL.into_iter().map(move |t| (t, self.rate(t)))
    }
}

impl Default for ScenarioRates {
    fn default() -> Self {
        Self::new(DEFAULT_PESSIMISTIC_RATE, DEFAULT_REALISTIC_RATE, DEFAULT_OPTIMISTIC_RATE)
    }
}

/// Everything one projection run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    /// Already-realised market value at the start date
    pub initial_value: f64,

    /// Planned contributions, resolved in list order
    pub contribution_steps: Vec<ContributionStep>,

    pub rates: ScenarioRates,
    pub start_date: NaiveDate,

    /// Projection horizon, typically the retirement date
    pub end_date: NaiveDate,

    /// Seeds accumulated contributions; does not change the initial value
    #[serde(default)]
    pub historical_contributions: Vec<HistoricalContribution>,
}

impl ProjectionParams {
    pub fn new(initial_value: f64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            initial_value,
            contribution_steps: Vec::new(),
            rates: ScenarioRates::default(),
            start_date,
            end_date,
            historical_contributions: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<ContributionStep>) -> Self {
        self.contribution_steps = steps;
        self
    }

    pub fn with_rates(mut self, rates: ScenarioRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_history(mut self, history: Vec<HistoricalContribution>) -> Self {
        self.historical_contributions = history;
        self
    }

    /// Expected points per scenario: whole months in range plus the horizon point
    fn expected_points(&self) -> usize {
        months_between(self.start_date, self.end_date).max(0) as usize + 1
    }
}

/// Projection engine holding a fixed set of rate assumptions
///
/// The engine's rates take precedence over `params.rates`, so one engine can
/// project many pensions under the same assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionEngine {
    rates: ScenarioRates,
}

impl ProjectionEngine {
    pub fn new(rates: ScenarioRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &ScenarioRates {
        &self.rates
    }

    /// Run all three scenarios for one pension
    pub fn project(&self, params: &ProjectionParams) -> CombinedScenariosOutput {
        project_with_rates(params, &self.rates)
    }

    /// Run one scenario at the engine's rate for it
    pub fn project_scenario(&self, params: &ProjectionParams, scenario_type: ScenarioType) -> ProjectionScenario {
        project_at_rate(params, scenario_type, self.rates.rate(scenario_type))
    }
}

/// Project all three scenarios in one shared monthly loop
pub fn project(params: &ProjectionParams) -> CombinedScenariosOutput {
    project_with_rates(params, &params.rates)
}

fn project_with_rates(params: &ProjectionParams, rates: &ScenarioRates) -> CombinedScenariosOutput {
    let started = Instant::now();

    let capacity = params.expected_points();
    let mut tracks = ScenarioType::ALL.map(|scenario_type| {
        ScenarioTrack::new(scenario_type, rates.rate(scenario_type), params.initial_value, capacity)
    });

    let total_contributions = run_tracks(params, &mut tracks);
    let data_points = tracks[0].points.len();

    let [pessimistic, realistic, optimistic] =
        tracks.map(|t| t.into_scenario(params.initial_value, total_contributions));

    CombinedScenariosOutput {
        pessimistic,
        realistic,
        optimistic,
        metadata: ProjectionMetadata {
            computation_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            data_points,
            start_date: params.start_date,
            end_date: params.end_date,
            total_contributions,
            initial_value: params.initial_value,
        },
    }
}

/// Project a single scenario using its rate from `params.rates`
pub fn project_scenario(params: &ProjectionParams, scenario_type: ScenarioType) -> ProjectionScenario {
    project_at_rate(params, scenario_type, params.rates.rate(scenario_type))
}

/// Project one value path at an explicit annual rate (percent)
pub fn project_at_rate(
    params: &ProjectionParams,
    scenario_type: ScenarioType,
    annual_rate: f64,
) -> ProjectionScenario {
    let mut tracks = [ScenarioTrack::new(
        scenario_type,
        annual_rate,
        params.initial_value,
        params.expected_points(),
    )];

    let total_contributions = run_tracks(params, &mut tracks);
    let [track] = tracks;
    track.into_scenario(params.initial_value, total_contributions)
}

/// Drive every track from the start date to the horizon
///
/// One schedule lookup per month feeds all tracks. The loop covers dates
/// strictly before the end date, then one more update is keyed on the end
/// date itself so the horizon always has its own point. A whole-month range
/// of N months therefore compounds N + 1 times; a mid-month end date applies
/// its month twice (last loop month and horizon).
///
/// Returns the final accumulated contributions, historical total included.
fn run_tracks(params: &ProjectionParams, tracks: &mut [ScenarioTrack]) -> f64 {
    let steps = &params.contribution_steps;
    let mut accumulated = historical_total(&params.historical_contributions);

    let mut current = params.start_date;
    while current < params.end_date {
        let contribution = contribution_for(current, steps);
        accumulated += contribution;
        for track in tracks.iter_mut() {
            track.advance(current, contribution, accumulated);
        }

        match next_month(current) {
            Some(next) => current = next,
            None => break,
        }
    }

    let contribution = contribution_for(params.end_date, steps);
    accumulated += contribution;
    for track in tracks.iter_mut() {
        track.advance(params.end_date, contribution, accumulated);
    }

    accumulated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Frequency;
    use approx::assert_relative_eq;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_params() -> ProjectionParams {
        ProjectionParams::new(1000.0, date(2024, 1, 1), date(2025, 1, 1))
            .with_steps(vec![ContributionStep::new(100.0, Frequency::Monthly, date(2024, 1, 1))])
            .with_rates(ScenarioRates::new(4.0, 7.0, 10.0))
    }

    fn compound(initial: f64, contribution: f64, annual_percent: f64, months: usize) -> f64 {
        let monthly = annual_percent / 100.0 / 12.0;
        (0..months).fold(initial, |v, _| (v + contribution) * (1.0 + monthly))
    }

    #[test]
    fn test_reference_projection() {
        let output = project(&reference_params());

        for scenario in output.scenarios() {
            assert_eq!(scenario.data_points.len(), 13);
            assert_relative_eq!(scenario.total_contributions, 1300.0);
        }
        assert_eq!(output.metadata.data_points, 13);
        assert_relative_eq!(output.metadata.total_contributions, 1300.0);

        assert_relative_eq!(
            output.realistic.final_value,
            compound(1000.0, 100.0, 7.0, 13),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            output.pessimistic.final_value,
            compound(1000.0, 100.0, 4.0, 13),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            output.realistic.total_returns,
            output.realistic.final_value - 1300.0 - 1000.0
        );
    }

    #[test]
    fn test_point_dates_and_horizon() {
        let output = project(&reference_params());
        let points = &output.realistic.data_points;

        assert_eq!(points[0].date, date(2024, 1, 1));
        assert_eq!(points[11].date, date(2024, 12, 1));
        // Horizon point is dated at the end date itself
        assert_eq!(points[12].date, date(2025, 1, 1));
        assert_eq!(points[12].contribution_amount, 100.0);
        assert_relative_eq!(points[12].accumulated_contributions, 1300.0);
        assert!(points.iter().all(|p| p.is_projection));
        assert!(points.iter().all(|p| p.scenario_type == ScenarioType::Realistic));
    }

    #[test]
    fn test_whole_month_range_has_extra_horizon_update() {
        // 24 whole months -> 24 loop points + 1 horizon point, 25 contributions
        let params = ProjectionParams::new(0.0, date(2024, 1, 1), date(2026, 1, 1))
            .with_steps(vec![ContributionStep::new(10.0, Frequency::Monthly, date(2024, 1, 1))])
            .with_rates(ScenarioRates::uniform(0.0));

        let output = project(&params);
        assert_eq!(output.metadata.data_points, 25);
        assert_relative_eq!(output.metadata.total_contributions, 250.0);
    }

    #[test]
    fn test_mid_month_horizon() {
        let params = ProjectionParams::new(0.0, date(2024, 1, 1), date(2024, 3, 15))
            .with_steps(vec![ContributionStep::new(10.0, Frequency::Monthly, date(2024, 1, 1))])
            .with_rates(ScenarioRates::uniform(0.0));

        let output = project(&params);
        let dates: Vec<_> = output.realistic.data_points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1), date(2024, 3, 15)]);
        // March is applied by both the loop and the horizon point
        assert_relative_eq!(output.realistic.final_value, 40.0);
    }

    #[test]
    fn test_monotonic_ordering() {
        let output = project(&reference_params());
        assert!(output.pessimistic.final_value <= output.realistic.final_value);
        assert!(output.realistic.final_value <= output.optimistic.final_value);
        assert!(output.summary().spread > 0.0);
    }

    #[test]
    fn test_contributions_rate_independent() {
        let params = reference_params().with_steps(vec![
            ContributionStep::new(100.0, Frequency::Monthly, date(2024, 1, 1))
                .ending(date(2024, 6, 1)),
            ContributionStep::new(900.0, Frequency::Quarterly, date(2024, 7, 1)),
        ]);
        let output = project(&params);

        let totals: Vec<f64> = output.scenarios().iter().map(|s| s.total_contributions).collect();
        assert_eq!(totals[0], totals[1]);
        assert_eq!(totals[1], totals[2]);
        // Jan-Jun monthly (600) + Jul, Oct, Jan horizon quarterly (2700)
        assert_relative_eq!(totals[0], 3300.0);
    }

    #[test]
    fn test_zero_rate_identity() {
        let params = reference_params().with_rates(ScenarioRates::uniform(0.0));
        let output = project(&params);

        for scenario in output.scenarios() {
            assert_eq!(scenario.final_value, 1000.0 + scenario.total_contributions);
            assert_eq!(scenario.total_returns, 0.0);
        }
    }

    #[test]
    fn test_deterministic_for_equal_inputs() {
        let a = project(&reference_params());
        let b = project(&reference_params());

        for t in ScenarioType::ALL {
            assert_eq!(a.scenario(t), b.scenario(t));
            assert_eq!(a.scenario(t).final_value.to_bits(), b.scenario(t).final_value.to_bits());
        }
    }

    #[test]
    fn test_historical_contributions_seed_accumulated_only() {
        let params = reference_params()
            .with_history(vec![HistoricalContribution::new(500.0), HistoricalContribution::new(250.0)]);
        let with_history = project(&params);
        let without = project(&reference_params());

        assert_relative_eq!(with_history.metadata.total_contributions, 2050.0);
        assert_relative_eq!(with_history.realistic.data_points[0].accumulated_contributions, 850.0);
        assert_eq!(with_history.realistic.final_value, without.realistic.final_value);
        assert_eq!(with_history.metadata.initial_value, 1000.0);
        assert_relative_eq!(
            with_history.realistic.total_returns,
            without.realistic.total_returns - 750.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_empty_schedule_is_pure_growth() {
        let params = ProjectionParams::new(1000.0, date(2024, 1, 1), date(2024, 7, 1))
            .with_rates(ScenarioRates::new(4.0, 7.0, 10.0));
        let output = project(&params);

        assert_eq!(output.metadata.total_contributions, 0.0);
        assert_relative_eq!(
            output.optimistic.final_value,
            compound(1000.0, 0.0, 10.0, 7),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_end_not_after_start_yields_horizon_point_only() {
        let steps = vec![ContributionStep::new(100.0, Frequency::Monthly, date(2024, 1, 1))];

        let same_day = ProjectionParams::new(1000.0, date(2024, 6, 1), date(2024, 6, 1))
            .with_steps(steps.clone());
        let output = project(&same_day);
        assert_eq!(output.metadata.data_points, 1);
        assert_eq!(output.realistic.data_points[0].date, date(2024, 6, 1));
        assert_eq!(output.realistic.total_contributions, 100.0);

        let inverted = ProjectionParams::new(1000.0, date(2025, 1, 1), date(2024, 1, 1))
            .with_steps(steps);
        let output = project(&inverted);
        assert_eq!(output.metadata.data_points, 1);
        assert_eq!(output.pessimistic.data_points[0].date, date(2024, 1, 1));
    }

    #[test]
    fn test_nan_rate_propagates() {
        let params = reference_params().with_rates(ScenarioRates::new(4.0, f64::NAN, 10.0));
        let output = project(&params);

        assert!(output.realistic.final_value.is_nan());
        assert!(output.pessimistic.final_value.is_finite());
    }

    #[test]
    fn test_single_scenario_matches_combined() {
        let params = reference_params();
        let combined = project(&params);

        for t in ScenarioType::ALL {
            assert_eq!(&project_scenario(&params, t), combined.scenario(t));
        }
    }

    #[test]
    fn test_project_at_rate() {
        let scenario = project_at_rate(&reference_params(), ScenarioType::Realistic, 12.0);
        assert_eq!(scenario.return_rate, 12.0);
        assert_relative_eq!(scenario.final_value, compound(1000.0, 100.0, 12.0, 13), max_relative = 1e-12);
    }

    #[test]
    fn test_engine_rates_override_params() {
        let engine = ProjectionEngine::new(ScenarioRates::uniform(0.0));
        let params = reference_params();

        let output = engine.project(&params);
        for t in ScenarioType::ALL {
            assert_eq!(output.scenario(t).return_rate, 0.0);
            assert_relative_eq!(output.scenario(t).final_value, 1000.0 + 13.0 * 100.0);
        }
        assert_eq!(engine.project_scenario(&params, ScenarioType::Optimistic), output.optimistic);

        let default_engine = ProjectionEngine::default();
        assert_eq!(default_engine.rates(), &ScenarioRates::default());
        assert_eq!(default_engine.project(&params).realistic, project(&params).realistic);
    }

    #[test]
    fn test_calendar_exhausted_still_emits_horizon() {
        let start = date(NaiveDate::MAX.year(), 10, 1);
        let params = ProjectionParams::new(100.0, start, NaiveDate::MAX);
        let output = project(&params);

        // Oct, Nov, Dec, then the horizon once next_month runs out
        assert_eq!(output.metadata.data_points, 4);
        let last = output.realistic.horizon_point().unwrap();
        assert_eq!(last.date, NaiveDate::MAX);
        assert_eq!(output.realistic.data_points[2].date, date(NaiveDate::MAX.year(), 12, 1));
    }

    #[test]
    fn test_params_json_round_trip_shape() {
        let json = r#"{
            "initialValue": 1000.0,
            "contributionSteps": [
                {"amount": 100.0, "frequency": "MONTHLY", "startDate": "2024-01-01"}
            ],
            "rates": {"pessimistic": 4.0, "realistic": 7.0, "optimistic": 10.0},
            "startDate": "2024-01-01",
            "endDate": "2025-01-01"
        }"#;
        let params: ProjectionParams = serde_json::from_str(json).unwrap();
        assert_eq!(params, reference_params());
    }
}
