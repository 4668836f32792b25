//! JSON request documents for the CLI and household runner
//!
//! A request carries one pension's inputs; omitted fields fall back to
//! defaults the same way the projection params do.

use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::projection::{
    ProjectionParams, ScenarioRates, DEFAULT_OPTIMISTIC_RATE, DEFAULT_PESSIMISTIC_RATE,
    DEFAULT_REALISTIC_RATE,
};
use crate::schedule::{validate_steps, warn_overlapping_steps, ContributionStep, HistoricalContribution};

/// Input configuration for one pension projection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    /// Label used in logs and batch output
    #[serde(default)]
    pub name: Option<String>,

    /// Current market value (default: 0)
    #[serde(default)]
    pub initial_value: f64,

    #[serde(default)]
    pub contribution_steps: Vec<ContributionStep>,

    /// Annual return assumptions in percent (default: 4 / 7 / 10)
    #[serde(default)]
    pub rates: RatesRequest,

    pub start_date: NaiveDate,

    /// Projection horizon, usually the planned retirement date
    pub end_date: NaiveDate,

    #[serde(default)]
    pub historical_contributions: Vec<HistoricalContribution>,
}

/// Partially specified rates; missing scenarios use the defaults
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatesRequest {
    #[serde(default = "default_pessimistic")]
    pub pessimistic: f64,
    #[serde(default = "default_realistic")]
    pub realistic: f64,
    #[serde(default = "default_optimistic")]
    pub optimistic: f64,
}

fn default_pessimistic() -> f64 { DEFAULT_PESSIMISTIC_RATE }
fn default_realistic() -> f64 { DEFAULT_REALISTIC_RATE }
fn default_optimistic() -> f64 { DEFAULT_OPTIMISTIC_RATE }

impl Default for RatesRequest {
    fn default() -> Self {
        Self {
            pessimistic: DEFAULT_PESSIMISTIC_RATE,
            realistic: DEFAULT_REALISTIC_RATE,
            optimistic: DEFAULT_OPTIMISTIC_RATE,
        }
    }
}

impl From<RatesRequest> for ScenarioRates {
    fn from(r: RatesRequest) -> Self {
        ScenarioRates::new(r.pessimistic, r.realistic, r.optimistic)
    }
}

impl ProjectionRequest {
    /// Parse a request from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let request = Self::from_reader(BufReader::new(file))?;
        info!("Loaded projection request from {}", path.as_ref().display());
        Ok(request)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("pension")
    }

    /// Validate the schedule and build engine params
    ///
    /// Overlapping steps are accepted but logged, since list order then
    /// decides which step pays.
    pub fn into_params(self) -> Result<ProjectionParams> {
        validate_steps(&self.contribution_steps)?;

        warn_overlapping_steps(self.label(), &self.contribution_steps);

        Ok(ProjectionParams {
            initial_value: self.initial_value,
            contribution_steps: self.contribution_steps,
            rates: self.rates.into(),
            start_date: self.start_date,
            end_date: self.end_date,
            historical_contributions: self.historical_contributions,
        })
    }
}

/// Several pensions projected together
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRequest {
    pub pensions: Vec<ProjectionRequest>,
}

impl HouseholdRequest {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let request = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} pensions from {}",
            request.pensions.len(),
            path.as_ref().display()
        );
        Ok(request)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Labels and params for every pension, in file order
    pub fn into_params(self) -> Result<Vec<(String, ProjectionParams)>> {
        self.pensions
            .into_iter()
            .map(|p| {
                let label = p.label().to_string();
                p.into_params().map(|params| (label, params))
            })
            .collect()
    }
}
