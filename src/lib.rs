//! Pension Projection - Deterministic multi-scenario projections for personal pensions
//!
//! This library provides:
//! - Contribution schedule resolution (monthly, quarterly, semi-annual, annual, one-time steps)
//! - Monthly compounding projections under pessimistic / realistic / optimistic rates
//! - Combined three-scenario runs sharing one monthly loop
//! - Input-memoised projection cache and parallel household batches

pub mod calendar;
pub mod config;
pub mod error;
pub mod schedule;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use schedule::{ContributionStep, Frequency, HistoricalContribution, contribution_for};
pub use projection::{
    project, CombinedScenariosOutput, ProjectionCache, ProjectionDataPoint, ProjectionEngine, ProjectionParams,
    ProjectionScenario, ScenarioRates, ScenarioType,
};
pub use scenario::{HouseholdProjection, ScenarioRunner};
