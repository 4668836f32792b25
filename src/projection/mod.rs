//! Projection engine for three-scenario pension value projections

mod state;
mod engine;
mod output;
mod cache;

pub use state::{ScenarioTrack, monthly_rate};
pub use engine::{
    project, project_scenario, project_at_rate, ProjectionEngine, ProjectionParams, ScenarioRates,
    DEFAULT_PESSIMISTIC_RATE, DEFAULT_REALISTIC_RATE, DEFAULT_OPTIMISTIC_RATE,
};
pub use output::{
    CombinedScenariosOutput, ProjectionDataPoint, ProjectionMetadata, ProjectionScenario,
    ProjectionSummary, ScenarioType,
};
pub use cache::ProjectionCache;
