//! Contribution schedules and month-by-month resolution

mod step;
mod resolver;
pub mod loader;

pub use step::{ContributionStep, Frequency, HistoricalContribution, historical_total};
pub use resolver::{contribution_for, overlapping_steps, validate_steps, warn_overlapping_steps};
pub use loader::{load_steps, load_steps_from_reader};
