//! Contribution step data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;

/// How often a contribution step pays in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
    /// Single payment in the step's start month
    OneTime,
    /// Label not recognised when the schedule was deserialized; never pays
    #[serde(other)]
    Unknown,
}

impl Frequency {
    /// Label used in CSV and JSON inputs
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::SemiAnnually => "SEMI_ANNUALLY",
            Frequency::Annually => "ANNUALLY",
            Frequency::OneTime => "ONE_TIME",
            Frequency::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(Frequency::Monthly),
            "QUARTERLY" => Ok(Frequency::Quarterly),
            "SEMI_ANNUALLY" => Ok(Frequency::SemiAnnually),
            "ANNUALLY" => Ok(Frequency::Annually),
            "ONE_TIME" => Ok(Frequency::OneTime),
            _ => Err(ProjectionError::UnknownFrequency(s.to_string())),
        }
    }
}

/// One segment of a pension's planned contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStep {
    /// Amount paid in on each due month
    pub amount: f64,

    pub frequency: Frequency,

    /// First month the step is active
    pub start_date: NaiveDate,

    /// Last month the step is active; open-ended when absent
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ContributionStep {
    pub fn new(amount: f64, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            amount,
            frequency,
            start_date,
            end_date: None,
            note: None,
        }
    }

    /// Builder-style end date
    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Builder-style note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// An already-realised contribution, counted towards accumulated contributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalContribution {
    pub amount: f64,
}

impl HistoricalContribution {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

/// Total of all historical contributions
pub fn historical_total(contributions: &[HistoricalContribution]) -> f64 {
    contributions.iter().map(|c| c.amount).sum()
}
