//! Load contribution schedules from CSV
//!
//! Expected columns: `Amount,Frequency,StartDate,EndDate,Note`. Dates are
//! `YYYY-MM-DD`; `EndDate` and `Note` may be left empty.

use chrono::NaiveDate;
use csv::Reader;
use log::info;
use std::path::Path;

use super::step::{ContributionStep, Frequency};
use crate::error::{ProjectionError, Result};

/// Raw CSV row matching the schedule file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "EndDate", default)]
    end_date: Option<String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
}

impl CsvRow {
    fn to_step(self) -> Result<ContributionStep> {
        let frequency: Frequency = self.frequency.parse()?;
        let start_date = parse_date("StartDate", &self.start_date)?;

        let end_date = match self.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date("EndDate", raw)?),
        };

        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(ContributionStep {
            amount: self.amount,
            frequency,
            start_date,
            end_date,
            note,
        })
    }
}

/// Parse a `YYYY-MM-DD` date, naming the column on failure
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ProjectionError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Load all contribution steps from a CSV file, preserving file order
pub fn load_steps<P: AsRef<Path>>(path: P) -> Result<Vec<ContributionStep>> {
    let path = path.as_ref();
    let steps = read_steps(Reader::from_path(path)?)?;
    info!("Loaded {} contribution steps from {}", steps.len(), path.display());
    Ok(steps)
}

/// Load contribution steps from any reader (e.g., string buffer, request body)
pub fn load_steps_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ContributionStep>> {
    read_steps(Reader::from_reader(reader))
}

fn read_steps<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ContributionStep>> {
    let mut steps = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        steps.push(row.to_step()?);
    }

    Ok(steps)
}
