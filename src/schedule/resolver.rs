//! Resolve the contribution due in a given calendar month

use chrono::{Datelike, NaiveDate};
use log::warn;

use super::step::{ContributionStep, Frequency};
use crate::calendar::{month_start, months_between};
use crate::error::{ProjectionError, Result};

/// Contribution due in the month containing `date`
///
/// Steps are scanned in the given order and the first one whose active range
/// covers the month decides the amount, even when that amount is zero for
/// this particular month. Returns 0 when no step is active.
pub fn contribution_for(date: NaiveDate, steps: &[ContributionStep]) -> f64 {
    let month = month_start(date);

    steps
        .iter()
        .find(|step| is_active(step, month))
        .map(|step| amount_in_month(step, month))
        .unwrap_or(0.0)
}

/// Whether `step` covers `month` (first of month)
fn is_active(step: &ContributionStep, month: NaiveDate) -> bool {
    if month < month_start(step.start_date) {
        return false;
    }
    match step.end_date {
        Some(end) => month <= month_start(end),
        None => true,
    }
}

/// Amount an active step pays in `month`
fn amount_in_month(step: &ContributionStep, month: NaiveDate) -> f64 {
    let offset = months_between(step.start_date, month);

    let due = match step.frequency {
        Frequency::OneTime => offset == 0,
        Frequency::Monthly => true,
        Frequency::Quarterly => offset.rem_euclid(3) == 0,
        Frequency::SemiAnnually => offset.rem_euclid(6) == 0,
        Frequency::Annually => month.month() == step.start_date.month(),
        Frequency::Unknown => false,
    };

    if due {
        step.amount
    } else {
        0.0
    }
}

/// Pairs of step indices whose active month ranges intersect
///
/// Overlaps are legal input; resolution follows list order. This is a
/// diagnostic for callers that want to surface the ambiguity.
pub fn overlapping_steps(steps: &[ContributionStep]) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();

    for (i, a) in steps.iter().enumerate() {
        for (j, b) in steps.iter().enumerate().skip(i + 1) {
            let a_start = month_start(a.start_date);
            let b_start = month_start(b.start_date);
            let a_before_b_ends = b.end_date.map_or(true, |end| a_start <= month_start(end));
            let b_before_a_ends = a.end_date.map_or(true, |end| b_start <= month_start(end));
            if a_before_b_ends && b_before_a_ends {
                overlaps.push((i, j));
            }
        }
    }

    overlaps
}

/// Log a warning for every overlapping pair, returning how many were found
///
/// Only the earlier step of a pair can pay in the shared months, so a later
/// one-time or annual step hidden behind an open-ended monthly step never
/// contributes.
pub fn warn_overlapping_steps(label: &str, steps: &[ContributionStep]) -> usize {
    let overlaps = overlapping_steps(steps);
    for &(a, b) in &overlaps {
        warn!(
            "{}: contribution steps {} and {} overlap; step {} takes precedence",
            label, a, b, a
        );
    }
    overlaps.len()
}

/// Reject steps with negative or non-finite amounts, or an end before the start
///
/// The engine accepts anything; this is for the input edges that want to
/// refuse bad data before projecting.
pub fn validate_steps(steps: &[ContributionStep]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        if !step.amount.is_finite() || step.amount < 0.0 {
            return Err(ProjectionError::InvalidAmount {
                index,
                amount: step.amount,
            });
        }
        if let Some(end) = step.end_date {
            if month_start(end) < month_start(step.start_date) {
                return Err(ProjectionError::InvertedStep {
                    index,
                    start: step.start_date,
                    end,
                });
            }
        }
    }
    Ok(())
}
