//! Calendar month arithmetic shared by the resolver and the projection loop

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Same day one calendar month later
///
/// The day is clamped to the length of the target month (Jan 31 -> Feb 29 in
/// a leap year). Returns `None` only when the calendar range is exhausted.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// Whole calendar months from the month of `from` to the month of `to`
///
/// Day of month is ignored. Negative when `to` lies in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}
