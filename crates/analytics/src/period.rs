use chrono::{Datelike, Days, NaiveDate};
use core_types::{CoreError, Period, PeriodTag};

use crate::error::AnalyticsError;

/// The two reporting windows for a run, anchored to the dataset itself.
///
/// `current` spans from the first day of the month containing the latest
/// observation up to that observation; `previous` is the whole prior calendar
/// month. Anchoring to the data rather than wall-clock time keeps report runs
/// reproducible for a fixed dataset regardless of when they execute.
#[derive(Debug, Clone)]
pub struct ReportingWindow {
    pub current: Period,
    pub previous: Period,
    /// Human-readable label for the current window, e.g. "March 2026".
    pub label: String,
}

impl ReportingWindow {
    /// Resolves both windows from the dataset's maximum observed date.
    pub fn resolve(last_date: NaiveDate) -> Result<Self, AnalyticsError> {
        let current_start = first_of_month(last_date);
        // The day before the current month started is always the last day of
        // the prior month, including across a year boundary.
        let previous_end = current_start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| AnalyticsError::InvalidWindow("date underflow".to_string()))?;
        let previous_start = first_of_month(previous_end);

        let current = Period::new(current_start, last_date, PeriodTag::Current)
            .map_err(invalid_window)?;
        let previous = Period::new(previous_start, previous_end, PeriodTag::Previous)
            .map_err(invalid_window)?;

        Ok(Self {
            current,
            previous,
            label: current_start.format("%B %Y").to_string(),
        })
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // with_day(1) cannot fail: every month has a first day.
    date.with_day(1).unwrap_or(date)
}

fn invalid_window(err: CoreError) -> AnalyticsError {
    AnalyticsError::InvalidWindow(err.to_string())
}
