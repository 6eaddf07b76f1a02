use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::PeriodTag;
use crate::error::CoreError;

/// A single marketing-activity observation, immutable once ingested.
///
/// One row of the input dataset after cleaning: the acquisition cost has been
/// normalized from its currency-formatted source string, and a ROI cell that
/// failed numeric coercion is carried as `None` rather than a fabricated zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub company: String,
    pub channel: String,
    /// Normalized acquisition cost in account currency.
    pub acquisition_cost: Decimal,
    /// Return on ad spend. `None` when the source cell was not numeric.
    pub roi: Option<Decimal>,
    /// Fractional conversion rate (0.04 = 4%).
    pub conversion_rate: Decimal,
}

/// A closed date range tagged as the current or previous reporting window.
///
/// Derived each run from the dataset's latest observation date and never
/// persisted, so report runs are reproducible for a fixed dataset regardless
/// of when they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
    tag: PeriodTag,
}

impl Period {
    /// Creates a period, enforcing that `end` is never earlier than `start`.
    pub fn new(start: NaiveDate, end: NaiveDate, tag: PeriodTag) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::InvalidInput(
                "Period".to_string(),
                format!("end {} precedes start {}", end, start),
            ));
        }
        Ok(Self { start, end, tag })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn tag(&self) -> PeriodTag {
        self.tag
    }

    /// Whether a date falls inside this period, inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
