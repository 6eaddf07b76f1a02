use chrono::NaiveDate;
use core_types::{BaselineSource, NarrativeStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three headline metrics aggregated over one period's records.
///
/// An empty record subset has no MetricSet at all; aggregation returns
/// `None` rather than a misleading all-zero set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Total acquisition cost over the period.
    pub spend: Decimal,
    /// Arithmetic mean ROI over records with a defined ROI.
    pub roi: Decimal,
    /// Mean conversion rate, expressed as a percentage.
    pub conversion_pct: Decimal,
}

impl MetricSet {
    /// Placeholder baseline used when a client has no previous-period records.
    ///
    /// Carried over from the source system for numeric compatibility. The
    /// resulting deltas are finite but meaningless, which is why every report
    /// built against this baseline is tagged `BaselineSource::Sentinel`.
    pub fn sentinel() -> Self {
        Self {
            spend: Decimal::ONE,
            roi: Decimal::ONE,
            conversion_pct: Decimal::ONE,
        }
    }
}

/// Percentage change between two MetricSets, dimension by dimension.
///
/// A component is `None` when the previous value was zero; the calculator
/// never divides by zero and never invents a direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaSet {
    pub spend_pct: Option<Decimal>,
    pub roi_pct: Option<Decimal>,
    pub conversion_pct: Option<Decimal>,
}

/// One point of the daily ROI trend series consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub roi: Decimal,
}

/// The full per-client report record.
///
/// Created once per distinct client per run and mutated in exactly two
/// stages: the analytics engine fills the numbers, the narrator fills the
/// narrative. Read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientReport {
    pub id: Uuid,
    pub company: String,
    pub current: MetricSet,
    pub previous: MetricSet,
    /// Whether `previous` was observed or substituted. Renderers must label
    /// sentinel-based comparisons "insufficient prior data".
    pub baseline: BaselineSource,
    pub delta: DeltaSet,
    pub best_channel: String,
    pub best_channel_roi: Decimal,
    pub trend: Vec<TrendPoint>,
    pub narrative: String,
    pub narrative_status: NarrativeStatus,
}

/// Everything a renderer needs for one run, serialized as a single JSON
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    pub period: String,
    /// Identifier of the reasoning model used, if any was available.
    pub model: Option<String>,
    pub reports: Vec<ClientReport>,
}
