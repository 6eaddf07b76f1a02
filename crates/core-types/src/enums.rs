use serde::{Deserialize, Serialize};

/// Which of the two reporting windows a period represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodTag {
    Current,
    Previous,
}

/// Where a report's previous-period baseline came from.
///
/// `Sentinel` marks the degenerate case where a client had no records in the
/// previous period and the comparison was computed against placeholder values.
/// Renderers must label such comparisons "insufficient prior data" instead of
/// presenting the percentage as a real swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    Observed,
    Sentinel,
}

/// Lifecycle of a client report's narrative.
///
/// `Pending` -> `Generating` -> `Done` on a successful generation call;
/// `Pending` -> `Skipped` when no usable model was discovered for the run;
/// `Generating` -> `Failed` when the single generation attempt for this
/// client errored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStatus {
    Pending,
    Generating,
    Done,
    Skipped,
    Failed,
}
