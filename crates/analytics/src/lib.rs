//! # Meridian Analytics Engine
//!
//! This crate derives the deterministic half of every client report: the
//! reporting windows, the aggregated metric sets, the period-over-period
//! deltas, the best-performing channel and the daily ROI trend. It is the
//! "truth source" of the system: the narrative layer may describe these
//! numbers but never recomputes them.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate.** No knowledge of external systems; depends only on
//!   `core-types`.
//! - **Stateless calculation.** The `AnalyticsEngine` takes the cleaned record
//!   set plus a resolved `ReportingWindow` and produces `ClientReport`s. This
//!   makes it reliable and easy to test.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod period;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use period::ReportingWindow;
pub use report::{ClientReport, DeltaSet, MetricSet, ReportBundle, TrendPoint};
