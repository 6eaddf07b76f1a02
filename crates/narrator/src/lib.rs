//! Narrative grounding.
//!
//! Bridges the deterministic report data to the external reasoning service:
//! builds a strict-truth prompt per client, runs exactly one generation call,
//! sanitizes the result, and falls back to fixed copy when the service is
//! unavailable or a call fails. A failed narrative never drops a report.

use analytics::ClientReport;
use api_client::{ModelCapability, ReasoningApi};
use configuration::GenerationSettings;
use core_types::NarrativeStatus;

pub mod error;
pub mod prompt;

// Re-export the key components to create a clean, public-facing API.
pub use error::NarratorError;
pub use prompt::{build_prompt, format_thousands, sanitize_narrative};

/// Fixed copy for a run that has no usable reasoning model at all.
pub const DEMO_NARRATIVE: &str = "Demo mode: AI analysis skipped.";

/// Fixed copy for a single client whose generation call failed.
pub const FALLBACK_NARRATIVE: &str = "AI narrative unavailable.";

/// Writes executive summaries onto client reports, one generation call per
/// client, sequentially.
///
/// The resolved model identifier and sampling configuration are shared and
/// read-only across every call in the run.
pub struct Narrator<'a> {
    api: Option<&'a dyn ReasoningApi>,
    capability: ModelCapability,
    generation: GenerationSettings,
}

impl<'a> Narrator<'a> {
    pub fn new(
        api: Option<&'a dyn ReasoningApi>,
        capability: ModelCapability,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            api,
            capability,
            generation,
        }
    }

    /// A narrator with no backing service; every report gets the demo copy.
    pub fn demo() -> Self {
        Self {
            api: None,
            capability: ModelCapability::unavailable(),
            generation: GenerationSettings::default(),
        }
    }

    /// Fills in the narrative for one report.
    ///
    /// State machine per report: `Pending -> Generating -> Done` on success,
    /// `Pending -> Skipped` when no model is available, and
    /// `Generating -> Failed` (with fallback copy) on any call failure. One
    /// attempt only; transient failures are not retried within a run.
    pub async fn narrate(&self, report: &mut ClientReport, period_label: &str) {
        let Some((api, model)) = self.api.zip(self.capability.model.as_deref()) else {
            report.narrative = DEMO_NARRATIVE.to_string();
            report.narrative_status = NarrativeStatus::Skipped;
            return;
        };

        tracing::info!(company = %report.company, "writing executive summary");
        report.narrative_status = NarrativeStatus::Generating;

        match self.try_generate(api, model, report, period_label).await {
            Ok(text) => {
                report.narrative = text;
                report.narrative_status = NarrativeStatus::Done;
            }
            Err(err) => {
                tracing::error!(company = %report.company, error = %err, "narrative generation failed");
                report.narrative = FALLBACK_NARRATIVE.to_string();
                report.narrative_status = NarrativeStatus::Failed;
            }
        }
    }

    async fn try_generate(
        &self,
        api: &dyn ReasoningApi,
        model: &str,
        report: &ClientReport,
        period_label: &str,
    ) -> Result<String, NarratorError> {
        let prompt = build_prompt(report, period_label);
        let raw = api.generate(model, &self.generation, &prompt).await?;
        Ok(sanitize_narrative(&raw))
    }
}
