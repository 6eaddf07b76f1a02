use serde::{Deserialize, Serialize};

use crate::ReasoningApi;

/// Fixed priority list for model resolution: best reasoning first, then the
/// fast tier, then the legacy identifier.
pub const MODEL_PRIORITY: [&str; 3] = [
    "models/gemini-1.5-pro",
    "models/gemini-1.5-flash",
    "models/gemini-pro",
];

/// The outcome of capability discovery for a run.
///
/// The set of authorized models varies by credential and by service-side
/// availability, so the pipeline never hardcodes a single identifier. A run
/// without a usable model is still a valid run; downstream stages fall back
/// to demo narratives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapability {
    pub model: Option<String>,
}

impl ModelCapability {
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }
}

/// Queries the service for the credential's authorized models and resolves
/// one usable identifier. Any discovery failure degrades to "no model" rather
/// than aborting the run.
pub async fn discover_model(api: &dyn ReasoningApi) -> ModelCapability {
    tracing::info!("scanning for available reasoning models");

    let models = match api.list_models().await {
        Ok(models) => models,
        Err(err) => {
            tracing::warn!(error = %err, "model discovery failed; continuing without AI");
            return ModelCapability::unavailable();
        }
    };

    let generation_capable: Vec<String> = models
        .iter()
        .filter(|m| m.supports_generation())
        .map(|m| m.name.clone())
        .collect();

    match resolve_model(&generation_capable) {
        Some(model) => {
            tracing::info!(%model, "resolved reasoning model");
            ModelCapability { model: Some(model) }
        }
        None => {
            tracing::warn!("credential has no compatible generation model");
            ModelCapability::unavailable()
        }
    }
}

/// Resolves the single identifier to use from an available set.
///
/// Walks the priority list in order; failing that, falls back to the first
/// available identifier from the broader model family; failing that, none.
pub fn resolve_model(available: &[String]) -> Option<String> {
    for candidate in MODEL_PRIORITY {
        if available.iter().any(|name| name == candidate) {
            return Some(candidate.to_string());
        }
    }

    available
        .iter()
        .find(|name| name.contains("gemini"))
        .cloned()
}
