use std::time::Duration;

use async_trait::async_trait;
use configuration::{ApiSettings, GenerationSettings};
use serde::Serialize;

use crate::error::ApiError;
use crate::responses::{ApiErrorResponse, GenerateContentResponse, ListModelsResponse};

pub mod discovery;
pub mod error;
pub mod responses;

// --- Public API ---
pub use discovery::{MODEL_PRIORITY, ModelCapability, discover_model, resolve_model};
pub use responses::ModelInfo;

/// The generic, abstract interface for the external reasoning service.
/// This trait is the contract the narrative pipeline uses, allowing the
/// underlying implementation (live or stub) to be swapped out.
#[async_trait]
pub trait ReasoningApi: Send + Sync {
    /// Enumerates the models the caller's credential is authorized to use.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;

    /// Runs one synchronous text-generation call against `model`.
    async fn generate(
        &self,
        model: &str,
        config: &GenerationSettings,
        prompt: &str,
    ) -> Result<String, ApiError>;
}

/// A concrete `ReasoningApi` for the Google Generative Language REST API.
///
/// The credential travels as a query parameter on every call and lives only
/// in this struct for the duration of the run.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// The JSON payload for a `generateContent` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: RequestGenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    temperature: f32,
    top_k: u32,
}

impl GeminiClient {
    pub fn new(api_key: String, api_settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: api_settings.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Decodes a response body, mapping non-success statuses onto the
    /// service's structured error payload.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let api_error: ApiErrorResponse = serde_json::from_str(&text).map_err(|e| {
                ApiError::Deserialization(format!(
                    "Failed to deserialize error response: {}. Original text: {}",
                    e, text
                ))
            })?;
            Err(ApiError::Service(api_error.error.code, api_error.error.message))
        }
    }
}

#[async_trait]
impl ReasoningApi for GeminiClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        // The model list is paginated; walk every page so discovery sees the
        // full authorization set.
        loop {
            let mut query: Vec<(&str, &str)> = vec![("key", self.api_key.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let page: ListModelsResponse = Self::decode(response).await?;

            models.extend(page.models);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    async fn generate(
        &self,
        model: &str,
        config: &GenerationSettings,
        prompt: &str,
    ) -> Result<String, ApiError> {
        // `model` is already fully qualified ("models/gemini-..."), so it maps
        // straight into the URL path.
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, model);

        let payload = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: RequestGenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await?;

        let body: GenerateContentResponse = Self::decode(response).await?;
        body.into_text()
            .ok_or_else(|| ApiError::EmptyResponse(format!("no candidate text from {model}")))
    }
}
