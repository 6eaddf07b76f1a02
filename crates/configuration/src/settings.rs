use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Endpoint parameters for the reasoning service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// Bounded timeout applied to every outbound call, in seconds. Expiry is
    /// treated the same as any other generation failure.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Sampling parameters shared by every narrative call in a run.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// 0.7 balances creative phrasing with professional consistency.
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
        }
    }
}

/// Where the rendered report bundle is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            generation: GenerationSettings::default(),
            report: ReportSettings::default(),
        }
    }
}
