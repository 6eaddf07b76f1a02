use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiSettings, GenerationSettings, ReportSettings, Settings};

/// Loads the application configuration.
///
/// Layers an optional `config.toml` under `MERIDIAN_*` environment overrides
/// (e.g. `MERIDIAN_API__TIMEOUT_SECS=10`), then deserializes into the
/// strongly-typed `Settings` struct. Every section has defaults, so a missing
/// file is not an error. The service credential is deliberately NOT part of
/// this struct; it is read from the environment once per run and never
/// persisted.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("MERIDIAN").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&settings.generation.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "generation.temperature must be within [0.0, 2.0], got {}",
            settings.generation.temperature
        )));
    }
    if settings.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}
