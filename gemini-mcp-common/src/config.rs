//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use crate::transport::TransportMode;

/// Application configuration loaded once at startup.
///
/// Constructed from the environment and passed by value into every component
/// that needs it; there is no ambient global configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (required)
    pub api_key: String,
    /// Google Cloud project ID, when relevant for billing attribution
    pub project_id: Option<String>,
    /// Google Cloud location/region
    pub location: String,
    /// Directory where generated media and metadata sidecars are written
    pub output_dir: String,
    /// Transport selected via the TRANSPORT env var (CLI flag overrides)
    pub transport: TransportMode,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// Ensures the output directory exists; creation failure is a startup
    /// error.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if GOOGLE_API_KEY is not set, or
    /// `ConfigError::InvalidValue` for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self::load(|key| std::env::var(key).ok())?;

        std::fs::create_dir_all(&config.output_dir).map_err(|e| {
            ConfigError::invalid_value("OUTPUT_DIR", format!("cannot create {}: {}", config.output_dir, e))
        })?;

        Ok(config)
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Separated from `from_env` so the defaulting and parsing logic can be
    /// tested without touching process environment.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::missing_env_var("GOOGLE_API_KEY"))?;

        let project_id = lookup("GOOGLE_PROJECT_ID").filter(|v| !v.is_empty());

        let location = lookup("GOOGLE_LOCATION")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "us-central1".to_string());

        let output_dir = lookup("OUTPUT_DIR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "./output".to_string());

        let transport = match lookup("TRANSPORT") {
            Some(value) if !value.is_empty() => value
                .parse::<TransportMode>()
                .map_err(|e| ConfigError::invalid_value("TRANSPORT", e))?,
            _ => TransportMode::Stdio,
        };

        let port = match lookup("PORT") {
            Some(value) if !value.is_empty() => value
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid_value("PORT", e.to_string()))?,
            _ => 8080,
        };

        Ok(Self {
            api_key,
            project_id,
            location,
            output_dir,
            transport,
            port,
        })
    }
}
