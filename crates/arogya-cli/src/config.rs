//! Host configuration loading from file and environment variables.

use arogya_types::LanguageCatalog;
use arogya_voice::{VoiceConfig, VoiceError};
use serde::Deserialize;
use thiserror::Error;

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Recognition and synthesis settings.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "arogya_voice=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but a value is out of range.
    #[error(transparent)]
    Invalid(#[from] VoiceError),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `AROGYA_LANGUAGE` overrides `voice.default_language`
/// - `AROGYA_RETRY_BACKOFF_MS` overrides `voice.retry.backoff_ms`
/// - `AROGYA_SPEECH_RATE` overrides `voice.speech.rate`
/// - `AROGYA_LOG_LEVEL` overrides `logging.level`
/// - `AROGYA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if the resulting voice settings fail validation.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config.voice.validate(&LanguageCatalog::builtin())?;
    Ok(config)
}

/// Applies `AROGYA_*` overrides read through `lookup`. Values that do not
/// parse are skipped.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(language) = lookup("AROGYA_LANGUAGE") {
        config.voice.default_language = language;
    }
    if let Some(backoff) = lookup("AROGYA_RETRY_BACKOFF_MS") {
        match backoff.parse() {
            Ok(parsed) => config.voice.retry.backoff_ms = parsed,
            Err(_) => tracing::warn!(value = %backoff, "ignoring AROGYA_RETRY_BACKOFF_MS"),
        }
    }
    if let Some(rate) = lookup("AROGYA_SPEECH_RATE") {
        match rate.parse() {
            Ok(parsed) => config.voice.speech.rate = parsed,
            Err(_) => tracing::warn!(value = %rate, "ignoring AROGYA_SPEECH_RATE"),
        }
    }
    if let Some(level) = lookup("AROGYA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("AROGYA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
