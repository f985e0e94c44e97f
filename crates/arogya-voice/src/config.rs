use arogya_types::{LanguageCatalog, DEFAULT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::VoiceError;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_max_retries() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    100
}

fn default_rate() -> f32 {
    0.9
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

/// Settings for both voice controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Locale selected for recognition until the user picks another one.
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub speech: SpeechParams,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            retry: RetryConfig::default(),
            speech: SpeechParams::default(),
        }
    }
}

impl VoiceConfig {
    /// Checks every value against its allowed range and the default language
    /// against `catalog`.
    pub fn validate(&self, catalog: &LanguageCatalog) -> Result<(), VoiceError> {
        if !catalog.contains(&self.default_language) {
            return Err(VoiceError::Config(format!(
                "default_language {:?} is not a supported language",
                self.default_language
            )));
        }
        self.retry.validate()?;
        self.speech.validate()
    }
}

/// Restart behaviour when the recognition engine reports it is still busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Restarts attempted before giving up. At most 1.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between stopping the busy engine and starting again.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), VoiceError> {
        if self.max_retries > 1 {
            return Err(VoiceError::Config(
                "retry.max_retries must be 0 or 1".to_string(),
            ));
        }
        if self.backoff_ms > 10_000 {
            return Err(VoiceError::Config(
                "retry.backoff_ms must not exceed 10000".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.min(1),
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

/// Runtime form of [`RetryConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().policy()
    }
}

impl RetryPolicy {
    /// Fail on the first refusal.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

/// Prosody applied to every utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Speaking rate multiplier; slightly below 1.0 for clarity.
    #[serde(default = "default_rate")]
    pub rate: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

impl SpeechParams {
    pub fn validate(&self) -> Result<(), VoiceError> {
        if !(0.1..=10.0).contains(&self.rate) {
            return Err(VoiceError::Config(
                "Rate must be between 0.1 and 10.0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.pitch) {
            return Err(VoiceError::Config(
                "Pitch must be between 0.0 and 2.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(VoiceError::Config(
                "Volume must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}
