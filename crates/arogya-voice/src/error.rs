use arogya_notify::{Notification, NotificationKind};
use thiserror::Error;

const SETTINGS_HINT: &str = "Please allow microphone access in your settings to use voice input.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("speech recognition is not supported on this device")]
    Unsupported,

    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("no speech detected")]
    NoSpeechDetected,

    #[error("recognition network error")]
    Network,

    /// Internal; recovered by a bounded restart and never reported as-is.
    #[error("recognition already running")]
    AlreadyRunning,

    #[error("could not start recognition: {0}")]
    StartFailed(String),

    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("speech synthesis error: {0}")]
    SynthesisFailed(String),

    /// The utterance was cancelled by `stop()` or replaced by a newer one.
    #[error("utterance interrupted")]
    Interrupted,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VoiceError {
    /// The notification shown to the user for this error, if any.
    pub fn notification(&self) -> Option<Notification> {
        let notification = match self {
            Self::Unsupported => Notification::new(
                NotificationKind::VoiceUnsupported,
                "Voice input not supported",
                "This device doesn't support voice input. Please type your request instead.",
            ),
            Self::PermissionDenied(reason) => {
                let description = if reason.trim().is_empty() {
                    SETTINGS_HINT.to_string()
                } else {
                    format!("{SETTINGS_HINT} ({reason})")
                };
                Notification::new(
                    NotificationKind::MicrophoneDenied,
                    "Microphone access denied",
                    description,
                )
            }
            Self::NoSpeechDetected => {
                voice_input_error("No speech detected. Please try speaking again.")
            }
            Self::Network => voice_input_error("Network error. Please check your connection."),
            Self::AlreadyRunning | Self::StartFailed(_) => {
                voice_input_error("Could not start voice recognition. Please try again.")
            }
            Self::RecognitionFailed(_) => {
                voice_input_error("Could not process voice input. Please try again.")
            }
            Self::SynthesisFailed(_) => Notification::new(
                NotificationKind::PlaybackFailed,
                "Audio playback failed",
                "Please check your device settings and try again",
            ),
            Self::Interrupted | Self::UnsupportedLanguage(_) | Self::Config(_) => return None,
        };
        Some(notification)
    }
}

fn voice_input_error(description: &str) -> Notification {
    Notification::new(NotificationKind::VoiceInputError, "Voice input error", description)
}

pub type VoiceResult<T> = Result<T, VoiceError>;
