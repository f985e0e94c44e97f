//! Notification kind and record types.

use arogya_types::Severity;
use serde::{Deserialize, Serialize};

/// The closed set of notifications the voice layer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Microphone permission was granted.
    MicrophoneReady,
    /// Microphone permission was refused or revoked.
    MicrophoneDenied,
    /// The host has no speech recognition capability.
    VoiceUnsupported,
    /// A recognition session started listening.
    ListeningStarted,
    /// Recognition failed, found no speech, or could not start.
    VoiceInputError,
    /// Read-aloud playback started.
    PlaybackStarted,
    /// Read-aloud playback was stopped by the user.
    PlaybackStopped,
    /// The synthesis engine reported an error.
    PlaybackFailed,
}

impl NotificationKind {
    /// Returns the canonical string label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MicrophoneReady => "MICROPHONE_READY",
            Self::MicrophoneDenied => "MICROPHONE_DENIED",
            Self::VoiceUnsupported => "VOICE_UNSUPPORTED",
            Self::ListeningStarted => "LISTENING_STARTED",
            Self::VoiceInputError => "VOICE_INPUT_ERROR",
            Self::PlaybackStarted => "PLAYBACK_STARTED",
            Self::PlaybackStopped => "PLAYBACK_STOPPED",
            Self::PlaybackFailed => "PLAYBACK_FAILED",
        }
    }

    /// Severity a notification of this kind is presented with.
    pub fn severity(self) -> Severity {
        match self {
            Self::MicrophoneReady
            | Self::ListeningStarted
            | Self::PlaybackStarted
            | Self::PlaybackStopped => Severity::Info,
            Self::MicrophoneDenied
            | Self::VoiceUnsupported
            | Self::VoiceInputError
            | Self::PlaybackFailed => Severity::Destructive,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MICROPHONE_READY" => Ok(Self::MicrophoneReady),
            "MICROPHONE_DENIED" => Ok(Self::MicrophoneDenied),
            "VOICE_UNSUPPORTED" => Ok(Self::VoiceUnsupported),
            "LISTENING_STARTED" => Ok(Self::ListeningStarted),
            "VOICE_INPUT_ERROR" => Ok(Self::VoiceInputError),
            "PLAYBACK_STARTED" => Ok(Self::PlaybackStarted),
            "PLAYBACK_STOPPED" => Ok(Self::PlaybackStopped),
            "PLAYBACK_FAILED" => Ok(Self::PlaybackFailed),
            _ => Err(ParseNotificationKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown notification kind string.
#[derive(Debug, Clone)]
pub struct ParseNotificationKindError(pub String);

impl std::fmt::Display for ParseNotificationKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown notification kind: {}", self.0)
    }
}

impl std::error::Error for ParseNotificationKindError {}

/// A single user-facing status or error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// What happened.
    pub kind: NotificationKind,
    /// Short headline, e.g. "Microphone ready".
    pub title: String,
    /// One-sentence explanation or next step for the user.
    pub description: String,
    /// How prominently to present it.
    pub severity: Severity,
}

impl Notification {
    /// Builds a notification with the kind's default severity.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            severity: kind.severity(),
        }
    }

    /// Overrides the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns `true` if the notification is presented as an error.
    pub fn is_destructive(&self) -> bool {
        self.severity.is_destructive()
    }
}
