//! Host capabilities the voice layer drives.
//!
//! The controllers never reach for a platform API directly. The host hands
//! them a recognition engine, a microphone-permission prompt and a synthesis
//! engine at construction time, and feeds engine callbacks back in as the
//! event types defined here.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::error::VoiceError;

/// Generation number of a recognition session.
///
/// Every start allocates a fresh id. Events tagged with an id the controller
/// is no longer listening on are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Settings applied to the recognition engine before each start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub language_code: String,
    /// Keep listening after the first final result.
    pub continuous: bool,
    /// Emit non-final results while the user is still speaking.
    pub interim_results: bool,
}

impl RecognitionConfig {
    /// One utterance per session, with interim results: the mode the capture
    /// controller always uses.
    pub fn single_utterance(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            continuous: false,
            interim_results: true,
        }
    }
}

/// Why the recognition engine refused to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineStartError {
    /// A previous session has not released the engine yet.
    #[error("recognition already started")]
    AlreadyRunning,
    #[error("{0}")]
    Failed(String),
}

/// Speech-to-text capability.
#[async_trait]
pub trait RecognitionEngine: Send {
    /// Applies language and result-mode settings for the next start.
    fn configure(&mut self, config: &RecognitionConfig);

    /// Starts listening. Resolves once the engine has accepted the request;
    /// results for this session must be reported with `session`.
    async fn start(&mut self, session: SessionId) -> Result<(), EngineStartError>;

    /// Asks the engine to stop. The engine may still deliver a trailing
    /// result or end event afterwards.
    fn stop(&mut self);
}

/// Error codes a recognition engine reports mid-session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// The user or platform refused microphone access.
    NotAllowed,
    /// The engine heard nothing before its own timeout.
    NoSpeech,
    /// The engine's backing service was unreachable.
    Network,
    /// The microphone could not be opened.
    AudioCapture,
    /// The session was aborted on request.
    Aborted,
    Other(String),
}

impl RecognitionErrorKind {
    /// Parses the error codes used by web-style recognition engines
    /// (`not-allowed`, `no-speech`, `network`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "permission-denied" | "service-not-allowed" => Self::NotAllowed,
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            "audio-capture" => Self::AudioCapture,
            "aborted" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }

    /// Maps the engine code onto the voice error taxonomy. `Aborted` maps to
    /// nothing: it only follows a stop the controller asked for.
    pub fn to_voice_error(&self) -> Option<VoiceError> {
        match self {
            Self::NotAllowed => Some(VoiceError::PermissionDenied(
                "recognition engine reported not-allowed".to_string(),
            )),
            Self::NoSpeech => Some(VoiceError::NoSpeechDetected),
            Self::Network => Some(VoiceError::Network),
            Self::AudioCapture => Some(VoiceError::RecognitionFailed(
                "microphone could not be opened".to_string(),
            )),
            Self::Aborted => None,
            Self::Other(code) => Some(VoiceError::RecognitionFailed(code.clone())),
        }
    }
}

/// Something the recognition engine reported about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEventKind {
    /// The engine acknowledged the start and is capturing audio.
    Started,
    /// A transcription, possibly revised later unless `is_final`.
    Result { text: String, is_final: bool },
    Error(RecognitionErrorKind),
    /// The session is over, for whatever reason.
    End,
}

/// A recognition engine callback, tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub session: SessionId,
    pub kind: RecognitionEventKind,
}

impl RecognitionEvent {
    pub fn started(session: SessionId) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Started,
        }
    }

    pub fn interim(session: SessionId, text: impl Into<String>) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Result {
                text: text.into(),
                is_final: false,
            },
        }
    }

    pub fn final_result(session: SessionId, text: impl Into<String>) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Result {
                text: text.into(),
                is_final: true,
            },
        }
    }

    pub fn error(session: SessionId, kind: RecognitionErrorKind) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Error(kind),
        }
    }

    pub fn end(session: SessionId) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::End,
        }
    }
}

/// Which capture device a permission request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Audio,
}

/// An open capture resource handed out by a successful permission prompt.
pub trait CaptureGrant: Send {
    /// Closes the underlying device.
    fn release(self: Box<Self>);
}

/// The user (or platform) refused a permission prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PermissionDenial {
    pub reason: String,
}

impl PermissionDenial {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Microphone permission prompt.
#[async_trait]
pub trait AudioPermission: Send {
    /// Prompts for access, resolving once the user has decided.
    async fn request_access(
        &mut self,
        kind: CaptureKind,
    ) -> Result<Box<dyn CaptureGrant>, PermissionDenial>;
}

/// A voice the synthesis engine can speak with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Locale tag, e.g. `en-GB`.
    pub tag: String,
    /// Engine-specific voice name.
    pub name: String,
}

impl VoiceInfo {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
        }
    }
}

/// Engine-assigned identifier of an enqueued utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceHandle(u64);

impl UtteranceHandle {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// Everything the synthesis engine needs to speak one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineUtterance {
    pub text: String,
    pub language_code: String,
    /// `None` lets the engine pick its default voice for `language_code`.
    pub voice_name: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Text-to-speech capability.
pub trait SynthesisEngine: Send {
    /// Voices currently installed.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Queues an utterance for playback.
    fn enqueue(&mut self, utterance: &EngineUtterance) -> UtteranceHandle;

    /// Stops playback and drops anything queued.
    fn cancel(&mut self);

    /// Live playback flag.
    fn is_speaking(&self) -> bool;
}

/// A synthesis engine callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// The utterance played to the end.
    UtteranceEnd(UtteranceHandle),
    /// Playback failed with an engine-specific error code.
    UtteranceError(UtteranceHandle, String),
}
