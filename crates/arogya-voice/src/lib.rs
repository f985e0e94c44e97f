//! Multilingual voice interaction for the Arogya health assistant.
//!
//! Two controllers sit between the app and the host's speech engines:
//!
//! - [`SpeechCaptureController`] turns one spoken utterance into text. It
//!   prompts for microphone permission once, starts the recognition engine in
//!   the selected language, tracks interim results for display and hands each
//!   final transcript to a callback.
//! - [`SpeechSynthesisController`] reads text aloud, picking the installed
//!   voice that best matches the requested locale, and keeps at most one
//!   utterance playing.
//!
//! Neither controller touches a platform API. The host supplies the engines
//! through the traits in [`engine`] and feeds their callbacks back in with
//! `handle_event`. Status changes and failures surface as
//! [`arogya_notify::Notification`]s.

pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod permission;
pub mod selection;
pub mod session;
pub mod synthesis;

pub use capture::{SpeechCaptureController, TranscriptCallback};
pub use config::{RetryConfig, RetryPolicy, SpeechParams, VoiceConfig};
pub use engine::{
    AudioPermission, CaptureGrant, CaptureKind, EngineStartError, EngineUtterance,
    PermissionDenial, RecognitionConfig, RecognitionEngine, RecognitionErrorKind,
    RecognitionEvent, RecognitionEventKind, SessionId, SynthesisEngine, SynthesisEvent,
    UtteranceHandle, VoiceInfo,
};
pub use error::{VoiceError, VoiceResult};
pub use permission::{PermissionGate, PermissionState};
pub use selection::{resolve_voice, VoiceMatch, VoiceSelection};
pub use session::{CapturePhase, CaptureState, RecognitionSession};
pub use synthesis::{Completion, SpeechSynthesisController, UtteranceRequest};
