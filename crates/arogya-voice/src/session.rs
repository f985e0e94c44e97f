//! Recognition session state and its transition function.
//!
//! [`transition`] is the whole of the capture state machine's reaction to
//! engine events: it takes the current state and one event and returns the
//! next state plus the side effects the controller must perform. It does no
//! I/O, so every path through it is unit-testable without an engine.

use std::fmt;

use tracing::debug;

use crate::engine::{RecognitionEvent, RecognitionEventKind, SessionId};
use crate::error::VoiceError;

/// Coarse phase of the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    AwaitingPermission,
    Listening,
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AwaitingPermission => "awaiting-permission",
            Self::Listening => "listening",
        })
    }
}

/// One listen-start-to-listen-end lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSession {
    pub id: SessionId,
    /// Locale the engine was configured with at start.
    pub language_code: String,
    /// Latest non-final transcription, for display.
    pub interim_text: String,
}

impl RecognitionSession {
    pub fn new(id: SessionId, language_code: impl Into<String>) -> Self {
        Self {
            id,
            language_code: language_code.into(),
            interim_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    AwaitingPermission,
    Listening(RecognitionSession),
}

impl CaptureState {
    pub fn phase(&self) -> CapturePhase {
        match self {
            Self::Idle => CapturePhase::Idle,
            Self::AwaitingPermission => CapturePhase::AwaitingPermission,
            Self::Listening(_) => CapturePhase::Listening,
        }
    }

    pub fn session(&self) -> Option<&RecognitionSession> {
        match self {
            Self::Listening(session) => Some(session),
            _ => None,
        }
    }
}

/// Work the controller performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEffect {
    /// Hand a finalized transcript to the caller.
    DeliverTranscript(String),
    /// Tell the user the session failed.
    Report(VoiceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: CaptureState,
    pub effects: Vec<CaptureEffect>,
}

impl Transition {
    fn to(state: CaptureState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: CaptureEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Applies one engine event to `state`.
///
/// Events for any session other than the one currently listening are stale
/// (the controller already stopped it) and leave the state untouched.
pub fn transition(state: CaptureState, event: &RecognitionEvent) -> Transition {
    let mut session = match state {
        CaptureState::Listening(session) if session.id == event.session => session,
        other => {
            debug!(session = %event.session, phase = %other.phase(), "ignoring recognition event");
            return Transition::to(other);
        }
    };

    match &event.kind {
        RecognitionEventKind::Started => {
            debug!(session = %session.id, "recognition engine acknowledged start");
            Transition::to(CaptureState::Listening(session))
        }
        RecognitionEventKind::Result {
            text,
            is_final: false,
        } => {
            session.interim_text.clone_from(text);
            Transition::to(CaptureState::Listening(session))
        }
        RecognitionEventKind::Result {
            text,
            is_final: true,
        } => {
            session.interim_text.clear();
            Transition::to(CaptureState::Listening(session))
                .with(CaptureEffect::DeliverTranscript(text.clone()))
        }
        RecognitionEventKind::End => Transition::to(CaptureState::Idle),
        RecognitionEventKind::Error(kind) => {
            let next = Transition::to(CaptureState::Idle);
            match kind.to_voice_error() {
                Some(err) => next.with(CaptureEffect::Report(err)),
                None => next,
            }
        }
    }
}
