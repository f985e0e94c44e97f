//! Text-to-speech playback controller.

use arogya_notify::{Notification, NotificationKind, NotificationSink};
use arogya_types::LanguageCatalog;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::{SpeechParams, VoiceConfig};
use crate::engine::{EngineUtterance, SynthesisEngine, SynthesisEvent, UtteranceHandle};
use crate::error::VoiceError;
use crate::selection::resolve_voice;

/// Resolves when an utterance finishes.
///
/// `Ok(())` on natural end, `Err(SynthesisFailed)` on engine error and
/// `Err(Interrupted)` when the utterance was stopped or replaced. Does not
/// borrow the controller, so the caller can keep feeding engine events while
/// awaiting it.
#[derive(Debug)]
#[must_use = "a Completion does nothing unless awaited"]
pub struct Completion {
    rx: oneshot::Receiver<Result<(), VoiceError>>,
}

impl Future for Completion {
    type Output = Result<(), VoiceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(VoiceError::Interrupted)))
    }
}

/// Text to speak and the locale to speak it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceRequest {
    pub text: String,
    pub language_code: String,
}

#[derive(Debug)]
struct ActiveUtterance {
    handle: UtteranceHandle,
    request: UtteranceRequest,
    done: oneshot::Sender<Result<(), VoiceError>>,
}

/// Owns the single active utterance.
///
/// Speaking while something is already playing cancels it first, so the
/// engine never has more than one utterance from this controller.
pub struct SpeechSynthesisController {
    engine: Box<dyn SynthesisEngine>,
    catalog: LanguageCatalog,
    params: SpeechParams,
    active: Option<ActiveUtterance>,
    notifier: Arc<dyn NotificationSink>,
}

impl SpeechSynthesisController {
    pub fn new(engine: Box<dyn SynthesisEngine>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            engine,
            catalog: LanguageCatalog::builtin(),
            params: SpeechParams::default(),
            active: None,
            notifier,
        }
    }

    pub fn with_catalog(mut self, catalog: LanguageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_params(mut self, params: SpeechParams) -> Self {
        self.params = params;
        self
    }

    /// Applies the speech parameters from `config`.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the parameters are out of range.
    pub fn configured(mut self, config: &VoiceConfig) -> Result<Self, VoiceError> {
        config.speech.validate()?;
        self.params = config.speech;
        Ok(self)
    }

    pub fn params(&self) -> SpeechParams {
        self.params
    }

    /// Speaks `text` in `language_code`, cancelling any active utterance first.
    pub fn speak(&mut self, text: impl Into<String>, language_code: &str) -> Completion {
        let text = text.into();
        self.cancel_active();

        let voices = self.engine.voices();
        let hint = self.catalog.voice_hint(language_code);
        let selection = resolve_voice(&voices, language_code, hint);

        let utterance = EngineUtterance {
            text,
            language_code: language_code.to_string(),
            voice_name: selection.voice_name().map(str::to_string),
            rate: self.params.rate,
            pitch: self.params.pitch,
            volume: self.params.volume,
        };
        let handle = self.engine.enqueue(&utterance);
        info!(
            %handle,
            language = language_code,
            voice = ?utterance.voice_name,
            matched = ?selection.matched,
            chars = utterance.text.chars().count(),
            "utterance enqueued"
        );

        let (done, rx) = oneshot::channel();
        self.active = Some(ActiveUtterance {
            handle,
            request: UtteranceRequest {
                text: utterance.text,
                language_code: utterance.language_code,
            },
            done,
        });
        Completion { rx }
    }

    /// Cancels the active utterance. No engine call when nothing is active.
    pub fn stop(&mut self) {
        if self.cancel_active() {
            info!("playback stopped");
        }
    }

    /// Read-aloud button behaviour: stops playback if the engine is speaking,
    /// otherwise starts speaking `text`.
    ///
    /// Returns the completion of the new utterance, or `None` if playback was
    /// stopped instead.
    pub fn toggle_playback(
        &mut self,
        text: impl Into<String>,
        language_code: &str,
    ) -> Option<Completion> {
        if self.active.is_some() || self.engine.is_speaking() {
            if !self.cancel_active() {
                self.engine.cancel();
            }
            self.notifier.notify(Notification::new(
                NotificationKind::PlaybackStopped,
                "Audio stopped",
                "Audio playback has been stopped",
            ));
            return None;
        }

        self.notifier.notify(Notification::new(
            NotificationKind::PlaybackStarted,
            "Playing audio",
            format!("Speaking in {}", self.catalog.label_for(language_code)),
        ));
        Some(self.speak(text, language_code))
    }

    /// Live engine playback flag.
    pub fn is_speaking(&self) -> bool {
        self.engine.is_speaking()
    }

    /// The request currently owned by the controller, if any.
    pub fn active_request(&self) -> Option<&UtteranceRequest> {
        self.active.as_ref().map(|active| &active.request)
    }

    /// Feeds one synthesis engine callback. Events for utterances other than
    /// the active one are ignored.
    pub fn handle_event(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::UtteranceEnd(handle) => match self.take_active(handle) {
                Some(active) => {
                    info!(%handle, "utterance finished");
                    let _ = active.done.send(Ok(()));
                }
                None => debug!(%handle, "ignoring end of inactive utterance"),
            },
            SynthesisEvent::UtteranceError(handle, kind) => match self.take_active(handle) {
                Some(active) => {
                    warn!(%handle, error = %kind, "utterance failed");
                    let err = VoiceError::SynthesisFailed(kind);
                    if let Some(notification) = err.notification() {
                        self.notifier.notify(notification);
                    }
                    let _ = active.done.send(Err(err));
                }
                None => debug!(%handle, error = %kind, "ignoring error of inactive utterance"),
            },
        }
    }

    fn take_active(&mut self, handle: UtteranceHandle) -> Option<ActiveUtterance> {
        if self.active.as_ref().is_some_and(|active| active.handle == handle) {
            self.active.take()
        } else {
            None
        }
    }

    fn cancel_active(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                self.engine.cancel();
                debug!(handle = %active.handle, "utterance interrupted");
                let _ = active.done.send(Err(VoiceError::Interrupted));
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SpeechSynthesisController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesisController")
            .field("params", &self.params)
            .field("active", &self.active.as_ref().map(|a| a.handle))
            .finish_non_exhaustive()
    }
}
