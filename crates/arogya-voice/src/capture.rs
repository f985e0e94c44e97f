//! Speech-to-text capture controller.

use arogya_notify::{Notification, NotificationKind, NotificationSink};
use arogya_types::LanguageCatalog;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{RetryPolicy, VoiceConfig};
use crate::engine::{
    EngineStartError, RecognitionConfig, RecognitionEngine, RecognitionEvent, SessionId,
};
use crate::error::VoiceError;
use crate::permission::{PermissionGate, PermissionState};
use crate::session::{transition, CaptureEffect, CapturePhase, CaptureState, RecognitionSession};

/// Receives each finalized transcript exactly once.
pub type TranscriptCallback = Box<dyn FnMut(String) + Send>;

/// Owns the recognition session lifecycle: permission, start, engine events,
/// stop.
///
/// At most one session listens at a time. Engine callbacks are fed in
/// through [`handle_event`](Self::handle_event) in the order the engine
/// emitted them.
pub struct SpeechCaptureController {
    engine: Option<Box<dyn RecognitionEngine>>,
    permission: PermissionGate,
    catalog: LanguageCatalog,
    selected_language: String,
    retry: RetryPolicy,
    state: CaptureState,
    last_session: u64,
    notifier: Arc<dyn NotificationSink>,
    on_transcript: TranscriptCallback,
}

impl SpeechCaptureController {
    /// Creates a controller. `engine` is `None` when the host has no speech
    /// recognition; every start then reports "not supported".
    pub fn new(
        engine: Option<Box<dyn RecognitionEngine>>,
        permission: PermissionGate,
        notifier: Arc<dyn NotificationSink>,
        on_transcript: TranscriptCallback,
    ) -> Self {
        let catalog = LanguageCatalog::builtin();
        Self {
            engine,
            permission,
            catalog,
            selected_language: catalog.default_language().to_string(),
            retry: RetryPolicy::default(),
            state: CaptureState::Idle,
            last_session: 0,
            notifier,
            on_transcript,
        }
    }

    /// Replaces the language table. Resets the selection to the catalog's
    /// default language.
    pub fn with_catalog(mut self, catalog: LanguageCatalog) -> Self {
        self.catalog = catalog;
        self.selected_language = catalog.default_language().to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Applies retry settings and the default language from `config`.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if `config` does not validate against the
    /// controller's catalog.
    pub fn configured(mut self, config: &VoiceConfig) -> Result<Self, VoiceError> {
        config.validate(&self.catalog)?;
        self.retry = config.retry.policy();
        self.select_language(&config.default_language)?;
        Ok(self)
    }

    /// `false` when the host has no recognition engine.
    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    pub fn phase(&self) -> CapturePhase {
        self.state.phase()
    }

    /// The current session, if listening.
    pub fn session(&self) -> Option<&RecognitionSession> {
        self.state.session()
    }

    /// Latest interim transcription; empty when idle or right after a final
    /// result.
    pub fn interim_text(&self) -> &str {
        self.state
            .session()
            .map(|session| session.interim_text.as_str())
            .unwrap_or("")
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permission.state()
    }

    /// Chooses the language for the next session.
    ///
    /// A session that is already listening keeps the language it started
    /// with; stop and start again to switch.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::UnsupportedLanguage` for codes not in the catalog.
    pub fn select_language(&mut self, code: &str) -> Result<(), VoiceError> {
        let entry = self
            .catalog
            .find(code)
            .ok_or_else(|| VoiceError::UnsupportedLanguage(code.to_string()))?;
        if let Some(session) = self.state.session() {
            debug!(
                session = %session.id,
                current = %session.language_code,
                next = entry.code,
                "language change applies to the next session"
            );
        }
        self.selected_language = entry.code.to_string();
        Ok(())
    }

    /// Stops listening if a session is active, otherwise starts one.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the start attempt. It has already been
    /// reported to the notification sink.
    pub async fn toggle(&mut self) -> Result<(), VoiceError> {
        if self.engine.is_none() {
            return Err(self.report(VoiceError::Unsupported));
        }
        match self.state.phase() {
            CapturePhase::Listening => {
                self.stop();
                Ok(())
            }
            CapturePhase::AwaitingPermission => Ok(()),
            CapturePhase::Idle => self.start().await,
        }
    }

    /// Starts a session in the selected language. No-op while listening.
    ///
    /// Prompts for microphone permission unless a grant is cached. If the
    /// engine refuses because a previous session still holds it, the engine
    /// is stopped and started again after the retry backoff, at most
    /// `max_retries` times.
    ///
    /// # Errors
    ///
    /// `Unsupported`, `PermissionDenied` or `StartFailed`, each already
    /// reported to the notification sink.
    pub async fn start(&mut self) -> Result<(), VoiceError> {
        if self.engine.is_none() {
            return Err(self.report(VoiceError::Unsupported));
        }
        if self.state != CaptureState::Idle {
            return Ok(());
        }

        if !self.permission.is_granted() {
            let prompt = PromptGuard::enter(&mut self.state);
            let granted = self.permission.request_audio_access().await;
            drop(prompt);
            granted?;
        }

        let language = self.selected_language.clone();
        let session = self.next_session_id();
        let config = RecognitionConfig::single_utterance(language.clone());
        let retry = self.retry;

        let started = match self.engine.as_deref_mut() {
            Some(engine) => start_with_retry(engine, &config, session, retry).await,
            None => return Err(self.report(VoiceError::Unsupported)),
        };
        match started {
            Ok(()) => {
                info!(%session, language = %language, "recognition started");
                let label = self.catalog.label_for(&language);
                self.state = CaptureState::Listening(RecognitionSession::new(session, language));
                self.notifier.notify(Notification::new(
                    NotificationKind::ListeningStarted,
                    format!("Listening in {label}..."),
                    "Speak clearly into your microphone",
                ));
                Ok(())
            }
            Err(err) => {
                warn!(%session, error = %err, "recognition failed to start");
                Err(self.report(VoiceError::StartFailed(err.to_string())))
            }
        }
    }

    /// Stops the active session. No-op, with no engine call, when idle.
    ///
    /// The controller is idle as soon as this returns; a late result or end
    /// event from the stopped session is ignored.
    pub fn stop(&mut self) {
        let CaptureState::Listening(session) = &self.state else {
            return;
        };
        info!(session = %session.id, "stopping recognition");
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.state = CaptureState::Idle;
    }

    /// Feeds one recognition engine callback into the state machine.
    pub fn handle_event(&mut self, event: RecognitionEvent) {
        let state = std::mem::take(&mut self.state);
        let step = transition(state, &event);
        self.state = step.state;

        for effect in step.effects {
            match effect {
                CaptureEffect::DeliverTranscript(text) => {
                    info!(
                        session = %event.session,
                        chars = text.chars().count(),
                        "final transcript"
                    );
                    (self.on_transcript)(text);
                }
                CaptureEffect::Report(err) => {
                    warn!(session = %event.session, error = %err, "recognition session failed");
                    if matches!(err, VoiceError::PermissionDenied(_)) {
                        self.permission.revoke();
                    }
                    self.report(err);
                }
            }
        }
    }

    /// Submits typed text as if it had been spoken. Blank input is ignored.
    ///
    /// Returns `true` if the text was delivered.
    pub fn submit_typed(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if let CaptureState::Listening(session) = &mut self.state {
            session.interim_text.clear();
        }
        (self.on_transcript)(text.to_string());
        true
    }

    fn next_session_id(&mut self) -> SessionId {
        self.last_session += 1;
        SessionId::new(self.last_session)
    }

    fn report(&self, err: VoiceError) -> VoiceError {
        if let Some(notification) = err.notification() {
            self.notifier.notify(notification);
        }
        err
    }
}

impl std::fmt::Debug for SpeechCaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechCaptureController")
            .field("supported", &self.engine.is_some())
            .field("state", &self.state)
            .field("selected_language", &self.selected_language)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

/// Holds the controller in `AwaitingPermission` while the prompt is open.
///
/// Dropping it returns the controller to `Idle`, including when the `start`
/// future is dropped mid-prompt.
struct PromptGuard<'a> {
    state: &'a mut CaptureState,
}

impl<'a> PromptGuard<'a> {
    fn enter(state: &'a mut CaptureState) -> Self {
        *state = CaptureState::AwaitingPermission;
        Self { state }
    }
}

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        *self.state = CaptureState::Idle;
    }
}

async fn start_with_retry(
    engine: &mut dyn RecognitionEngine,
    config: &RecognitionConfig,
    session: SessionId,
    retry: RetryPolicy,
) -> Result<(), EngineStartError> {
    let mut attempts = 0;
    loop {
        engine.configure(config);
        match engine.start(session).await {
            Err(EngineStartError::AlreadyRunning) if attempts < retry.max_retries => {
                attempts += 1;
                warn!(
                    %session,
                    attempt = attempts,
                    backoff = ?retry.backoff,
                    "recognition already running, restarting"
                );
                engine.stop();
                tokio::time::sleep(retry.backoff).await;
            }
            result => return result,
        }
    }
}
