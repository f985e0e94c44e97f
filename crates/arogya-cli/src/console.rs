//! Terminal stand-ins for the host speech engines.
//!
//! Recognition "hears" whatever the user types while a session is listening.
//! Synthesis prints the utterance and reports the end after a delay
//! proportional to its length.

use arogya_voice::{
    AudioPermission, CaptureGrant, CaptureKind, EngineStartError, EngineUtterance,
    PermissionDenial, RecognitionConfig, RecognitionEngine, RecognitionEvent, SessionId,
    SynthesisEngine, SynthesisEvent, UtteranceHandle, VoiceInfo,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Playback time per character at rate 1.0.
const MS_PER_CHAR: u64 = 60;

/// No session is listening.
const IDLE: u64 = 0;

/// Recognition engine fed from the terminal.
pub struct ConsoleRecognizer {
    active: Arc<AtomicU64>,
    language: String,
    events: mpsc::UnboundedSender<RecognitionEvent>,
}

/// The typing end of a [`ConsoleRecognizer`].
#[derive(Clone)]
pub struct ConsoleMicrophone {
    active: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<RecognitionEvent>,
}

/// Creates a recognizer, the microphone that feeds it and the receiver for
/// its events.
pub fn console_recognizer() -> (
    ConsoleRecognizer,
    ConsoleMicrophone,
    mpsc::UnboundedReceiver<RecognitionEvent>,
) {
    let (events, rx) = mpsc::unbounded_channel();
    let active = Arc::new(AtomicU64::new(IDLE));
    let recognizer = ConsoleRecognizer {
        active: Arc::clone(&active),
        language: String::new(),
        events: events.clone(),
    };
    (recognizer, ConsoleMicrophone { active, events }, rx)
}

#[async_trait]
impl RecognitionEngine for ConsoleRecognizer {
    fn configure(&mut self, config: &RecognitionConfig) {
        self.language.clone_from(&config.language_code);
    }

    async fn start(&mut self, session: SessionId) -> Result<(), EngineStartError> {
        if self
            .active
            .compare_exchange(IDLE, session.get(), Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineStartError::AlreadyRunning);
        }
        debug!(%session, language = %self.language, "console recognizer listening");
        let _ = self.events.send(RecognitionEvent::started(session));
        Ok(())
    }

    fn stop(&mut self) {
        let id = self.active.swap(IDLE, Ordering::SeqCst);
        if id != IDLE {
            let _ = self.events.send(RecognitionEvent::end(SessionId::new(id)));
        }
    }
}

impl ConsoleMicrophone {
    pub fn is_listening(&self) -> bool {
        self.active.load(Ordering::SeqCst) != IDLE
    }

    /// Delivers `text` as one spoken utterance: an interim result, the final
    /// result, then the end of the session. Returns `false` when nothing is
    /// listening.
    pub fn hear(&self, text: &str) -> bool {
        let id = self.active.swap(IDLE, Ordering::SeqCst);
        if id == IDLE {
            return false;
        }
        let session = SessionId::new(id);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > 1 {
            let partial = words[..words.len() - 1].join(" ");
            let _ = self.events.send(RecognitionEvent::interim(session, partial));
        }
        let _ = self.events.send(RecognitionEvent::final_result(session, text.trim()));
        let _ = self.events.send(RecognitionEvent::end(session));
        true
    }
}

/// Permission prompt that always grants; a terminal has no microphone to
/// guard.
pub struct ConsolePermission;

struct ConsoleGrant;

impl CaptureGrant for ConsoleGrant {
    fn release(self: Box<Self>) {
        debug!("console microphone released");
    }
}

#[async_trait]
impl AudioPermission for ConsolePermission {
    async fn request_access(
        &mut self,
        kind: CaptureKind,
    ) -> Result<Box<dyn CaptureGrant>, PermissionDenial> {
        debug!(?kind, "console permission granted");
        Ok(Box::new(ConsoleGrant))
    }
}

/// Synthesis engine that prints instead of speaking.
pub struct ConsoleSynthesizer {
    voices: Vec<VoiceInfo>,
    speaking: Arc<AtomicBool>,
    playing: Option<JoinHandle<()>>,
    next_handle: u64,
    events: mpsc::UnboundedSender<SynthesisEvent>,
}

/// Creates a synthesizer and the receiver for its end events.
pub fn console_synthesizer() -> (ConsoleSynthesizer, mpsc::UnboundedReceiver<SynthesisEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    let engine = ConsoleSynthesizer {
        voices: vec![
            VoiceInfo::new("en-US", "Google US English"),
            VoiceInfo::new("en-GB", "Google UK English Female"),
            VoiceInfo::new("hi-IN", "Google हिन्दी"),
        ],
        speaking: Arc::new(AtomicBool::new(false)),
        playing: None,
        next_handle: 0,
        events,
    };
    (engine, rx)
}

/// How long the console pretends to speak `utterance`.
pub fn playback_duration(utterance: &EngineUtterance) -> Duration {
    let chars = utterance.text.chars().count() as f64;
    let rate = f64::from(utterance.rate.max(0.1));
    Duration::from_millis((chars * MS_PER_CHAR as f64 / rate) as u64)
}

impl SynthesisEngine for ConsoleSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn enqueue(&mut self, utterance: &EngineUtterance) -> UtteranceHandle {
        self.cancel();
        self.next_handle += 1;
        let handle = UtteranceHandle::new(self.next_handle);

        println!(
            "🔊 [{} | {}] {}",
            utterance.language_code,
            utterance.voice_name.as_deref().unwrap_or("default voice"),
            utterance.text
        );

        let delay = playback_duration(utterance);
        let speaking = Arc::clone(&self.speaking);
        let events = self.events.clone();
        speaking.store(true, Ordering::SeqCst);
        self.playing = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            speaking.store(false, Ordering::SeqCst);
            let _ = events.send(SynthesisEvent::UtteranceEnd(handle));
        }));
        handle
    }

    fn cancel(&mut self) {
        if let Some(task) = self.playing.take() {
            task.abort();
        }
        self.speaking.store(false, Ordering::SeqCst);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arogya_voice::RecognitionEventKind;

    fn utterance(text: &str, rate: f32) -> EngineUtterance {
        EngineUtterance {
            text: text.to_string(),
            language_code: "en-US".to_string(),
            voice_name: None,
            rate,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    #[test]
    fn duration_scales_with_length_and_rate() {
        assert_eq!(
            playback_duration(&utterance("abcd", 1.0)),
            Duration::from_millis(240)
        );
        assert_eq!(
            playback_duration(&utterance("abcd", 2.0)),
            Duration::from_millis(120)
        );
    }

    #[tokio::test]
    async fn typed_line_becomes_one_utterance() {
        let (mut recognizer, mic, mut rx) = console_recognizer();
        assert!(!mic.hear("ignored"));

        recognizer.start(SessionId::new(7)).await.unwrap();
        assert!(mic.is_listening());
        assert!(mic.hear("find doctors"));
        assert!(!mic.is_listening());

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.session, SessionId::new(7));
            kinds.push(event.kind);
        }
        assert_eq!(
            kinds,
            vec![
                RecognitionEventKind::Started,
                RecognitionEventKind::Result {
                    text: "find".into(),
                    is_final: false
                },
                RecognitionEventKind::Result {
                    text: "find doctors".into(),
                    is_final: true
                },
                RecognitionEventKind::End,
            ]
        );
    }

    #[tokio::test]
    async fn second_start_is_refused_until_stopped() {
        let (mut recognizer, _mic, _rx) = console_recognizer();
        recognizer.start(SessionId::new(1)).await.unwrap();

        assert_eq!(
            recognizer.start(SessionId::new(2)).await,
            Err(EngineStartError::AlreadyRunning)
        );
        recognizer.stop();
        recognizer.start(SessionId::new(2)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn synthesizer_reports_end() {
        let (mut engine, mut rx) = console_synthesizer();

        let handle = engine.enqueue(&utterance("hello", 1.0));
        assert!(engine.is_speaking());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, SynthesisEvent::UtteranceEnd(handle));
        assert!(!engine.is_speaking());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_utterance_never_ends() {
        let (mut engine, mut rx) = console_synthesizer();

        let first = engine.enqueue(&utterance("first", 1.0));
        let second = engine.enqueue(&utterance("second", 1.0));
        assert_ne!(first, second);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, SynthesisEvent::UtteranceEnd(second));
    }
}
