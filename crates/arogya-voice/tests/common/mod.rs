#![allow(dead_code)]

use arogya_notify::NotificationLog;
use arogya_voice::{
    AudioPermission, CaptureGrant, CaptureKind, EngineStartError, EngineUtterance,
    PermissionDenial, PermissionGate, RecognitionConfig, RecognitionEngine, SessionId,
    SpeechCaptureController, SpeechSynthesisController, SynthesisEngine, UtteranceHandle,
    VoiceInfo,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Every engine and permission call, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure(RecognitionConfig),
    Start(SessionId),
    Stop,
    Prompt,
    Release,
    Enqueue(EngineUtterance),
    Cancel,
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn starts(&self) -> usize {
        self.count(|c| matches!(c, Call::Start(_)))
    }

    pub fn stops(&self) -> usize {
        self.count(|c| matches!(c, Call::Stop))
    }

    pub fn prompts(&self) -> usize {
        self.count(|c| matches!(c, Call::Prompt))
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Recognition engine that answers `start` from a script, then `Ok`.
pub struct ScriptedRecognizer {
    pub log: CallLog,
    pub script: VecDeque<Result<(), EngineStartError>>,
}

impl ScriptedRecognizer {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            script: VecDeque::new(),
        }
    }

    pub fn then(mut self, result: Result<(), EngineStartError>) -> Self {
        self.script.push_back(result);
        self
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedRecognizer {
    fn configure(&mut self, config: &RecognitionConfig) {
        self.log.push(Call::Configure(config.clone()));
    }

    async fn start(&mut self, session: SessionId) -> Result<(), EngineStartError> {
        self.log.push(Call::Start(session));
        self.script.pop_front().unwrap_or(Ok(()))
    }

    fn stop(&mut self) {
        self.log.push(Call::Stop);
    }
}

struct MockGrant(CallLog);

impl CaptureGrant for MockGrant {
    fn release(self: Box<Self>) {
        self.0.push(Call::Release);
    }
}

/// Permission prompt that grants, or denies with the given reason.
pub struct MockPermission {
    pub log: CallLog,
    pub deny_with: Option<String>,
}

#[async_trait]
impl AudioPermission for MockPermission {
    async fn request_access(
        &mut self,
        _kind: CaptureKind,
    ) -> Result<Box<dyn CaptureGrant>, PermissionDenial> {
        self.log.push(Call::Prompt);
        match &self.deny_with {
            Some(reason) => Err(PermissionDenial::new(reason.clone())),
            None => Ok(Box::new(MockGrant(self.log.clone()))),
        }
    }
}

/// Permission prompt whose first request never resolves; later requests
/// grant.
pub struct HangingPermission {
    pub log: CallLog,
    pub hang_next: bool,
}

#[async_trait]
impl AudioPermission for HangingPermission {
    async fn request_access(
        &mut self,
        _kind: CaptureKind,
    ) -> Result<Box<dyn CaptureGrant>, PermissionDenial> {
        self.log.push(Call::Prompt);
        if std::mem::take(&mut self.hang_next) {
            std::future::pending::<()>().await;
        }
        Ok(Box::new(MockGrant(self.log.clone())))
    }
}

pub fn granting(log: &CallLog) -> Box<MockPermission> {
    Box::new(MockPermission {
        log: log.clone(),
        deny_with: None,
    })
}

pub fn denying(log: &CallLog, reason: &str) -> Box<MockPermission> {
    Box::new(MockPermission {
        log: log.clone(),
        deny_with: Some(reason.to_string()),
    })
}

/// Synthesis engine with a fixed voice list and a shared speaking flag.
pub struct MockSynthesizer {
    pub log: CallLog,
    pub voices: Vec<VoiceInfo>,
    pub speaking: Arc<AtomicBool>,
    next_handle: u64,
}

impl MockSynthesizer {
    pub fn new(log: CallLog, voices: Vec<VoiceInfo>) -> Self {
        Self {
            log,
            voices,
            speaking: Arc::new(AtomicBool::new(false)),
            next_handle: 0,
        }
    }
}

impl SynthesisEngine for MockSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn enqueue(&mut self, utterance: &EngineUtterance) -> UtteranceHandle {
        self.log.push(Call::Enqueue(utterance.clone()));
        self.speaking.store(true, Ordering::SeqCst);
        self.next_handle += 1;
        UtteranceHandle::new(self.next_handle)
    }

    fn cancel(&mut self) {
        self.log.push(Call::Cancel);
        self.speaking.store(false, Ordering::SeqCst);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}

pub fn standard_voices() -> Vec<VoiceInfo> {
    vec![
        VoiceInfo::new("en-GB", "Daniel"),
        VoiceInfo::new("en-US", "Samantha"),
        VoiceInfo::new("hi-IN", "Lekha"),
    ]
}

/// A capture controller wired to mocks, plus handles to inspect them.
pub struct CaptureHarness {
    pub controller: SpeechCaptureController,
    pub calls: CallLog,
    pub notifications: Arc<NotificationLog>,
    pub transcripts: Arc<Mutex<Vec<String>>>,
}

impl CaptureHarness {
    pub fn with_log(
        calls: CallLog,
        recognizer: Option<ScriptedRecognizer>,
        permission: Box<dyn AudioPermission>,
    ) -> Self {
        let notifications = Arc::new(NotificationLog::new());
        let transcripts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&transcripts);
        let gate = PermissionGate::new(permission, notifications.clone());
        let engine = recognizer.map(|r| Box::new(r) as Box<dyn RecognitionEngine>);
        let controller = SpeechCaptureController::new(
            engine,
            gate,
            notifications.clone(),
            Box::new(move |text| sink.lock().unwrap().push(text)),
        );
        Self {
            controller,
            calls,
            notifications,
            transcripts,
        }
    }

    pub fn transcripts(&self) -> Vec<String> {
        self.transcripts.lock().unwrap().clone()
    }
}

/// Capture harness with a granting permission and an always-Ok engine.
pub fn ready_capture() -> CaptureHarness {
    let calls = CallLog::default();
    let recognizer = ScriptedRecognizer::new(calls.clone());
    let permission = granting(&calls);
    CaptureHarness::with_log(calls, Some(recognizer), permission)
}

pub struct SynthesisHarness {
    pub controller: SpeechSynthesisController,
    pub calls: CallLog,
    pub notifications: Arc<NotificationLog>,
    pub speaking: Arc<AtomicBool>,
}

impl SynthesisHarness {
    pub fn new(voices: Vec<VoiceInfo>) -> Self {
        let calls = CallLog::default();
        let engine = MockSynthesizer::new(calls.clone(), voices);
        let speaking = Arc::clone(&engine.speaking);
        let notifications = Arc::new(NotificationLog::new());
        let controller = SpeechSynthesisController::new(Box::new(engine), notifications.clone());
        Self {
            controller,
            calls,
            notifications,
            speaking,
        }
    }

    pub fn enqueued(&self) -> Vec<EngineUtterance> {
        self.calls
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Enqueue(u) => Some(u),
                _ => None,
            })
            .collect()
    }

    /// Simulates the engine finishing playback on its own.
    pub fn finish_playback(&self) {
        self.speaking.store(false, Ordering::SeqCst);
    }
}
