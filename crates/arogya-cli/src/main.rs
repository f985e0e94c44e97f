//! Arogya voice console: the capture and synthesis controllers driven from a
//! terminal.
//!
//! Structured logging goes to stderr through `tracing`; user-facing
//! notifications, spoken utterances and transcripts are printed to stdout.

mod command;
mod config;
mod console;

use arogya_notify::{BroadcastSink, FanoutSink, Notification, NotificationSink, TracingSink};
use arogya_voice::{
    Completion, PermissionGate, RecognitionEngine, SpeechCaptureController,
    SpeechSynthesisController, VoiceError,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use command::{Command, HELP};
use console::{console_recognizer, console_synthesizer, ConsoleMicrophone, ConsolePermission};

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("AROGYA_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_destructive() { "✖" } else { "•" };
    println!("{marker} {}: {}", notification.title, notification.description);
}

/// Prints notifications as they arrive on the broadcast channel.
fn spawn_notification_printer(sink: &BroadcastSink) {
    let mut notices = sink.subscribe();
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notification) => print_notification(&notification),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Logs how a spoken utterance ended.
fn watch_playback(done: Completion) {
    tokio::spawn(async move {
        match done.await {
            Ok(()) => tracing::debug!("playback finished"),
            Err(VoiceError::Interrupted) => tracing::debug!("playback interrupted"),
            Err(err) => tracing::warn!(error = %err, "playback failed"),
        }
    });
}

struct Console {
    capture: SpeechCaptureController,
    synthesis: SpeechSynthesisController,
    microphone: ConsoleMicrophone,
}

impl Console {
    /// Runs one line of input. Returns `false` when the user quits.
    async fn handle_line(&mut self, line: &str) -> bool {
        match Command::parse(line) {
            Command::Empty => {}
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
            Command::Listen => {
                if let Err(err) = self.capture.toggle().await {
                    tracing::debug!(error = %err, "voice input did not start");
                }
            }
            Command::Lang(None) => {
                let code = self.capture.selected_language();
                println!("language: {} ({code})", self.capture.catalog().label_for(code));
            }
            Command::Lang(Some(code)) => match self.capture.select_language(&code) {
                Ok(()) => println!(
                    "language set to {}",
                    self.capture.catalog().label_for(&code)
                ),
                Err(err) => println!("{err}"),
            },
            Command::Langs => {
                let selected = self.capture.selected_language();
                for entry in self.capture.catalog().entries() {
                    let marker = if entry.code == selected { "*" } else { " " };
                    println!("{marker} {:<6} {}", entry.code, entry.label);
                }
            }
            Command::Say(text) => {
                let language = self.capture.selected_language().to_string();
                watch_playback(self.synthesis.speak(text, &language));
            }
            Command::Play(text) => {
                let language = self.capture.selected_language().to_string();
                if let Some(done) = self.synthesis.toggle_playback(text, &language) {
                    watch_playback(done);
                }
            }
            Command::Stop => {
                self.capture.stop();
                self.synthesis.stop();
            }
            Command::Text(text) => {
                if !self.microphone.hear(&text) {
                    self.capture.submit_typed(&text);
                }
            }
        }
        true
    }
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration, the console cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let broadcast = Arc::new(BroadcastSink::default());
    spawn_notification_printer(&broadcast);
    let notifier: Arc<dyn NotificationSink> = Arc::new(
        FanoutSink::new()
            .with(Arc::new(TracingSink))
            .with(broadcast),
    );

    let (recognizer, microphone, mut recognition_events) = console_recognizer();
    let (synthesizer, mut synthesis_events) = console_synthesizer();

    let permission = PermissionGate::new(Box::new(ConsolePermission), Arc::clone(&notifier));
    let capture = SpeechCaptureController::new(
        Some(Box::new(recognizer) as Box<dyn RecognitionEngine>),
        permission,
        Arc::clone(&notifier),
        Box::new(|text: String| println!("📝 {text}")),
    )
    .configured(&config.voice)
    .expect("voice configuration was validated at load");
    let synthesis = SpeechSynthesisController::new(Box::new(synthesizer), notifier)
        .configured(&config.voice)
        .expect("voice configuration was validated at load");

    tracing::info!(
        language = capture.selected_language(),
        "arogya voice console ready"
    );
    println!("{HELP}");

    let mut console = Console {
        capture,
        synthesis,
        microphone,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !console.handle_line(&line).await {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::error!(error = %err, "failed to read console input");
                    break;
                }
            },
            Some(event) = recognition_events.recv() => console.capture.handle_event(event),
            Some(event) = synthesis_events.recv() => console.synthesis.handle_event(event),
            () = &mut shutdown => break,
        }
    }

    console.capture.stop();
    console.synthesis.stop();
    tracing::info!("arogya voice console shut down");
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received SIGINT, shutting down");
}
