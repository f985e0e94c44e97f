//! Unit tests for notification kinds and sinks.

use std::str::FromStr;
use std::sync::Arc;

use arogya_types::Severity;

use crate::notification::{Notification, NotificationKind};
use crate::sink::{BroadcastSink, FanoutSink, NotificationFilter, NotificationLog, NotificationSink};

const ALL_KINDS: [NotificationKind; 8] = [
    NotificationKind::MicrophoneReady,
    NotificationKind::MicrophoneDenied,
    NotificationKind::VoiceUnsupported,
    NotificationKind::ListeningStarted,
    NotificationKind::VoiceInputError,
    NotificationKind::PlaybackStarted,
    NotificationKind::PlaybackStopped,
    NotificationKind::PlaybackFailed,
];

fn denied() -> Notification {
    Notification::new(
        NotificationKind::MicrophoneDenied,
        "Microphone access denied",
        "Please allow microphone access in your settings to use voice input.",
    )
}

fn ready() -> Notification {
    Notification::new(
        NotificationKind::MicrophoneReady,
        "Microphone ready",
        "You can now use voice input",
    )
}

// ── NotificationKind ─────────────────────────────────────────────────

#[test]
fn kind_labels_parse_back() {
    for kind in ALL_KINDS {
        assert_eq!(NotificationKind::from_str(kind.as_str()).unwrap(), kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn unknown_kind_is_rejected() {
    let err = NotificationKind::from_str("MICROPHONE_EXPLODED").unwrap_err();
    assert_eq!(err.to_string(), "unknown notification kind: MICROPHONE_EXPLODED");
}

#[test]
fn kind_serde_matches_label() {
    for kind in ALL_KINDS {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
}

#[test]
fn failures_are_destructive() {
    assert_eq!(NotificationKind::MicrophoneDenied.severity(), Severity::Destructive);
    assert_eq!(NotificationKind::VoiceUnsupported.severity(), Severity::Destructive);
    assert_eq!(NotificationKind::VoiceInputError.severity(), Severity::Destructive);
    assert_eq!(NotificationKind::PlaybackFailed.severity(), Severity::Destructive);
    assert_eq!(NotificationKind::ListeningStarted.severity(), Severity::Info);
    assert_eq!(NotificationKind::PlaybackStopped.severity(), Severity::Info);
}

#[test]
fn with_severity_overrides_default() {
    let n = ready().with_severity(Severity::Destructive);
    assert!(n.is_destructive());
    assert_eq!(n.kind, NotificationKind::MicrophoneReady);
}

// ── NotificationLog ──────────────────────────────────────────────────

#[test]
fn log_assigns_increasing_sequence_numbers() {
    let log = NotificationLog::new();
    assert!(log.is_empty());

    log.notify(ready());
    log.notify(denied());
    log.notify(ready());

    let seqs: Vec<u64> = log
        .query(&NotificationFilter::default())
        .iter()
        .map(|e| e.seq)
        .collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(log.last(), Some(ready()));
}

#[test]
fn log_query_filters_by_kind_and_severity() {
    let log = NotificationLog::new();
    log.notify(ready());
    log.notify(denied());
    log.notify(denied());

    let by_kind = log.query(&NotificationFilter {
        kind: Some(NotificationKind::MicrophoneDenied),
        ..Default::default()
    });
    assert_eq!(by_kind.len(), 2);

    let info = log.query(&NotificationFilter {
        severity: Some(Severity::Info),
        ..Default::default()
    });
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].notification.title, "Microphone ready");

    assert_eq!(log.destructive_count(), 2);
}

#[test]
fn log_query_pages_with_after_seq_and_limit() {
    let log = NotificationLog::new();
    for _ in 0..5 {
        log.notify(ready());
    }

    let page = log.query(&NotificationFilter {
        after_seq: Some(2),
        limit: Some(2),
        ..Default::default()
    });
    let seqs: Vec<u64> = page.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![3, 4]);
}

#[test]
fn clear_keeps_sequence_running() {
    let log = NotificationLog::new();
    log.notify(ready());
    log.notify(ready());
    log.clear();
    assert_eq!(log.len(), 0);

    log.notify(denied());
    let entries = log.query(&NotificationFilter::default());
    assert_eq!(entries[0].seq, 3);
}

// ── BroadcastSink / FanoutSink ───────────────────────────────────────

#[tokio::test]
async fn broadcast_delivers_to_subscribers() {
    let sink = BroadcastSink::default();
    let mut rx = sink.subscribe();

    sink.notify(denied());

    let received = rx.recv().await.expect("should receive notification");
    assert_eq!(received, denied());
}

#[test]
fn broadcast_without_subscribers_drops_silently() {
    let sink = BroadcastSink::new(4);
    sink.notify(ready());
}

#[test]
fn fanout_reaches_every_sink_in_order() {
    let first = Arc::new(NotificationLog::new());
    let second = Arc::new(NotificationLog::new());
    let fanout = FanoutSink::new().with(first.clone()).with(second.clone());

    fanout.notify(ready());
    fanout.notify(denied());

    assert_eq!(first.notifications(), vec![ready(), denied()]);
    assert_eq!(second.notifications(), vec![ready(), denied()]);
}

#[test]
fn empty_fanout_is_a_no_op() {
    FanoutSink::new().notify(ready());
}
