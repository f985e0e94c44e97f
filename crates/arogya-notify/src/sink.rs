//! Notification sinks.
//!
//! Every producer goes through [`NotificationSink::notify`]. The host picks
//! the concrete sink: [`TracingSink`] writes to the log, [`BroadcastSink`]
//! fans out to async subscribers (a UI task, a test), [`NotificationLog`]
//! keeps an in-memory sequence that can be queried, and [`FanoutSink`]
//! combines several of them.

use std::sync::{Arc, Mutex, MutexGuard};

use arogya_types::Severity;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::notification::{Notification, NotificationKind};

/// Default capacity for the notification broadcast channel.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Receives user-facing notifications.
///
/// Implementations must not block: controllers call `notify` inline from
/// their state transitions.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(
                kind = %notification.kind,
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Severity::Destructive => tracing::warn!(
                kind = %notification.kind,
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}

/// Publishes notifications on a tokio broadcast channel.
///
/// Sending with no live subscriber is not an error; the notification is
/// dropped.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<Notification>,
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

impl BroadcastSink {
    /// Creates a sink whose channel buffers up to `capacity` notifications
    /// per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribes to notifications sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl NotificationSink for BroadcastSink {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

/// A notification together with its position in a [`NotificationLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedNotification {
    /// Monotonically increasing sequence number, starting at 1.
    pub seq: u64,
    /// The notification as delivered.
    pub notification: Notification,
}

/// Filter criteria for [`NotificationLog::query`].
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Only notifications of this kind.
    pub kind: Option<NotificationKind>,
    /// Only notifications of this severity.
    pub severity: Option<Severity>,
    /// Only notifications with a sequence number greater than this.
    pub after_seq: Option<u64>,
    /// Maximum number of entries to return (default: all).
    pub limit: Option<usize>,
}

#[derive(Debug, Default)]
struct LogInner {
    next_seq: u64,
    entries: Vec<LoggedNotification>,
}

/// In-memory, append-only notification log.
#[derive(Debug, Default)]
pub struct NotificationLog {
    inner: Mutex<LogInner>,
}

impl NotificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of notifications recorded so far.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All notifications in delivery order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<Notification> {
        self.lock()
            .entries
            .last()
            .map(|entry| entry.notification.clone())
    }

    /// Entries matching `filter`, oldest first.
    pub fn query(&self, filter: &NotificationFilter) -> Vec<LoggedNotification> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .filter(|entry| filter.kind.map_or(true, |k| entry.notification.kind == k))
            .filter(|entry| {
                filter
                    .severity
                    .map_or(true, |s| entry.notification.severity == s)
            })
            .filter(|entry| filter.after_seq.map_or(true, |seq| entry.seq > seq))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Number of notifications presented as errors.
    pub fn destructive_count(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|entry| entry.notification.is_destructive())
            .count()
    }

    /// Drops every recorded notification. Sequence numbers keep increasing.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        let mut inner = self.lock();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.entries.push(LoggedNotification { seq, notification });
    }
}

/// Delivers every notification to each of its sinks in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    /// Creates an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl NotificationSink for FanoutSink {
    fn notify(&self, notification: Notification) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.notify(notification.clone());
            }
            last.notify(notification);
        }
    }
}
