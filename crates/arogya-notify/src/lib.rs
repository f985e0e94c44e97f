//! User-facing notifications for the Arogya voice layer.
//!
//! The voice controllers never talk to a UI directly. Every status change the
//! user should see (microphone ready, listening, playback failed, ...) is
//! emitted as a [`Notification`] into a [`NotificationSink`] that the host
//! application supplies.
//!
//! # Notification kinds
//!
//! | Kind | Severity | Emitted when |
//! |------|----------|--------------|
//! | `MICROPHONE_READY` | info | microphone permission granted |
//! | `MICROPHONE_DENIED` | destructive | microphone permission refused |
//! | `VOICE_UNSUPPORTED` | destructive | no recognition engine on this host |
//! | `LISTENING_STARTED` | info | a recognition session started |
//! | `VOICE_INPUT_ERROR` | destructive | recognition failed or could not start |
//! | `PLAYBACK_STARTED` | info | read-aloud started |
//! | `PLAYBACK_STOPPED` | info | read-aloud stopped by the user |
//! | `PLAYBACK_FAILED` | destructive | the synthesis engine reported an error |
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use arogya_notify::{Notification, NotificationKind, NotificationLog, NotificationSink};
//!
//! let log = Arc::new(NotificationLog::new());
//! log.notify(Notification::new(
//!     NotificationKind::MicrophoneReady,
//!     "Microphone ready",
//!     "You can now use voice input",
//! ));
//! assert_eq!(log.len(), 1);
//! ```

mod notification;
mod sink;

pub use notification::{Notification, NotificationKind, ParseNotificationKindError};
pub use sink::{
    BroadcastSink, FanoutSink, LoggedNotification, NotificationFilter, NotificationLog,
    NotificationSink, TracingSink,
};

#[cfg(test)]
mod tests;
