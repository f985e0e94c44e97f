//! Microphone permission with a cached grant.

use arogya_notify::{Notification, NotificationKind, NotificationSink};
use std::sync::Arc;
use tracing::{info, warn};

use crate::engine::{AudioPermission, CaptureKind};
use crate::error::VoiceError;

/// What the gate currently knows about microphone access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    /// The last prompt was refused. Does not suppress the next prompt.
    Denied,
}

/// Acquires microphone permission and remembers a grant.
///
/// The microphone is only opened to prove access: the handle from a
/// successful prompt is released immediately. Once granted, later requests
/// return without prompting until [`PermissionGate::revoke`] is called. A
/// refusal is never cached, so the user can change their settings and retry.
pub struct PermissionGate {
    capability: Box<dyn AudioPermission>,
    state: PermissionState,
    notifier: Arc<dyn NotificationSink>,
}

impl PermissionGate {
    pub fn new(capability: Box<dyn AudioPermission>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            capability,
            state: PermissionState::Unknown,
            notifier,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state == PermissionState::Granted
    }

    /// Forgets a previous grant so the next request prompts again.
    pub fn revoke(&mut self) {
        if self.state != PermissionState::Unknown {
            info!(previous = ?self.state, "microphone permission reset");
        }
        self.state = PermissionState::Unknown;
    }

    /// Ensures microphone access, prompting unless a grant is cached.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::PermissionDenied` with the prompt's reason when
    /// the user refuses. A destructive notification has already been sent.
    pub async fn request_audio_access(&mut self) -> Result<(), VoiceError> {
        if self.is_granted() {
            return Ok(());
        }

        info!("requesting microphone permission");
        match self.capability.request_access(CaptureKind::Audio).await {
            Ok(grant) => {
                grant.release();
                self.state = PermissionState::Granted;
                info!("microphone permission granted");
                self.notifier.notify(Notification::new(
                    NotificationKind::MicrophoneReady,
                    "Microphone ready",
                    "You can now use voice input",
                ));
                Ok(())
            }
            Err(denial) => {
                self.state = PermissionState::Denied;
                warn!(reason = %denial.reason, "microphone permission denied");
                let err = VoiceError::PermissionDenied(denial.reason);
                if let Some(notification) = err.notification() {
                    self.notifier.notify(notification);
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
