//! Shared types and constants for the Arogya voice layer.
//!
//! This crate provides the foundational types used across all Arogya crates:
//! the supported-language catalog with its synthesis voice hints, and the
//! severity levels attached to user-facing notifications.
//!
//! It has no dependency on any other workspace crate, which keeps the
//! dependency graph a straight line from the catalog up to the controllers.

use serde::{Deserialize, Serialize};

pub mod language;

pub use language::{LanguageCatalog, LanguageDescriptor, DEFAULT_LANGUAGE};

/// How prominently a notification should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Status information (microphone ready, listening, playback started).
    #[default]
    Info,
    /// A failure the user should act on (permission denied, playback failed).
    Destructive,
}

impl Severity {
    /// Returns the string label for this severity.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Destructive => "destructive",
        }
    }

    /// Returns `true` for [`Severity::Destructive`].
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Destructive)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
