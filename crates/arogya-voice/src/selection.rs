//! Synthesis voice resolution.

use arogya_types::language::{same_family, same_tag};

use crate::engine::VoiceInfo;

/// How a voice was picked for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMatch {
    /// A voice with exactly the requested locale tag.
    Exact,
    /// A voice sharing only the primary subtag (`en-GB` for `en-US`).
    Family,
    /// Nothing matched; the engine chooses by locale tag alone.
    EngineDefault,
}

/// The voice chosen at speak time. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    pub voice: Option<VoiceInfo>,
    pub matched: VoiceMatch,
}

impl VoiceSelection {
    pub fn voice_name(&self) -> Option<&str> {
        self.voice.as_ref().map(|voice| voice.name.as_str())
    }
}

/// Picks a voice for `language_code` from what the engine reports.
///
/// Exact tag matches beat family matches. Within either group a voice named
/// `hint` wins, otherwise the engine's first listed voice.
pub fn resolve_voice(
    voices: &[VoiceInfo],
    language_code: &str,
    hint: Option<&str>,
) -> VoiceSelection {
    let exact: Vec<&VoiceInfo> = voices
        .iter()
        .filter(|voice| same_tag(&voice.tag, language_code))
        .collect();
    if let Some(voice) = prefer_hint(&exact, hint) {
        return VoiceSelection {
            voice: Some(voice.clone()),
            matched: VoiceMatch::Exact,
        };
    }

    let family: Vec<&VoiceInfo> = voices
        .iter()
        .filter(|voice| same_family(&voice.tag, language_code))
        .collect();
    match prefer_hint(&family, hint) {
        Some(voice) => VoiceSelection {
            voice: Some(voice.clone()),
            matched: VoiceMatch::Family,
        },
        None => VoiceSelection {
            voice: None,
            matched: VoiceMatch::EngineDefault,
        },
    }
}

fn prefer_hint<'a>(candidates: &[&'a VoiceInfo], hint: Option<&str>) -> Option<&'a VoiceInfo> {
    hint.and_then(|name| candidates.iter().find(|voice| voice.name == name).copied())
        .or_else(|| candidates.first().copied())
}
