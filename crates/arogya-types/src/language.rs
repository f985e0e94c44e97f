//! Supported languages and their preferred synthesis voices.
//!
//! The catalog is a fixed, ordered table. Its order is the order languages are
//! offered to the user, and the first entry doubles as the fallback label when
//! a caller asks about a code the catalog does not know.

use serde::Serialize;

/// Locale tag used when nothing else has been selected.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// A language the voice layer can listen and speak in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageDescriptor {
    /// BCP 47 locale tag, e.g. `hi-IN`.
    pub code: &'static str,
    /// Display name shown in language pickers.
    pub label: &'static str,
    /// Name of the synthesis voice to prefer when the engine offers it.
    pub voice_hint: Option<&'static str>,
}

const BUILTIN: &[LanguageDescriptor] = &[
    LanguageDescriptor {
        code: "en-US",
        label: "English",
        voice_hint: Some("Google US English"),
    },
    LanguageDescriptor {
        code: "hi-IN",
        label: "हिन्दी (Hindi)",
        voice_hint: Some("Google हिन्दी"),
    },
    LanguageDescriptor {
        code: "kn-IN",
        label: "ಕನ್ನಡ (Kannada)",
        voice_hint: Some("Google Kannada"),
    },
];

/// Ordered lookup table of supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageCatalog {
    entries: &'static [LanguageDescriptor],
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageCatalog {
    /// The catalog shipped with the application: English, Hindi, Kannada.
    pub const fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// Wraps a caller-provided table. Codes are expected to be unique; lookups
    /// return the first match.
    pub const fn from_static(entries: &'static [LanguageDescriptor]) -> Self {
        Self { entries }
    }

    /// All entries in display order.
    pub fn entries(&self) -> &'static [LanguageDescriptor] {
        self.entries
    }

    /// Looks up a descriptor by exact locale tag (case-insensitive).
    pub fn find(&self, code: &str) -> Option<&'static LanguageDescriptor> {
        self.entries.iter().find(|entry| same_tag(entry.code, code))
    }

    /// Returns `true` if `code` is one of the supported locales.
    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// Display label for `code`, falling back to the first entry's label for
    /// unknown codes.
    pub fn label_for(&self, code: &str) -> &'static str {
        self.find(code)
            .or_else(|| self.entries.first())
            .map(|entry| entry.label)
            .unwrap_or("English")
    }

    /// Preferred synthesis voice name for `code`, if the catalog has one.
    pub fn voice_hint(&self, code: &str) -> Option<&'static str> {
        self.find(code).and_then(|entry| entry.voice_hint)
    }

    /// The locale used when the caller has not chosen one.
    pub fn default_language(&self) -> &'static str {
        self.find(DEFAULT_LANGUAGE)
            .or_else(|| self.entries.first())
            .map(|entry| entry.code)
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Returns the primary subtag of a locale tag. Both `-` and `_` separators are
/// accepted since engines report either form.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// Compares two locale tags, ignoring case and separator style.
pub fn same_tag(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            let x = if x == '_' { '-' } else { x };
            let y = if y == '_' { '-' } else { y };
            x.eq_ignore_ascii_case(&y)
        })
}

/// Returns `true` if both tags share a primary subtag (`en-GB` and `en-US`).
pub fn same_family(a: &str, b: &str) -> bool {
    let (a, b) = (primary_subtag(a), primary_subtag(b));
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_order_is_display_order() {
        let codes: Vec<_> = LanguageCatalog::builtin()
            .entries()
            .iter()
            .map(|e| e.code)
            .collect();
        assert_eq!(codes, vec!["en-US", "hi-IN", "kn-IN"]);
    }

    #[test]
    fn builtin_codes_are_unique() {
        let entries = LanguageCatalog::builtin().entries();
        let unique: HashSet<_> = entries.iter().map(|e| e.code).collect();
        assert_eq!(unique.len(), entries.len());
    }

    #[test]
    fn find_is_case_insensitive() {
        let catalog = LanguageCatalog::builtin();
        assert_eq!(catalog.find("hi-in").map(|e| e.code), Some("hi-IN"));
        assert_eq!(catalog.find("kn_IN").map(|e| e.code), Some("kn-IN"));
        assert!(catalog.find("ta-IN").is_none());
        assert!(!catalog.contains("fr-FR"));
    }

    #[test]
    fn label_falls_back_to_first_entry() {
        let catalog = LanguageCatalog::builtin();
        assert_eq!(catalog.label_for("kn-IN"), "ಕನ್ನಡ (Kannada)");
        assert_eq!(catalog.label_for("xx-XX"), "English");
    }

    #[test]
    fn voice_hints() {
        let catalog = LanguageCatalog::builtin();
        assert_eq!(catalog.voice_hint("en-US"), Some("Google US English"));
        assert_eq!(catalog.voice_hint("de-DE"), None);
        assert_eq!(catalog.default_language(), "en-US");
    }

    #[test]
    fn custom_catalog_default_uses_first_entry() {
        static TAMIL: &[LanguageDescriptor] = &[LanguageDescriptor {
            code: "ta-IN",
            label: "Tamil",
            voice_hint: None,
        }];
        let catalog = LanguageCatalog::from_static(TAMIL);
        assert_eq!(catalog.default_language(), "ta-IN");
        assert_eq!(catalog.label_for("en-US"), "Tamil");
    }

    #[test]
    fn tag_comparisons() {
        assert_eq!(primary_subtag("hi-IN"), "hi");
        assert_eq!(primary_subtag("en_GB"), "en");
        assert_eq!(primary_subtag("kn"), "kn");
        assert!(same_tag("en-US", "EN_us"));
        assert!(!same_tag("en-US", "en-GB"));
        assert!(same_family("en-US", "en-GB"));
        assert!(!same_family("en-US", "eng-US"));
        assert!(!same_family("", "-US"));
    }
}
