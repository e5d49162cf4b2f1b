//! Core data model shared across the detection pipeline.
//!
//! Patterns are immutable once inserted into an automaton build; any change to
//! the pattern set discards and rebuilds the automaton rather than patching it
//! in place.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// Lowest valid pattern severity.
pub const MIN_SEVERITY: u8 = 1;
/// Highest valid pattern severity.
pub const MAX_SEVERITY: u8 = 4;

/// Language tags the engine accepts on patterns.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "nl", "ru", "ar", "hi", "tr", "pl",
];

/// A single word or phrase to detect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub word: String,
    /// Severity in `1..=4`, 4 being the most severe.
    pub severity: u8,
    pub category: String,
    /// BCP-47-style primary language tag, e.g. `"en"`.
    pub language: String,
}

impl Pattern {
    pub fn new(
        word: impl Into<String>,
        severity: u8,
        category: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            severity,
            category: category.into(),
            language: language.into(),
        }
    }

    /// Validate a single pattern record.
    pub fn validate(&self) -> Result<()> {
        if self.word.trim().is_empty() {
            return Err(FilterError::EmptyPattern);
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            return Err(FilterError::InvalidSeverity(self.severity));
        }
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            return Err(FilterError::UnsupportedLanguage(self.language.clone()));
        }
        Ok(())
    }

    /// Validate an entire batch before any of it is inserted.
    ///
    /// All-or-nothing: the first invalid record fails the whole batch, so a
    /// partially invalid batch never mutates automaton state.
    pub fn validate_batch(patterns: &[Pattern]) -> Result<()> {
        for pattern in patterns {
            pattern.validate()?;
        }
        Ok(())
    }
}

/// Evasion techniques recognized in the original (pre-normalization) text.
///
/// Classification is best-effort and independent of whether the match came
/// from the automaton or the fuzzy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvasionTechnique {
    SymbolReplacement,
    SpaceInsertion,
    RepeatedLetters,
    NumeralSubstitution,
    MixedScript,
    CharacterSubstitution,
}

/// A single reported detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// The pattern word as originally inserted (pre-normalization).
    pub word: String,
    pub severity: u8,
    pub category: String,
    /// Char offset of the match start.
    ///
    /// Matches are re-anchored to the original text by a case-insensitive
    /// search for the matched word. When normalization changed the surface
    /// form (symbol removal, homoglyph folding, and especially the lossy
    /// maximum-recall re-scan) that search can miss, and the offset into the
    /// text that was actually searched is kept instead. Such offsets are
    /// usable for detection but not as coordinates into the original text;
    /// the replacement pass verifies exact-match spans before blanking them
    /// for this reason. This mirrors the behavior of fuzzy-path position
    /// reporting and is a known limitation of the coordinate model.
    pub position: usize,
    /// Match length in chars.
    pub length: usize,
    /// Fuzzy-path confidence in `0.0..=1.0`; `None` for exact automaton hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evasion_techniques: Option<Vec<EvasionTechnique>>,
}

/// One whitelist record consumed from collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub word: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub whole_word: bool,
}

impl WhitelistEntry {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            case_sensitive: false,
            whole_word: true,
        }
    }

    /// Whether this entry suppresses a match on `word`.
    pub fn suppresses(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.word == word
        } else {
            self.word.eq_ignore_ascii_case(word)
        }
    }
}

/// Final outcome of a detection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub has_match: bool,
    pub matches: Vec<Match>,
    pub original_text: String,
    /// Present only when a replacement pass was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_text: Option<String>,
}
