//! Filter configuration.
//!
//! All options live in one fully-defaulted [`FilterConfig`] value validated at
//! construction time; nothing applies partial overrides mid-pipeline.

use crate::error::{FilterError, Result};
use crate::pattern::{MAX_SEVERITY, MIN_SEVERITY, SUPPORTED_LANGUAGES};
use serde::{Deserialize, Serialize};

/// How aggressively the engine hunts for obfuscated matches.
///
/// Levels trade precision for recall:
///
/// | Level | Behavior |
/// |-------|----------|
/// | `Exact` | case-insensitive exact matching only |
/// | `Standard` | evasion-normalized equality |
/// | `Aggressive` | `Standard` plus bounded edit distance |
/// | `MaximumRecall` | lossy normalization, containment and relaxed distance |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    Exact,
    Standard,
    Aggressive,
    MaximumRecall,
}

impl Strictness {
    /// Map a numeric level in `1..=4` to a strictness.
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            1 => Ok(Self::Exact),
            2 => Ok(Self::Standard),
            3 => Ok(Self::Aggressive),
            4 => Ok(Self::MaximumRecall),
            other => Err(FilterError::InvalidConfig(format!(
                "strictness level {other} outside 1..=4"
            ))),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Exact => 1,
            Self::Standard => 2,
            Self::Aggressive => 3,
            Self::MaximumRecall => 4,
        }
    }
}

impl Default for Strictness {
    fn default() -> Self {
        Self::Standard
    }
}

/// Configuration for a [`ContentFilter`](crate::ContentFilter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Run the canonicalization pipeline before automaton search.
    pub normalize: bool,
    /// Report matches inside longer words (no word-boundary filtering).
    pub partial_match: bool,
    /// Enable the edit-distance fuzzy path alongside the automaton.
    pub enable_fuzzy_matching: bool,
    pub strictness: Strictness,
    /// Maximum Levenshtein distance accepted by the fuzzy matcher.
    pub max_edit_distance: usize,
    /// Fold leet/decorative symbols during evasion normalization.
    pub detect_symbol_replacement: bool,
    /// Strip artificial separators ("f u c k") during evasion normalization.
    pub detect_space_insertion: bool,
    /// Collapse repeated-letter runs ("fuuuuck") during evasion normalization.
    pub detect_repeated_letters: bool,
    /// Apply cross-script phonetic folding to mixed-script input.
    pub detect_language_mixing: bool,
    /// Suppress matches that only occur inside known-benign longer words.
    pub context_aware: bool,
    /// Only patterns with severity `>= min_severity` are active.
    pub min_severity: u8,
    /// Only patterns with severity `<= max_severity` are active.
    pub max_severity: u8,
    /// Active pattern languages; empty means all supported languages.
    pub languages: Vec<String>,
    /// Active pattern categories; empty means all categories.
    pub categories: Vec<String>,
    /// Character used by the replacement pass.
    pub replacement_char: char,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            partial_match: false,
            enable_fuzzy_matching: true,
            strictness: Strictness::Standard,
            max_edit_distance: 1,
            detect_symbol_replacement: true,
            detect_space_insertion: true,
            detect_repeated_letters: true,
            detect_language_mixing: true,
            context_aware: true,
            min_severity: MIN_SEVERITY,
            max_severity: MAX_SEVERITY,
            languages: Vec::new(),
            categories: Vec::new(),
            replacement_char: '*',
        }
    }
}

impl FilterConfig {
    /// Configuration tuned for maximum recall moderation queues.
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::MaximumRecall,
            max_edit_distance: 2,
            ..Self::default()
        }
    }

    /// Exact matching only; no normalization beyond case folding.
    pub fn lenient() -> Self {
        Self {
            normalize: false,
            strictness: Strictness::Exact,
            enable_fuzzy_matching: false,
            context_aware: false,
            ..Self::default()
        }
    }

    /// Validate the whole configuration value.
    pub fn validate(&self) -> Result<()> {
        if self.min_severity < MIN_SEVERITY || self.max_severity > MAX_SEVERITY {
            return Err(FilterError::InvalidConfig(format!(
                "severity range {}..={} outside {MIN_SEVERITY}..={MAX_SEVERITY}",
                self.min_severity, self.max_severity
            )));
        }
        if self.min_severity > self.max_severity {
            return Err(FilterError::InvalidConfig(format!(
                "min_severity {} exceeds max_severity {}",
                self.min_severity, self.max_severity
            )));
        }
        if self.max_edit_distance > 8 {
            return Err(FilterError::InvalidConfig(format!(
                "max_edit_distance {} unreasonably large (limit 8)",
                self.max_edit_distance
            )));
        }
        for lang in &self.languages {
            if !SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
                return Err(FilterError::UnsupportedLanguage(lang.clone()));
            }
        }
        Ok(())
    }

    /// Whether a pattern passes the severity/language/category range filters.
    pub fn pattern_active(&self, pattern: &crate::pattern::Pattern) -> bool {
        if pattern.severity < self.min_severity || pattern.severity > self.max_severity {
            return false;
        }
        if !self.languages.is_empty() && !self.languages.iter().any(|l| l == &pattern.language) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.iter().any(|c| c == &pattern.category) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FilterConfig::default().validate().is_ok());
        assert!(FilterConfig::strict().validate().is_ok());
        assert!(FilterConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_strictness_level_round_trip() {
        for level in 1..=4 {
            assert_eq!(Strictness::from_level(level).unwrap().level(), level);
        }
        assert!(Strictness::from_level(0).is_err());
        assert!(Strictness::from_level(5).is_err());
    }

    #[test]
    fn test_inverted_severity_range_rejected() {
        let config = FilterConfig {
            min_severity: 3,
            max_severity: 2,
            ..FilterConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            FilterError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_oversized_edit_distance_rejected() {
        let config = FilterConfig {
            max_edit_distance: 50,
            ..FilterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_language_filter_rejected() {
        let config = FilterConfig {
            languages: vec!["xx".to_string()],
            ..FilterConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FilterError::UnsupportedLanguage("xx".to_string())
        );
    }

    #[test]
    fn test_pattern_range_filters() {
        let config = FilterConfig {
            min_severity: 2,
            languages: vec!["en".to_string()],
            categories: vec!["profanity".to_string()],
            ..FilterConfig::default()
        };

        let active = Pattern::new("damn", 2, "profanity", "en");
        assert!(config.pattern_active(&active));

        let too_mild = Pattern::new("darn", 1, "profanity", "en");
        assert!(!config.pattern_active(&too_mild));

        let wrong_lang = Pattern::new("merde", 2, "profanity", "fr");
        assert!(!config.pattern_active(&wrong_lang));

        let wrong_category = Pattern::new("damn", 2, "slur", "en");
        assert!(!config.pattern_active(&wrong_category));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());

        let config: FilterConfig =
            serde_json::from_str(r#"{"strictness": "maximum_recall"}"#).unwrap();
        assert_eq!(config.strictness, Strictness::MaximumRecall);
    }
}
