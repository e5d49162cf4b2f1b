//! The `ContentFilter` facade.
//!
//! Owns the configuration, the whitelist, and one automaton instance per
//! configuration. The automaton is immutable after build: every pattern-set or
//! configuration change discards it and rebuilds from scratch, because failure
//! links are derived globally from the whole pattern set and cannot be patched
//! incrementally. Concurrent reads of a built filter are safe (`detect` takes
//! `&self`); mutation requires `&mut self`.

use crate::automaton::{AutomatonMatch, PatternAutomaton};
use crate::config::{FilterConfig, Strictness};
use crate::error::Result;
use crate::fuzzy::{detect_evasion_techniques, FuzzyMatcher};
use crate::normalizer::{Normalizer, NormalizerOptions};
use crate::pattern::{DetectionResult, Match, Pattern, WhitelistEntry};
use crate::reconciler::MatchReconciler;

/// Deterministic profanity detection over character sequences.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    config: FilterConfig,
    normalizer: Normalizer,
    patterns: Vec<Pattern>,
    whitelist: Vec<WhitelistEntry>,
    automaton: PatternAutomaton,
}

impl ContentFilter {
    /// Create an empty filter. Fails if the configuration is invalid.
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let mut filter = Self {
            normalizer: Normalizer::default(),
            config,
            patterns: Vec::new(),
            whitelist: Vec::new(),
            automaton: PatternAutomaton::new(),
        };
        filter.rebuild();
        Ok(filter)
    }

    /// Create a filter preloaded with a pattern batch.
    pub fn with_patterns(config: FilterConfig, patterns: Vec<Pattern>) -> Result<Self> {
        let mut filter = Self::new(config)?;
        filter.add_patterns(patterns)?;
        Ok(filter)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Patterns currently loaded, active or not.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Patterns active under the current range filters.
    pub fn active_pattern_count(&self) -> usize {
        self.automaton.pattern_count()
    }

    /// Replace the configuration and rebuild the automaton.
    pub fn set_config(&mut self, config: FilterConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.rebuild();
        Ok(())
    }

    /// Insert a batch of patterns.
    ///
    /// All-or-nothing: the whole batch is validated before any insertion, so a
    /// partially invalid batch leaves the automaton untouched.
    pub fn add_patterns(&mut self, patterns: Vec<Pattern>) -> Result<()> {
        Pattern::validate_batch(&patterns)?;
        self.patterns.extend(patterns);
        self.rebuild();
        Ok(())
    }

    /// Remove every pattern with this word (case-insensitive). Returns whether
    /// anything was removed.
    pub fn remove_pattern(&mut self, word: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| !p.word.eq_ignore_ascii_case(word));
        let removed = self.patterns.len() != before;
        if removed {
            self.rebuild();
        }
        removed
    }

    pub fn add_whitelist_entry(&mut self, entry: WhitelistEntry) {
        self.whitelist.push(entry);
    }

    /// Whitelist a word with default flags (case-insensitive, whole word).
    pub fn add_whitelist_word(&mut self, word: &str) {
        self.whitelist.push(WhitelistEntry::new(word));
    }

    /// Returns whether an entry was removed.
    pub fn remove_whitelist_word(&mut self, word: &str) -> bool {
        let before = self.whitelist.len();
        self.whitelist
            .retain(|entry| !entry.word.eq_ignore_ascii_case(word));
        self.whitelist.len() != before
    }

    /// Run detection over `text`.
    pub fn detect(&self, text: &str) -> Result<DetectionResult> {
        let matches = self.collect_matches(text)?;
        Ok(DetectionResult {
            has_match: !matches.is_empty(),
            matches,
            original_text: text.to_string(),
            cleaned_text: None,
        })
    }

    /// Run detection and the replacement pass in one call.
    pub fn detect_and_clean(&self, text: &str) -> Result<DetectionResult> {
        let matches = self.collect_matches(text)?;
        let cleaned = MatchReconciler::replace_spans(text, &matches, self.config.replacement_char);
        Ok(DetectionResult {
            has_match: !matches.is_empty(),
            matches,
            original_text: text.to_string(),
            cleaned_text: Some(cleaned),
        })
    }

    /// Replace every surviving match span with the replacement character.
    pub fn clean(&self, text: &str) -> Result<String> {
        let matches = self.collect_matches(text)?;
        Ok(MatchReconciler::replace_spans(
            text,
            &matches,
            self.config.replacement_char,
        ))
    }

    pub fn has_match(&self, text: &str) -> Result<bool> {
        Ok(!self.collect_matches(text)?.is_empty())
    }

    /// Full rebuild of the automaton from the active pattern subset.
    fn rebuild(&mut self) {
        let mut automaton = PatternAutomaton::new();
        for pattern in &self.patterns {
            if !self.config.pattern_active(pattern) {
                continue;
            }
            let normalized = self.searchable_form(&pattern.word);
            automaton.insert(pattern.clone(), &normalized);
        }
        automaton.build_failure_links();
        self.automaton = automaton;
    }

    /// The canonical form both patterns and text are searched under.
    fn searchable_form(&self, text: &str) -> String {
        if self.config.normalize {
            self.normalizer.normalize(text)
        } else {
            text.to_lowercase()
        }
    }

    fn collect_matches(&self, text: &str) -> Result<Vec<Match>> {
        let searched = self.searchable_form(text);
        let techniques = detect_evasion_techniques(text);
        let techniques = (!techniques.is_empty()).then_some(techniques);

        let raw = self.automaton.search(&searched, self.config.partial_match)?;
        let mut matches = self.to_matches(&raw, text, &techniques, None);

        if self.config.enable_fuzzy_matching {
            MatchReconciler::merge(&mut matches, self.fuzzy_matches(text, &techniques));
        }

        if self.config.strictness == Strictness::MaximumRecall {
            // Stricter pass: boundaries do not survive aggressive
            // normalization, so this pass always searches in partial mode.
            let aggressive = self.normalizer.normalize_aggressive(text);
            let raw = self.automaton.search(&aggressive, true)?;
            let extra = self.to_matches(&raw, text, &techniques, None);
            MatchReconciler::merge(&mut matches, extra);
        }

        let reconciler = MatchReconciler::new(self.config.context_aware);
        Ok(reconciler.reconcile(matches, &self.whitelist, text))
    }

    /// Convert raw automaton hits into reported matches, re-anchoring each to
    /// the original text by case-insensitive occurrence search. Successive
    /// hits on the same word take successive occurrences. When normalization
    /// changed the surface form the occurrence search can miss and the offset
    /// into the searched text is kept instead.
    fn to_matches(
        &self,
        raw: &[AutomatonMatch],
        original: &str,
        techniques: &Option<Vec<crate::pattern::EvasionTechnique>>,
        confidence: Option<f64>,
    ) -> Vec<Match> {
        let original_lower: Vec<char> = original.to_lowercase().chars().collect();
        let mut matches = Vec::with_capacity(raw.len());
        let mut cursor: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

        let mut ordered: Vec<&AutomatonMatch> = raw.iter().collect();
        ordered.sort_by_key(|m| m.position);

        for hit in ordered {
            let pattern = self.automaton.pattern(hit.pattern);
            let word: Vec<char> = pattern.word.to_lowercase().chars().collect();
            let from = cursor.get(pattern.word.as_str()).copied().unwrap_or(0);

            let (position, length) = match find_chars(&original_lower, &word, from) {
                Some(at) => {
                    cursor.insert(pattern.word.as_str(), at + word.len());
                    (at, word.len())
                }
                None => (hit.position, hit.length),
            };

            matches.push(Match {
                word: pattern.word.clone(),
                severity: pattern.severity,
                category: pattern.category.clone(),
                position,
                length,
                confidence,
                evasion_techniques: techniques.clone(),
            });
        }
        matches
    }

    fn fuzzy_matches(
        &self,
        original: &str,
        techniques: &Option<Vec<crate::pattern::EvasionTechnique>>,
    ) -> Vec<Match> {
        let evasion = NormalizerOptions::evasion(
            self.config.detect_symbol_replacement,
            self.config.detect_space_insertion,
            self.config.detect_repeated_letters,
            self.config.detect_language_mixing,
        );
        let fuzzy = FuzzyMatcher::new(self.config.strictness, self.config.max_edit_distance, evasion);
        let original_lower: Vec<char> = original.to_lowercase().chars().collect();

        let mut matches = Vec::new();
        for index in 0..self.automaton.pattern_count() {
            let pattern = self.automaton.pattern(index as u32);
            let Some(outcome) = fuzzy.best_match(original, &pattern.word) else {
                continue;
            };

            // Position is found by a case-insensitive search for the pattern
            // word in the original text; an obfuscated spelling falls back to
            // the token the fuzzy hit actually matched.
            let word: Vec<char> = pattern.word.to_lowercase().chars().collect();
            let (position, length) = match find_chars(&original_lower, &word, 0) {
                Some(at) => (at, word.len()),
                None => {
                    let token: Vec<char> = outcome.matched_token.to_lowercase().chars().collect();
                    match find_chars(&original_lower, &token, 0) {
                        Some(at) => (at, token.len()),
                        None => (0, word.len()),
                    }
                }
            };

            matches.push(Match {
                word: pattern.word.clone(),
                severity: pattern.severity,
                category: pattern.category.clone(),
                position,
                length,
                confidence: Some(outcome.confidence),
                evasion_techniques: techniques.clone(),
            });
        }
        matches
    }
}

/// Char-based substring search starting at `from`.
fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == needle[..])
}
