//! Edit-distance fuzzy matching over evasion-normalized text.
//!
//! The fuzzy path catches near-misses the automaton cannot: symbol
//! substitutions, inserted separators, and stretched spellings that survive
//! standard normalization. It compares evasion-normalized variants of
//! candidate tokens against evasion-normalized patterns and scores each hit
//! with a confidence in `0.0..=1.0` derived from Levenshtein distance.

use crate::config::Strictness;
use crate::normalizer::tables::{fold_confusable, SCRIPT_VARIANTS};
use crate::normalizer::{is_mixed_script, Normalizer, NormalizerOptions};
use crate::pattern::EvasionTechnique;
use once_cell::sync::Lazy;
use regex::Regex;

static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][@$!*#%&+|<(€£¢¥§]|[@$!*#%&+|<(€£¢¥§][A-Za-z]").unwrap()
});

static SPACED_LETTERS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[a-z0-9]([ .\-_][a-z0-9]){2,}\b").unwrap());

static NUMERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][0-9]|[0-9][A-Za-z]").unwrap());

/// Classic Levenshtein distance with unit insertion, deletion, and
/// substitution costs, computed over chars with a full DP matrix.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }
    matrix[a.len()][b.len()]
}

/// A fuzzy hit against one pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOutcome {
    pub confidence: f64,
    /// The token of the original text the hit was found in, pre-normalization.
    pub matched_token: String,
}

/// Near-miss matcher parameterized by strictness and maximum edit distance.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    strictness: Strictness,
    max_edit_distance: usize,
    normalizer: Normalizer,
    evasion_options: NormalizerOptions,
}

impl FuzzyMatcher {
    pub fn new(
        strictness: Strictness,
        max_edit_distance: usize,
        evasion_options: NormalizerOptions,
    ) -> Self {
        Self {
            strictness,
            max_edit_distance,
            normalizer: Normalizer::default(),
            evasion_options,
        }
    }

    /// Find the best fuzzy hit for `pattern_word` anywhere in `text`.
    ///
    /// Candidates are the whitespace-delimited tokens of the original text
    /// (edge punctuation trimmed) plus, for multi-token text, the text as a
    /// whole so separator-insertion evasions spanning tokens are caught.
    pub fn best_match(&self, text: &str, pattern_word: &str) -> Option<FuzzyOutcome> {
        let mut best: Option<FuzzyOutcome> = None;
        let mut consider = |candidate: &str| {
            if candidate.is_empty() {
                return;
            }
            if let Some(confidence) = self.match_candidate(candidate, pattern_word) {
                let better = best
                    .as_ref()
                    .map(|b| confidence > b.confidence)
                    .unwrap_or(true);
                if better {
                    best = Some(FuzzyOutcome {
                        confidence,
                        matched_token: candidate.to_string(),
                    });
                }
            }
        };

        let tokens: Vec<&str> = text.split_whitespace().collect();
        for token in &tokens {
            consider(token.trim_matches(|c: char| !c.is_alphanumeric()));
        }
        if tokens.len() > 1 {
            consider(text.trim());
        }
        best
    }

    /// Score one candidate against one pattern word.
    pub fn match_candidate(&self, candidate: &str, pattern_word: &str) -> Option<f64> {
        match self.strictness {
            Strictness::Exact => {
                let eq = candidate.to_lowercase() == pattern_word.to_lowercase();
                eq.then_some(1.0)
            }
            Strictness::Standard => {
                let text = self.evasion_normalize(candidate);
                let pattern = self.evasion_normalize(pattern_word);
                (!pattern.is_empty() && text == pattern).then_some(0.95)
            }
            Strictness::Aggressive => {
                let text = self.evasion_normalize(candidate);
                let pattern = self.evasion_normalize(pattern_word);
                if pattern.is_empty() {
                    return None;
                }
                if text == pattern {
                    return Some(0.95);
                }
                self.distance_confidence(&text, &pattern, self.max_edit_distance, 0.7)
            }
            Strictness::MaximumRecall => {
                let text = self.normalizer.normalize_aggressive(candidate);
                let pattern = self.normalizer.normalize_aggressive(pattern_word);
                if pattern.is_empty() {
                    return None;
                }
                if text == pattern {
                    return Some(0.99);
                }
                if text.contains(&pattern) {
                    return Some(0.95);
                }
                let pattern_len = pattern.chars().count();
                let relaxed = (0.4 * pattern_len as f64).ceil() as usize;
                let budget = self.max_edit_distance.max(relaxed);
                self.distance_confidence(&text, &pattern, budget, 0.5)
            }
        }
    }

    fn evasion_normalize(&self, text: &str) -> String {
        self.normalizer.normalize_with(text, &self.evasion_options)
    }

    fn distance_confidence(
        &self,
        text: &str,
        pattern: &str,
        budget: usize,
        threshold: f64,
    ) -> Option<f64> {
        let text_len = text.chars().count();
        let pattern_len = pattern.chars().count();
        // Length difference alone already exceeds the budget.
        if text_len.abs_diff(pattern_len) > budget {
            return None;
        }
        let distance = levenshtein(text, pattern);
        if distance > budget {
            return None;
        }
        let confidence = 1.0 - distance as f64 / text_len.max(pattern_len) as f64;
        (confidence >= threshold).then_some(confidence)
    }
}

/// Best-effort classification of evasion techniques present in the original
/// (pre-normalization) text.
///
/// Independent of whether a match came from the automaton or the fuzzy path.
pub fn detect_evasion_techniques(original: &str) -> Vec<EvasionTechnique> {
    let mut techniques = Vec::new();

    if SYMBOL_RE.is_match(original) {
        techniques.push(EvasionTechnique::SymbolReplacement);
    }
    if SPACED_LETTERS_RE.is_match(original) {
        techniques.push(EvasionTechnique::SpaceInsertion);
    }
    if has_repeated_run(original, 3) {
        techniques.push(EvasionTechnique::RepeatedLetters);
    }
    if NUMERAL_RE.is_match(original) {
        techniques.push(EvasionTechnique::NumeralSubstitution);
    }
    if is_mixed_script(original) {
        techniques.push(EvasionTechnique::MixedScript);
    }
    if original
        .chars()
        .any(|c| fold_confusable(c).is_some() || SCRIPT_VARIANTS.contains_key(&c))
    {
        techniques.push(EvasionTechnique::CharacterSubstitution);
    }

    techniques
}

// The regex crate has no backreferences, so repeated-run detection is a scan.
fn has_repeated_run(text: &str, min_run: usize) -> bool {
    let mut run_char = None;
    let mut run_len = 0usize;
    for c in text.chars() {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            run_char = Some(c);
            run_len = 1;
        }
        if run_len >= min_run && c.is_alphabetic() {
            return true;
        }
    }
    false
}
