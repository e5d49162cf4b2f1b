//! Match reconciliation: merging, deduplication, suppression, replacement.
//!
//! The automaton and fuzzy paths each produce candidate matches; the
//! reconciler merges them without duplicates, drops whitelisted words, applies
//! context-aware suppression for short patterns that only occur inside known
//! benign words (the Scunthorpe problem), and runs the optional replacement
//! pass.

use crate::normalizer::tables::is_word_char;
use crate::pattern::{Match, WhitelistEntry};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Longer words whose substrings are never treated as profanity on their own.
///
/// Consulted only in context-aware mode: a match survives unless every
/// occurrence of its word in the original text is confined to one of these.
static SAFE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // "ass"
        "assassin",
        "assassination",
        "assemble",
        "assembly",
        "assert",
        "assess",
        "assessment",
        "asset",
        "assign",
        "assignment",
        "assist",
        "assistant",
        "associate",
        "association",
        "assume",
        "assumption",
        "assurance",
        "assure",
        "ambassador",
        "bass",
        "brass",
        "bypass",
        "cassette",
        "class",
        "classic",
        "classroom",
        "compass",
        "embarrass",
        "embassy",
        "glass",
        "grass",
        "harass",
        "harassment",
        "mass",
        "massachusetts",
        "massage",
        "massive",
        "pass",
        "passage",
        "passenger",
        "passion",
        "passive",
        "password",
        "potassium",
        // "hell"
        "hello",
        "shell",
        "shellfish",
        "hellenic",
        // "tit"
        "title",
        "titan",
        "titanium",
        "competitive",
        "constitution",
        "institute",
        // "cum"
        "accumulate",
        "circumstance",
        "cucumber",
        "curriculum",
        "document",
        "documentation",
        // "anal"
        "analog",
        "analogy",
        "analysis",
        "analyst",
        "analyze",
        "banal",
        "canal",
        // "rape"
        "drape",
        "grape",
        "grapefruit",
        "scrape",
        "therapist",
        "therapeutic",
        // "cock"
        "cockpit",
        "cocktail",
        "hancock",
        "peacock",
        // "sex"
        "essex",
        "sussex",
        // "crap"
        "scrap",
        "scrapbook",
        // "hoe"
        "shoe",
        "phoenix",
    ]
    .into_iter()
    .collect()
});

/// Whether a word is in the curated safe-word set.
pub fn is_safe_word(word: &str) -> bool {
    SAFE_WORDS.contains(word)
}

/// Merges and filters the match sets produced by the detection paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchReconciler {
    pub context_aware: bool,
}

impl MatchReconciler {
    pub fn new(context_aware: bool) -> Self {
        Self { context_aware }
    }

    /// Merge `extra` into `base`, skipping any match whose word is already
    /// present. The dedup key is the case-insensitive word, not the position.
    pub fn merge(base: &mut Vec<Match>, extra: Vec<Match>) {
        let mut seen: HashSet<String> = base.iter().map(|m| m.word.to_lowercase()).collect();
        for m in extra {
            if seen.insert(m.word.to_lowercase()) {
                base.push(m);
            }
        }
    }

    /// Apply whitelist and context suppression, then order by position.
    pub fn reconcile(
        &self,
        mut matches: Vec<Match>,
        whitelist: &[WhitelistEntry],
        original_text: &str,
    ) -> Vec<Match> {
        matches.retain(|m| !whitelist.iter().any(|entry| entry.suppresses(&m.word)));
        if self.context_aware {
            matches.retain(|m| !self.suppressed_by_context(&m.word, original_text));
        }
        matches.sort_by_key(|m| (m.position, m.length));
        matches
    }

    /// Context-aware suppression for one match word.
    ///
    /// Suppressed when the word never appears as a standalone token in the
    /// original text and every substring occurrence of it sits inside a
    /// safe-word token. A word with no verbatim occurrence at all (a fuzzy or
    /// heavily-normalized hit) is never suppressed here; there is no context
    /// to judge it by.
    fn suppressed_by_context(&self, word: &str, original_text: &str) -> bool {
        let text: Vec<char> = original_text.to_lowercase().chars().collect();
        let word: Vec<char> = word.to_lowercase().chars().collect();
        if word.is_empty() || text.len() < word.len() {
            return false;
        }

        let mut found_any = false;
        for start in 0..=text.len() - word.len() {
            if text[start..start + word.len()] != word[..] {
                continue;
            }
            found_any = true;

            let token = enclosing_token(&text, start, start + word.len());
            if token == word {
                // Standalone occurrence: never suppressed.
                return false;
            }
            let token: String = token.iter().collect();
            if !is_safe_word(&token) {
                return false;
            }
        }
        found_any
    }

    /// Replacement pass: substitute each surviving span with `replacement`
    /// repeated to the match length, processing back to front so earlier
    /// offsets stay valid.
    ///
    /// Exact (non-fuzzy) spans are verified to still carry the matched word;
    /// an offset that could not be re-anchored to the original text points at
    /// some other text and is left untouched rather than blanking the wrong
    /// span. Fuzzy spans are exempt: they anchor to the obfuscated token,
    /// which rarely spells the word verbatim.
    pub fn replace_spans(text: &str, matches: &[Match], replacement: char) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        let mut ordered: Vec<&Match> = matches.iter().collect();
        ordered.sort_by(|a, b| b.position.cmp(&a.position));

        for m in ordered {
            if m.length == 0 || m.position + m.length > chars.len() {
                continue;
            }
            if m.confidence.is_none() {
                let span: String = chars[m.position..m.position + m.length].iter().collect();
                if span.to_lowercase() != m.word.to_lowercase() {
                    continue;
                }
            }
            for c in chars[m.position..m.position + m.length].iter_mut() {
                *c = replacement;
            }
        }
        chars.into_iter().collect()
    }
}

/// The maximal word-character run containing `start..end`.
fn enclosing_token(text: &[char], start: usize, end: usize) -> &[char] {
    let mut lo = start;
    while lo > 0 && is_word_char(text[lo - 1]) {
        lo -= 1;
    }
    let mut hi = end;
    while hi < text.len() && is_word_char(text[hi]) {
        hi += 1;
    }
    &text[lo..hi]
}
