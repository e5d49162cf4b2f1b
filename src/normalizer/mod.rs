//! Evasion-resistant text canonicalization.
//!
//! The pipeline is a fixed sequence of independently toggleable stages. The
//! order is load-bearing: invisible characters are stripped before anything
//! length-dependent, glyphs are folded before repeated-character collapsing,
//! and case folding runs last. Reordering stages silently changes which
//! evasions are caught.
//!
//! Stages, in order:
//!
//! 1. strip invisible / zero-width / control characters
//! 2. strip bidirectional marks and elongation characters
//! 3. fold script-specific letter variants to one canonical letterform
//! 4. strip diacritics and combining marks
//! 5. fold confusable glyphs (fullwidth, circled, homoglyphs) to ASCII
//! 6. cross-script phonetic folding, mixed-script input only
//! 7. collapse leet / decorative symbols to a letter or to nothing
//! 8. collapse or strip runs of separator characters
//! 9. collapse runs of 3+ identical characters down to exactly 2
//! 10. lowercase, collapse and trim whitespace

pub mod tables;

use self::tables::{
    fold_confusable, is_bidi_or_elongation, is_combining_mark, is_decorative, is_invisible,
    is_non_latin_letter, is_separator, DIACRITIC_FOLDS, LEET_FOLDS, PHONETIC_FOLDS,
    SCRIPT_VARIANTS,
};

/// Per-stage toggles for the canonicalization pipeline.
///
/// Toggles enable or disable stages; they never reorder them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub strip_invisible: bool,
    pub strip_bidi: bool,
    pub fold_script_variants: bool,
    pub strip_diacritics: bool,
    pub fold_confusables: bool,
    pub fold_phonetic: bool,
    pub fold_symbols: bool,
    /// Collapse separator runs to a single space.
    pub collapse_separators: bool,
    /// Remove separators outright instead of collapsing them. Used by the
    /// fuzzy path to defeat space-insertion evasions; overrides
    /// `collapse_separators` when set.
    pub strip_separators: bool,
    pub collapse_repeats: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            strip_invisible: true,
            strip_bidi: true,
            fold_script_variants: true,
            strip_diacritics: true,
            fold_confusables: true,
            fold_phonetic: true,
            fold_symbols: true,
            collapse_separators: true,
            strip_separators: false,
            collapse_repeats: true,
        }
    }
}

impl NormalizerOptions {
    /// Options for the fuzzy matcher's evasion normalization (stages 3-10),
    /// one toggle per detection technique.
    pub fn evasion(
        fold_symbols: bool,
        strip_separators: bool,
        collapse_repeats: bool,
        fold_phonetic: bool,
    ) -> Self {
        Self {
            fold_symbols,
            strip_separators,
            collapse_repeats,
            fold_phonetic,
            ..Self::default()
        }
    }
}

/// Deterministic, stateless canonicalization pipeline.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Run the configured pipeline over `text`.
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_with(text, &self.options)
    }

    /// Run the pipeline with explicit per-call options.
    pub fn normalize_with(&self, text: &str, options: &NormalizerOptions) -> String {
        let mut chars: Vec<char> = text.chars().collect();

        if options.strip_invisible {
            chars.retain(|&c| !is_invisible(c));
        }
        if options.strip_bidi {
            chars.retain(|&c| !is_bidi_or_elongation(c));
        }
        if options.fold_script_variants {
            for c in chars.iter_mut() {
                if let Some(&folded) = SCRIPT_VARIANTS.get(c) {
                    *c = folded;
                }
            }
        }
        if options.strip_diacritics {
            chars.retain(|&c| !is_combining_mark(c));
            for c in chars.iter_mut() {
                if let Some(&folded) = DIACRITIC_FOLDS.get(c) {
                    *c = folded;
                }
            }
        }
        if options.fold_confusables {
            for c in chars.iter_mut() {
                if let Some(folded) = fold_confusable(*c) {
                    *c = folded;
                }
            }
        }
        if options.fold_phonetic && is_mixed_script_chars(&chars) {
            for c in chars.iter_mut() {
                if let Some(&folded) = PHONETIC_FOLDS.get(c) {
                    *c = folded;
                }
            }
        }
        if options.fold_symbols {
            chars = fold_symbols(&chars);
        }
        if options.strip_separators {
            chars.retain(|&c| !is_separator(c));
        } else if options.collapse_separators {
            chars = collapse_separator_runs(&chars);
        }
        if options.collapse_repeats {
            chars = collapse_repeats(&chars, 2);
        }

        finish_case_and_whitespace(&chars)
    }

    /// Lossy maximum-recall variant: every character that is not a letter or
    /// digit is stripped and all repeated-character runs collapse to a single
    /// instance. For scanning only, never for display.
    pub fn normalize_aggressive(&self, text: &str) -> String {
        let folds = NormalizerOptions {
            collapse_separators: false,
            strip_separators: false,
            collapse_repeats: false,
            ..NormalizerOptions::default()
        };
        let folded = self.normalize_with(text, &folds);
        let kept: Vec<char> = folded.chars().filter(|c| c.is_alphanumeric()).collect();
        collapse_repeats(&kept, 1).into_iter().collect()
    }
}

/// Whether the text mixes Latin and non-Latin letters.
///
/// Phonetic folding is gated on this so pure non-Latin text never has
/// unrelated words folded into false matches.
pub fn is_mixed_script(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    is_mixed_script_chars(&chars)
}

fn is_mixed_script_chars(chars: &[char]) -> bool {
    let has_latin = chars.iter().any(|c| c.is_ascii_alphabetic());
    let has_non_latin = chars.iter().any(|&c| is_non_latin_letter(c));
    has_latin && has_non_latin
}

/// Stage 7: position-aware leet folding.
///
/// A substitution symbol only folds when it sits next to a letter or another
/// substitution symbol, so digits in ordinary numbers ("room 101") and
/// sentence punctuation survive. `!`, `(` and `<` need letters on both sides
/// so exclamation marks and ordinary brackets survive.
fn fold_symbols(chars: &[char]) -> Vec<char> {
    // A non-digit substitution symbol counts as a fold-neighbor so that runs
    // like "a$$" fold completely.
    fn leetish(c: char) -> bool {
        !c.is_ascii_digit() && (is_decorative(c) || LEET_FOLDS.contains_key(&c))
    }
    fn neighbor(c: char) -> bool {
        c.is_alphabetic() || leetish(c)
    }

    let mut out = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev = i > 0 && neighbor(chars[i - 1]);
        let next = i + 1 < chars.len() && neighbor(chars[i + 1]);

        if is_decorative(c) {
            if prev || next {
                continue; // collapse to nothing
            }
            out.push(c);
            continue;
        }

        match LEET_FOLDS.get(&c) {
            Some(&folded) if matches!(c, '!' | '(' | '<') => {
                let prev_letter = i > 0 && chars[i - 1].is_alphabetic();
                let next_letter = i + 1 < chars.len() && chars[i + 1].is_alphabetic();
                if prev_letter && next_letter {
                    out.push(folded);
                } else {
                    out.push(c);
                }
            }
            Some(&folded) if prev || next => out.push(folded),
            _ => out.push(c),
        }
    }
    out
}

/// Stage 8: collapse each run of separator characters to one space.
fn collapse_separator_runs(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut in_run = false;
    for &c in chars {
        if is_separator(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Collapse runs of identical characters longer than `keep` down to `keep`.
fn collapse_repeats(chars: &[char], keep: usize) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut run_char = None;
    let mut run_len = 0usize;
    for &c in chars {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            run_char = Some(c);
            run_len = 1;
        }
        if run_len <= keep {
            out.push(c);
        }
    }
    out
}

/// Stage 10: lowercase, collapse whitespace runs, trim.
fn finish_case_and_whitespace(chars: &[char]) -> String {
    let lowered: String = chars.iter().flat_map(|c| c.to_lowercase()).collect();
    let mut out = String::with_capacity(lowered.len());
    let mut in_ws = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_ws && !out.is_empty() {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
