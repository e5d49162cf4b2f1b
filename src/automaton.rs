//! Aho-Corasick pattern automaton.
//!
//! The automaton is build-once: patterns are inserted, failure links are
//! computed with [`PatternAutomaton::build_failure_links`], and only then may
//! [`PatternAutomaton::search`] run. Inserting after the build invalidates the
//! failure links and search returns [`FilterError::AutomatonNotBuilt`] until
//! they are rebuilt. Pattern-set changes always rebuild the whole automaton;
//! failure links are derived from the entire pattern set and cannot be patched
//! incrementally.
//!
//! Trie nodes live in a flat arena addressed by `u32` index, which bounds
//! allocation overhead as pattern sets grow into the thousands.
//!
//! Search is a single pass over the text, one state transition per character,
//! giving O(text length + total pattern length + reported matches) overall.

use crate::error::{FilterError, Result};
use crate::normalizer::tables::is_word_char;
use crate::pattern::Pattern;
use std::collections::{HashMap, VecDeque};

type NodeId = u32;

const ROOT: NodeId = 0;

/// One arena-allocated trie node.
///
/// Children, the failure link, and the output link are arena indices, never
/// owning pointers; the failure and output links are only meaningful after
/// `build_failure_links`.
#[derive(Debug, Clone)]
struct TrieNode {
    children: HashMap<char, NodeId>,
    fail: NodeId,
    /// Dictionary-suffix link: the nearest terminal node on the failure
    /// chain, or `ROOT` when there is none. Search follows these instead of
    /// raw failure links so per-character work stays proportional to the
    /// matches actually reported.
    output: NodeId,
    /// Indices into the automaton's pattern table of every pattern whose
    /// normalized form ends at this node.
    terminals: Vec<u32>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            fail: ROOT,
            output: ROOT,
            terminals: Vec::new(),
        }
    }
}

/// A raw automaton hit, positioned in the text that was searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonMatch {
    /// Index into [`PatternAutomaton::patterns`].
    pub pattern: u32,
    /// Char offset of the match start in the searched text.
    pub position: usize,
    /// Match length in chars of the searched text.
    pub length: usize,
}

/// Multi-pattern matcher over normalized text.
#[derive(Debug, Clone)]
pub struct PatternAutomaton {
    nodes: Vec<TrieNode>,
    patterns: Vec<Pattern>,
    /// Normalized form each pattern was inserted under.
    normalized_words: Vec<String>,
    built: bool,
}

impl Default for PatternAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAutomaton {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            patterns: Vec::new(),
            normalized_words: Vec::new(),
            built: false,
        }
    }

    /// Number of patterns inserted.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of arena nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether failure links are current.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// The pattern record behind a match.
    pub fn pattern(&self, index: u32) -> &Pattern {
        &self.patterns[index as usize]
    }

    /// Insert a pattern under its normalized form.
    ///
    /// `normalized_word` is the canonicalized text the automaton will actually
    /// match on; the original pattern record is kept for reporting.
    /// Invalidates any previously built failure links.
    pub fn insert(&mut self, pattern: Pattern, normalized_word: &str) {
        if normalized_word.is_empty() {
            return;
        }
        let mut node = ROOT;
        for c in normalized_word.chars() {
            node = match self.nodes[node as usize].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::new());
                    self.nodes[node as usize].children.insert(c, child);
                    child
                }
            };
        }
        let index = self.patterns.len() as u32;
        // Patterns that normalize identically share a terminal node and are
        // all reported on a hit.
        self.nodes[node as usize].terminals.push(index);
        self.patterns.push(pattern);
        self.normalized_words.push(normalized_word.to_string());
        self.built = false;
    }

    /// Compute failure and output links breadth-first from depth 1.
    ///
    /// For each child edge, the failure link points at the deepest proper
    /// suffix of the path that is itself a trie path, found by following the
    /// parent's failure chain. The output link then short-circuits the failure
    /// chain to the nearest terminal node, so search never walks failure links
    /// that cannot report anything. Idempotent; must be re-run after any
    /// insert before the automaton is searchable again.
    pub fn build_failure_links(&mut self) {
        let mut queue = VecDeque::new();

        let root_children: Vec<NodeId> = self.nodes[ROOT as usize].children.values().copied().collect();
        for child in root_children {
            self.nodes[child as usize].fail = ROOT;
            self.nodes[child as usize].output = ROOT;
            queue.push_back(child);
        }

        while let Some(node) = queue.pop_front() {
            let edges: Vec<(char, NodeId)> = self.nodes[node as usize]
                .children
                .iter()
                .map(|(&c, &child)| (c, child))
                .collect();

            for (c, child) in edges {
                let mut fail = self.nodes[node as usize].fail;
                loop {
                    if let Some(&next) = self.nodes[fail as usize].children.get(&c) {
                        if next != child {
                            self.nodes[child as usize].fail = next;
                            break;
                        }
                    }
                    if fail == ROOT {
                        self.nodes[child as usize].fail = ROOT;
                        break;
                    }
                    fail = self.nodes[fail as usize].fail;
                }

                // BFS order guarantees the (shallower) failure target already
                // has its output link in place.
                let fail = self.nodes[child as usize].fail;
                let output = if self.nodes[fail as usize].terminals.is_empty() {
                    self.nodes[fail as usize].output
                } else {
                    fail
                };
                self.nodes[child as usize].output = output;
                queue.push_back(child);
            }
        }

        self.built = true;
    }

    /// Search `text` for every occurrence of every pattern.
    ///
    /// `text` should already be normalized the same way the inserted pattern
    /// words were; reported offsets index into `text` as chars.
    ///
    /// Unless `partial` is set, a candidate is discarded when either end sits
    /// inside a word (both neighbors must be non-word characters), which keeps
    /// "ass" from matching inside "class".
    pub fn search(&self, text: &str, partial: bool) -> Result<Vec<AutomatonMatch>> {
        if !self.built {
            return Err(FilterError::AutomatonNotBuilt);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut matches = Vec::new();
        let mut state = ROOT;

        for (i, &c) in chars.iter().enumerate() {
            while state != ROOT && !self.nodes[state as usize].children.contains_key(&c) {
                state = self.nodes[state as usize].fail;
            }
            state = self.nodes[state as usize]
                .children
                .get(&c)
                .copied()
                .unwrap_or(ROOT);

            // Walk the output-link chain: shorter patterns nested inside a
            // longer one terminate on suffix states and must also be
            // reported. Output links skip the non-terminal failure states, so
            // this loop runs once per reported candidate.
            let mut node = if self.nodes[state as usize].terminals.is_empty() {
                self.nodes[state as usize].output
            } else {
                state
            };
            while node != ROOT {
                for &pattern in &self.nodes[node as usize].terminals {
                    let length = self.normalized_words[pattern as usize].chars().count();
                    let start = i + 1 - length;
                    if partial || self.at_word_boundary(&chars, start, i + 1) {
                        matches.push(AutomatonMatch {
                            pattern,
                            position: start,
                            length,
                        });
                    }
                }
                node = self.nodes[node as usize].output;
            }
        }

        Ok(matches)
    }

    fn at_word_boundary(&self, chars: &[char], start: usize, end: usize) -> bool {
        let before_ok = start == 0 || !is_word_char(chars[start - 1]);
        let after_ok = end == chars.len() || !is_word_char(chars[end]);
        before_ok && after_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(word: &str) -> Pattern {
        Pattern::new(word, 2, "profanity", "en")
    }

    fn automaton(words: &[&str]) -> PatternAutomaton {
        let mut automaton = PatternAutomaton::new();
        for word in words {
            automaton.insert(pattern(word), word);
        }
        automaton.build_failure_links();
        automaton
    }

    fn positions(matches: &[AutomatonMatch]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.position, m.length)).collect()
    }

    #[test]
    fn test_search_before_build_is_an_error() {
        let mut automaton = PatternAutomaton::new();
        automaton.insert(pattern("damn"), "damn");
        assert_eq!(
            automaton.search("damn", false).unwrap_err(),
            FilterError::AutomatonNotBuilt
        );
    }

    #[test]
    fn test_insert_after_build_invalidates() {
        let mut automaton = automaton(&["damn"]);
        assert!(automaton.is_built());
        automaton.insert(pattern("hell"), "hell");
        assert!(!automaton.is_built());
        assert!(automaton.search("hell", false).is_err());

        automaton.build_failure_links();
        assert_eq!(automaton.search("hell", false).unwrap().len(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut automaton = automaton(&["ass", "assassin"]);
        automaton.build_failure_links();
        let matches = automaton.search("assassin", true).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_single_pattern_offset_and_length() {
        let automaton = automaton(&["damn"]);
        let matches = automaton.search("a damn shame", false).unwrap();
        assert_eq!(positions(&matches), vec![(2, 4)]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let automaton = automaton(&["damn"]);
        let matches = automaton.search("perfectly clean", false).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_overlapping_patterns_all_reported() {
        // "ass" terminates on the failure chain of "assassin" states, so
        // partial search over "assassin" reports both at their offsets.
        let automaton = automaton(&["ass", "assassin"]);
        let mut found = positions(&automaton.search("assassin", true).unwrap());
        found.sort_unstable();
        // "ass" at 0, "ass" again at 3, "assassin" at 0
        assert_eq!(found, vec![(0, 3), (0, 8), (3, 3)]);
    }

    #[test]
    fn test_nested_suffix_patterns_reported_through_output_links() {
        // Each suffix terminates at a different depth and is reached through
        // the output-link chain from the final state.
        let automaton = automaton(&["b", "ab", "aab"]);
        let mut found = positions(&automaton.search("aaab", true).unwrap());
        found.sort_unstable();
        assert_eq!(found, vec![(1, 3), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_long_run_without_matches_reports_nothing() {
        // The state parks at full prefix depth for the whole run; no
        // terminal is ever on its output chain.
        let automaton = automaton(&["aaaab"]);
        assert!(automaton.search(&"a".repeat(64), true).unwrap().is_empty());
    }

    #[test]
    fn test_identically_normalized_patterns_all_reported() {
        let mut automaton = PatternAutomaton::new();
        automaton.insert(pattern("shit"), "shit");
        automaton.insert(pattern("sh1t"), "shit");
        automaton.build_failure_links();

        let matches = automaton.search("shit", false).unwrap();
        assert_eq!(matches.len(), 2);
        let mut words: Vec<&str> = matches
            .iter()
            .map(|m| automaton.pattern(m.pattern).word.as_str())
            .collect();
        words.sort_unstable();
        assert_eq!(words, vec!["sh1t", "shit"]);
    }

    #[test]
    fn test_boundary_filtering() {
        let automaton = automaton(&["ass"]);
        assert!(automaton.search("assessment", false).unwrap().is_empty());

        let partial = automaton.search("assessment", true).unwrap();
        assert_eq!(positions(&partial), vec![(0, 3)]);

        let standalone = automaton.search("kiss my ass", false).unwrap();
        assert_eq!(positions(&standalone), vec![(8, 3)]);
    }

    #[test]
    fn test_boundary_with_punctuation() {
        let automaton = automaton(&["damn"]);
        let matches = automaton.search("(damn)", false).unwrap();
        assert_eq!(positions(&matches), vec![(1, 4)]);
    }

    #[test]
    fn test_non_latin_word_chars_bound_words() {
        let automaton = automaton(&["ass"]);
        // Cyrillic letters count as word characters, so this is not standalone
        assert!(automaton.search("жassж", false).unwrap().is_empty());
        assert_eq!(automaton.search("жassж", true).unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_occurrences() {
        let automaton = automaton(&["damn"]);
        let matches = automaton.search("damn it, damn it", false).unwrap();
        assert_eq!(positions(&matches), vec![(0, 4), (9, 4)]);
    }

    #[test]
    fn test_shared_prefix_patterns() {
        let automaton = automaton(&["she", "shell", "hell"]);
        let mut found = positions(&automaton.search("shell", true).unwrap());
        found.sort_unstable();
        assert_eq!(found, vec![(0, 3), (0, 5), (1, 4)]);
    }

    #[test]
    fn test_arena_shares_prefixes() {
        let mut automaton = PatternAutomaton::new();
        automaton.insert(pattern("abc"), "abc");
        automaton.insert(pattern("abd"), "abd");
        // root + a + b + c + d
        assert_eq!(automaton.node_count(), 5);
    }

    #[test]
    fn test_empty_normalized_word_skipped() {
        let mut automaton = PatternAutomaton::new();
        automaton.insert(pattern("***"), "");
        automaton.build_failure_links();
        assert_eq!(automaton.pattern_count(), 0);
        assert!(automaton.search("anything", false).unwrap().is_empty());
    }

    #[test]
    fn test_unicode_pattern_offsets_are_char_based() {
        let automaton = automaton(&["сука"]);
        let matches = automaton.search("ну сука да", false).unwrap();
        assert_eq!(positions(&matches), vec![(3, 4)]);
    }
}
