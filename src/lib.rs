//! # lexguard
//!
//! An evasion-resistant profanity detection engine: a hand-built Aho-Corasick
//! automaton over canonicalized text, backed by an edit-distance fuzzy matcher
//! and reconciled through whitelist and context-aware suppression.
//!
//! The engine is a deterministic string-matching core. It does not attempt
//! semantic understanding of text; it matches character sequences, after
//! defeating the usual obfuscation tricks (zero-width characters, homoglyphs,
//! leet substitutions, inserted separators, stretched spellings).
//!
//! ## Quick Start
//!
//! ```rust
//! use lexguard::{ContentFilter, FilterConfig, Pattern};
//!
//! let patterns = vec![
//!     Pattern::new("damn", 1, "profanity", "en"),
//!     Pattern::new("fuck", 3, "profanity", "en"),
//! ];
//! let filter = ContentFilter::with_patterns(FilterConfig::default(), patterns)?;
//!
//! let result = filter.detect("what a d@mn day")?;
//! assert!(result.has_match);
//!
//! let cleaned = filter.clean("well, damn")?;
//! assert_eq!(cleaned, "well, ****");
//! # Ok::<(), lexguard::FilterError>(())
//! ```
//!
//! ## Strictness
//!
//! ```rust
//! use lexguard::{ContentFilter, FilterConfig, Pattern, Strictness};
//!
//! // Maximum-recall scanning for moderation queues
//! let config = FilterConfig {
//!     strictness: Strictness::MaximumRecall,
//!     ..FilterConfig::default()
//! };
//! let filter = ContentFilter::with_patterns(
//!     config,
//!     vec![Pattern::new("fuck", 3, "profanity", "en")],
//! )?;
//! assert!(filter.has_match("f u c k")?);
//! assert!(filter.has_match("fuuuuck")?);
//! # Ok::<(), lexguard::FilterError>(())
//! ```
//!
//! ## Lifecycle
//!
//! The automaton is build-once: every pattern-set or configuration change
//! rebuilds it from scratch, never patches it in place. A built filter is safe
//! to share for concurrent reads; mutation requires exclusive access.

pub mod automaton;
pub mod config;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod normalizer;
pub mod pattern;
pub mod reconciler;

// Primary engine interface
pub use filter::ContentFilter;

// Configuration
pub use config::{FilterConfig, Strictness};

// Core types and errors
pub use error::{FilterError, Result};
pub use pattern::{
    DetectionResult, EvasionTechnique, Match, Pattern, WhitelistEntry, MAX_SEVERITY, MIN_SEVERITY,
    SUPPORTED_LANGUAGES,
};

// Matching components (for advanced use cases)
pub use automaton::{AutomatonMatch, PatternAutomaton};
pub use fuzzy::{detect_evasion_techniques, levenshtein, FuzzyMatcher, FuzzyOutcome};
pub use normalizer::{is_mixed_script, Normalizer, NormalizerOptions};
pub use reconciler::MatchReconciler;
