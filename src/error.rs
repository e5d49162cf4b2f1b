//! Error types for the lexguard crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A pattern word was empty or contained only whitespace.
    EmptyPattern,
    /// A pattern severity was outside the valid 1..=4 range.
    InvalidSeverity(u8),
    /// A pattern carried a language tag the engine does not support.
    UnsupportedLanguage(String),
    /// A configuration value failed validation at construction time.
    InvalidConfig(String),
    /// `search` was called before `build_failure_links`, or after a mutation
    /// invalidated the failure links.
    AutomatonNotBuilt,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::EmptyPattern => write!(f, "Pattern word must not be empty or blank"),
            FilterError::InvalidSeverity(severity) => {
                write!(f, "Invalid severity: {severity} (expected 1..=4)")
            }
            FilterError::UnsupportedLanguage(lang) => {
                write!(f, "Unsupported language tag: {lang}")
            }
            FilterError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            FilterError::AutomatonNotBuilt => {
                write!(f, "Automaton searched before failure links were built")
            }
        }
    }
}

impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_empty_pattern_display() {
        let error = FilterError::EmptyPattern;
        assert_eq!(error.to_string(), "Pattern word must not be empty or blank");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_severity_display() {
        let error = FilterError::InvalidSeverity(9);
        assert_eq!(error.to_string(), "Invalid severity: 9 (expected 1..=4)");
    }

    #[test]
    fn test_unsupported_language_display() {
        let error = FilterError::UnsupportedLanguage("tlh".to_string());
        assert_eq!(error.to_string(), "Unsupported language tag: tlh");
    }

    #[test]
    fn test_invalid_config_display() {
        let error = FilterError::InvalidConfig("max_edit_distance too large".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: max_edit_distance too large"
        );
    }

    #[test]
    fn test_automaton_not_built_display() {
        let error = FilterError::AutomatonNotBuilt;
        assert_eq!(
            error.to_string(),
            "Automaton searched before failure links were built"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            FilterError::InvalidSeverity(5),
            FilterError::InvalidSeverity(5)
        );
        assert_ne!(
            FilterError::InvalidSeverity(5),
            FilterError::InvalidSeverity(0)
        );
        assert_ne!(FilterError::EmptyPattern, FilterError::AutomatonNotBuilt);
    }

    #[test]
    fn test_error_clone() {
        let error = FilterError::UnsupportedLanguage("xx".to_string());
        assert_eq!(error, error.clone());
    }

    #[test]
    fn test_result_type_alias() {
        fn build() -> Result<usize> {
            Ok(3)
        }
        assert_eq!(build().unwrap(), 3);

        fn fail() -> Result<usize> {
            Err(FilterError::AutomatonNotBuilt)
        }
        assert_eq!(fail().unwrap_err(), FilterError::AutomatonNotBuilt);
    }
}
