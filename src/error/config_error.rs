//! Errors raised while building a schema.

use thiserror::Error;

/// A rule was configured with parameters it can never satisfy.
///
/// Returned by the fallible builder methods (`min`, `max`, `length`,
/// `pattern`, `multiple`), so a broken schema never reaches validation.
///
/// ```rust
/// use conform::{ConfigError, Schema};
///
/// let err = Schema::string().max(2).and_then(|s| s.min(5)).unwrap_err();
/// assert!(matches!(err, ConfigError::InvertedBounds { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A lower bound exceeds the upper bound already (or subsequently) set.
    #[error("{kind}.{rule}: min limit {min} is greater than max limit {max}")]
    InvertedBounds {
        kind: &'static str,
        rule: &'static str,
        min: String,
        max: String,
    },

    /// `length` falls outside an attached `min`/`max`.
    #[error("{kind}.{rule}: length {length} conflicts with {bound} limit {limit}")]
    ConflictingLength {
        kind: &'static str,
        rule: &'static str,
        length: usize,
        bound: &'static str,
        limit: usize,
    },

    /// Exclusive bounds (`greater`/`less`) leave no value that can pass.
    #[error("{kind}.{rule}: no value satisfies both {lower} and {upper}")]
    EmptyRange {
        kind: &'static str,
        rule: &'static str,
        lower: String,
        upper: String,
    },

    /// A numeric limit was NaN or infinite.
    #[error("{kind}.{rule}: limit must be a finite number, got {limit}")]
    NonFiniteLimit {
        kind: &'static str,
        rule: &'static str,
        limit: f64,
    },

    /// `multiple` needs a strictly positive base.
    #[error("number.multiple: base must be greater than 0, got {0}")]
    NonPositiveMultiple(f64),

    /// The regular expression passed to `pattern` did not compile.
    #[error("string.pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_bounds_message() {
        let err = ConfigError::InvertedBounds {
            kind: "string",
            rule: "min",
            min: "5".to_string(),
            max: "2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "string.min: min limit 5 is greater than max limit 2"
        );
    }

    #[test]
    fn test_conflicting_length_message() {
        let err = ConfigError::ConflictingLength {
            kind: "string",
            rule: "length",
            length: 3,
            bound: "min",
            limit: 5,
        };
        assert_eq!(
            err.to_string(),
            "string.length: length 3 conflicts with min limit 5"
        );
    }

    #[test]
    fn test_empty_range_message() {
        let err = ConfigError::EmptyRange {
            kind: "number",
            rule: "less",
            lower: "> 10".to_string(),
            upper: "< 5".to_string(),
        };
        assert_eq!(err.to_string(), "number.less: no value satisfies both > 10 and < 5");
    }

    #[test]
    fn test_pattern_error_converts() {
        let regex_err = regex::Regex::new("[unclosed").unwrap_err();
        let err: ConfigError = regex_err.into();
        assert!(matches!(err, ConfigError::Pattern(_)));
        assert!(err.to_string().starts_with("string.pattern:"));
    }
}
