//! Error types for generation-parameter parsing

use thiserror::Error;

/// Failures that stop a metadata blob from being parsed.
///
/// Most malformed input is tolerated (short parameter lines become prompt
/// text, unmatched fragments are dropped). Only these two cases are hard
/// failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A legacy AddNet module slot has no matching model key
    #[error("missing key `{key}` in generation parameters")]
    MissingKey { key: String },

    /// A weight that must be numeric could not be parsed
    #[error("invalid number for {field}: `{value}`")]
    InvalidNumber { field: String, value: String },
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a weight string, mapping failure to [`ParseError::InvalidNumber`].
pub(crate) fn parse_weight(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("lora", "0.8"), Ok(0.8));
        assert_eq!(parse_weight("lora", "1"), Ok(1.0));
        assert_eq!(parse_weight("lora", " 2.5 "), Ok(2.5));
    }

    #[test]
    fn test_parse_weight_invalid() {
        let err = parse_weight("AddNet Weight A 1", "0.8.1").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "AddNet Weight A 1".to_string(),
                value: "0.8.1".to_string(),
            }
        );
        assert_eq!(err.to_string(), "invalid number for AddNet Weight A 1: `0.8.1`");
    }

    #[test]
    fn test_missing_key_message() {
        let err = ParseError::MissingKey { key: "AddNet Model 1".to_string() };
        assert_eq!(err.to_string(), "missing key `AddNet Model 1` in generation parameters");
    }
}
