//! Error types for the catalog health engine.

use std::{error::Error, fmt};

/// Error type for catalog health operations.
///
/// Every variant is recoverable: callers are expected to fall back to a
/// neutral presentation ("version health unavailable", a zero average, the
/// built-in spec table) rather than abort.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogHealthError {
    /// A version string was not three dot-separated non-negative integers.
    InvalidVersionFormat {
        /// The rejected input, verbatim.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },
    /// An aggregate was requested over an empty set of values.
    EmptyDataSet {
        /// What was being aggregated.
        context: String,
    },
    /// A field specification entry failed validation.
    InvalidFieldSpec {
        /// Dotted path of the offending entry.
        path: String,
        /// Why the entry was rejected.
        reason: String,
    },
    /// A catch-all error with a message.
    Other(String),
}

impl CatalogHealthError {
    pub(crate) fn invalid_version(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_spec(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldSpec {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CatalogHealthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVersionFormat { input, reason } => {
                write!(f, "invalid version format {input:?}: {reason}")
            }
            Self::EmptyDataSet { context } => write!(f, "empty data set: {context}"),
            Self::InvalidFieldSpec { path, reason } => {
                write!(f, "invalid field spec at {path}: {reason}")
            }
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CatalogHealthError {}

impl From<serde_json::Error> for CatalogHealthError {
    fn from(value: serde_json::Error) -> Self {
        Self::Other(format!("invalid json: {value}"))
    }
}

/// Convenience result type for catalog health operations.
pub type Result<T> = std::result::Result<T, CatalogHealthError>;

#[cfg(test)]
mod tests {
    use super::CatalogHealthError;

    #[test]
    fn invalid_version_formats_message() {
        let error = CatalogHealthError::invalid_version("1.x.0", "component 2 is not a number");
        assert_eq!(
            format!("{error}"),
            "invalid version format \"1.x.0\": component 2 is not a number"
        );
    }

    #[test]
    fn empty_data_set_formats_message() {
        let error = CatalogHealthError::EmptyDataSet {
            context: "usage samples".to_string(),
        };
        assert_eq!(format!("{error}"), "empty data set: usage samples");
    }

    #[test]
    fn other_error_formats_message() {
        let error = CatalogHealthError::Other("catalog health failed".to_string());
        assert_eq!(format!("{error}"), "catalog health failed");
    }

    #[test]
    fn from_json_error_maps_to_other() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: CatalogHealthError = json_error.into();
        match error {
            CatalogHealthError::Other(message) => assert!(message.starts_with("invalid json")),
            other => panic!("expected Other variant, got {other:?}"),
        }
    }
}
