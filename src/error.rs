//! Error types
//!
//! The clustering core has a single failure category, [`ClusterError::InvalidInput`].
//! Everything that touches files or JSON wraps it in [`DatasetError`] or
//! [`ConfigError`].

use thiserror::Error;

/// Errors raised by the clustering engine and dataset validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Malformed or inconsistent dataset shape, or invalid parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClusterError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors raised while reading or writing JSON-lines data
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded as an array of numbers (1-based line number)
    #[error("line {line}: malformed vector: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A line is not valid UTF-8 (1-based line number)
    #[error("line {line}: not valid UTF-8: {source}")]
    Encoding {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line decoded to a vector whose length differs from the first vector
    #[error("line {line}: expected {expected} components, found {found}")]
    Dimension {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ClusterError),
}

/// Errors raised while loading a clustering configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = ClusterError::invalid("k must be at least 1");
        assert_eq!(err.to_string(), "invalid input: k must be at least 1");
    }

    #[test]
    fn test_dataset_error_wraps_cluster_error() {
        let err: DatasetError = ClusterError::invalid("dataset is empty").into();
        assert!(matches!(err, DatasetError::Invalid(ClusterError::InvalidInput(_))));
        assert_eq!(err.to_string(), "invalid input: dataset is empty");
    }

    #[test]
    fn test_dimension_error_names_line() {
        let err = DatasetError::Dimension {
            line: 7,
            expected: 2,
            found: 3,
        };
        assert_eq!(err.to_string(), "line 7: expected 2 components, found 3");
    }
}
