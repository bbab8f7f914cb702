use thiserror::Error;

/// Result type alias for normalization and chart building.
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Contract violations surfaced while normalizing series data.
///
/// These are caller bugs, not runtime conditions to retry: normalization
/// either fully succeeds or fails with a single error naming the offending
/// row and field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("row {row} is missing required field '{key}'")]
    MissingField { row: usize, key: String },

    #[error("pivoted input requires '{key}' in the field mapping")]
    MissingMapping { key: &'static str },
}

impl NormalizeError {
    pub(crate) fn missing_field(row: usize, key: &str) -> Self {
        NormalizeError::MissingField {
            row,
            key: key.to_string(),
        }
    }
}
