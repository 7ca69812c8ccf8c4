//! Error taxonomy for scoring and aggregation.
//!
//! Every variant carries the offending field and value so callers can fix
//! their input without re-running anything.

/// Errors raised by the scoring core. None of them are transient.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Malformed review data (negative votes, bad rating, ...).
    #[error("invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration rejected before any computation started.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    /// A time bucket held no reviews and the policy says to abort.
    #[error("time bucket {bucket} is empty (ages in {range})")]
    EmptyBucket { bucket: usize, range: String },
}

impl ScoringError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
