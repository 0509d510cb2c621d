//! Analytics error types

use thiserror::Error;

/// Errors produced while building or compiling an analytics query
///
/// Every variant is a deterministic consequence of the input. None of them
/// is worth retrying.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A filter or filter expression does not hold exactly one variant,
    /// or a group was built without children
    #[error("invalid construction: {0}")]
    Construction(String),

    /// Metric identifier missing from the catalog
    #[error("unsupported metric: {key}")]
    UnsupportedMetric {
        /// The rejected metric identifier
        key: String,
    },

    /// Filter kind with no compiled form
    #[error("unsupported filter kind: {0}")]
    UnsupportedFilterKind(&'static str),

    /// Filter expression nested deeper than allowed
    #[error("filter expression exceeds maximum depth of {max}")]
    DepthExceeded {
        /// Configured maximum depth
        max: usize,
    },

    /// Identifier rejected by escaped quoting
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Numeric filter value rejected by escaped quoting
    #[error("invalid numeric value: {0:?}")]
    InvalidNumber(String),

    /// Date range could not be parsed
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Request document could not be decoded
    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Create an UnsupportedMetric error
    pub fn unsupported_metric(key: impl Into<String>) -> Self {
        Self::UnsupportedMetric { key: key.into() }
    }

    /// Create a Construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
