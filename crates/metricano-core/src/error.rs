//! Shared error type across Metricano crates.

use std::time::Duration;

use thiserror::Error;

/// Stable error codes (safe to match on or export as labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration failed to parse or validate.
    InvalidConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// A publisher rejected or failed a batch.
    PublishFailed,
    /// A publisher did not finish within the configured timeout.
    PublishTimeout,
    /// The publisher or flusher was already shut down.
    Disposed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::PublishFailed => "PUBLISH_FAILED",
            ErrorCode::PublishTimeout => "PUBLISH_TIMEOUT",
            ErrorCode::Disposed => "DISPOSED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricanoError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum MetricanoError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("publish timed out after {0:?}")]
    PublishTimeout(Duration),
    #[error("disposed")]
    Disposed,
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricanoError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricanoError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            MetricanoError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            MetricanoError::Publish(_) => ErrorCode::PublishFailed,
            MetricanoError::PublishTimeout(_) => ErrorCode::PublishTimeout,
            MetricanoError::Disposed => ErrorCode::Disposed,
            MetricanoError::Internal(_) => ErrorCode::Internal,
        }
    }
}
