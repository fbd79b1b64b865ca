//! Directory-layer error types.
//!
//! The retry loop in [`crate::client`] keys off [`DirectoryError::is_transient`]:
//! only transient unavailability is retried, everything else propagates to the
//! caller on the first occurrence.

use thiserror::Error;

/// Errors raised by the directory access layer.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Invalid configuration.
    #[error("directory configuration error: {0}")]
    Configuration(String),

    /// The service identity's bind credentials were rejected.
    ///
    /// Never retried: repeating a bad bind cannot succeed and risks
    /// lockout of the service identity.
    #[error("invalid bind credentials for service identity")]
    InvalidCredentials,

    /// The directory was transiently unreachable or unavailable.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The directory stayed unavailable through every retry attempt.
    #[error("directory unavailable after {attempts} attempts")]
    ServiceUnavailable {
        /// Number of search attempts made before giving up.
        attempts: u32,
    },

    /// Bind failed for a reason other than bad credentials or unavailability.
    #[error("directory bind failed: {0}")]
    Bind(String),

    /// Search operation failed.
    #[error("directory search failed: {0}")]
    Search(String),
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a transient unavailability error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates a bind error.
    #[must_use]
    pub fn bind(msg: impl Into<String>) -> Self {
        Self::Bind(msg.into())
    }

    /// Creates a search error.
    #[must_use]
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Checks whether this failure class is worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Checks whether retries were exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
