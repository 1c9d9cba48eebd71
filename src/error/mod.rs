//! Error definitions
//!
//! This module provides error types for understudy.

use thiserror::Error;

/// Main error type for understudy
#[derive(Error, Debug)]
pub enum Error {
    /// A completion signal was rejected by the code under test
    #[error("Completion rejected: {0}")]
    Rejected(String),

    /// Every completion handle was dropped before the signal fired
    #[error("Completion abandoned: all handles dropped before firing")]
    Abandoned,

    /// Waiting on a completion signal exceeded its deadline
    #[error("Timed out after {0:?} waiting for completion")]
    Timeout(std::time::Duration),
}

impl Error {
    /// Create a rejection error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Whether this error is a rejection carrying the given reason.
    #[must_use]
    pub fn is_rejection_with(&self, reason: &str) -> bool {
        matches!(self, Self::Rejected(r) if r == reason)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_display() {
        let err = Error::rejected("wrong payload");
        assert_eq!(err.to_string(), "Completion rejected: wrong payload");

        let err = Error::Abandoned;
        assert!(err.to_string().contains("all handles dropped"));

        let err = Error::Timeout(Duration::from_millis(250));
        assert!(err.to_string().contains("250ms"));
    }

    #[test]
    fn test_is_rejection_with() {
        let err = Error::rejected("boom");
        assert!(err.is_rejection_with("boom"));
        assert!(!err.is_rejection_with("bang"));
        assert!(!Error::Abandoned.is_rejection_with("boom"));
    }
}
