//! Error handling for probe operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways a rendering probe can fail, from browser launch issues to invalid input.

use std::fmt;

/// Main error type for probe operations.
///
/// This enum covers all possible failure modes in the probe pipeline,
/// providing detailed context for debugging and user-friendly error messages.
#[derive(Debug, Clone)]
pub enum ProbeError {
    /// Invalid target URL or request parameters
    InvalidTarget {
        target: String,
        reason: String,
    },

    /// Failures while launching or attaching to the headless browser
    BrowserLaunch {
        message: String,
    },

    /// Navigation to the target page failed
    Navigation {
        target: String,
        message: String,
    },

    /// Screenshot capture failed after a successful navigation
    Screenshot {
        target: String,
        message: String,
    },

    /// Timeout errors when a probe takes too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl ProbeError {
    /// Create a new invalid target error.
    pub fn invalid_target<T: Into<String>, R: Into<String>>(target: T, reason: R) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a new browser launch error.
    pub fn browser_launch<M: Into<String>>(message: M) -> Self {
        Self::BrowserLaunch {
            message: message.into(),
        }
    }

    /// Create a new navigation error.
    pub fn navigation<T: Into<String>, M: Into<String>>(target: T, message: M) -> Self {
        Self::Navigation {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a new screenshot error.
    pub fn screenshot<T: Into<String>, M: Into<String>>(target: T, message: M) -> Self {
        Self::Screenshot {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's input rather than
    /// the browser or the network.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidTarget { .. })
    }

    /// Check if this error suggests the probe could succeed on a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::BrowserLaunch { .. } | Self::Navigation { .. } | Self::Timeout { .. }
        )
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget { target, reason } => {
                write!(f, "Invalid target '{}': {}", target, reason)
            }
            Self::BrowserLaunch { message } => {
                write!(f, "Browser launch failed: {}", message)
            }
            Self::Navigation { target, message } => {
                write!(f, "Navigation to '{}' failed: {}", target, message)
            }
            Self::Screenshot { target, message } => {
                write!(f, "Screenshot of '{}' failed: {}", target, message)
            }
            Self::Timeout { operation, duration } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProbeError {}

// Implement From conversions for common error types
impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn display_includes_context() {
        let err = ProbeError::navigation("https://example.com", "net::ERR_NAME_NOT_RESOLVED");
        let text = err.to_string();
        assert!(text.contains("https://example.com"));
        assert!(text.contains("ERR_NAME_NOT_RESOLVED"));

        let err = ProbeError::timeout("page screenshot", Duration::from_secs(30));
        assert!(err.to_string().contains("page screenshot"));
    }

    #[test]
    fn caller_errors_are_not_retryable() {
        let err = ProbeError::invalid_target("ftp://example.com", "unsupported scheme");
        assert!(err.is_caller_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ProbeError::browser_launch("chrome not found").is_retryable());
        assert!(ProbeError::timeout("navigation", Duration::from_secs(5)).is_retryable());
        assert!(!ProbeError::internal("bug").is_retryable());
    }
}
