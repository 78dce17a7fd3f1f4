//! Error types for Gitea API operations.
//!
//! Errors carry the HTTP status returned by Gitea where one exists, so
//! callers can tell a missing account apart from a rejected request.

use std::fmt;

/// Result type alias for Gitea API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of Gitea API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level failure (DNS, TLS, connection, timeout).
    Network,
    /// Token missing, invalid, or lacking admin scope.
    Unauthorized,
    /// The addressed account does not exist.
    NotFound,
    /// Gitea rejected the request body (duplicate login, bad email, ...).
    Rejected,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Unauthorized => "Not authorized",
            Self::NotFound => "User not found",
            Self::Rejected => "Request rejected by Gitea",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that base_url is reachable and try again",
            Self::Unauthorized => "Check that the token belongs to a site administrator",
            Self::NotFound => "Verify the username, or create the user first",
            Self::Rejected => "Check the declared fields against Gitea's validation rules",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Gitea API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Gitea answered with a non-success status.
    #[error("Gitea API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from Gitea's error body, or the raw body.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an API error from a status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, if Gitea answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) => ErrorCategory::Network,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Unauthorized,
                404 => ErrorCategory::NotFound,
                400 | 409 | 422 => ErrorCategory::Rejected,
                _ => ErrorCategory::Other,
            },
            Self::InvalidResponse(_) | Self::InvalidConfig(_) => ErrorCategory::Other,
        }
    }

    /// Whether the addressed account does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Api {
                status: code,
                message: format!("HTTP {code}"),
            },
            other => Self::Http(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_status() {
        assert_eq!(Error::api(401, "").category(), ErrorCategory::Unauthorized);
        assert_eq!(Error::api(403, "").category(), ErrorCategory::Unauthorized);
        assert_eq!(Error::api(404, "").category(), ErrorCategory::NotFound);
        assert_eq!(Error::api(422, "").category(), ErrorCategory::Rejected);
        assert_eq!(Error::api(500, "").category(), ErrorCategory::Other);
        assert_eq!(
            Error::Http("dns".into()).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::api(404, "user does not exist").is_not_found());
        assert!(!Error::api(500, "boom").is_not_found());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::api(409, "taken").status(), Some(409));
        assert_eq!(Error::InvalidConfig("x".into()).status(), None);
    }

    #[test]
    fn test_display() {
        let err = Error::api(422, "e-mail invalid");
        assert_eq!(err.to_string(), "Gitea API error (422): e-mail invalid");
    }

    #[test]
    fn test_from_ureq_status_code() {
        let err: Error = ureq::Error::StatusCode(404).into();
        assert_eq!(err.status(), Some(404));
    }
}
