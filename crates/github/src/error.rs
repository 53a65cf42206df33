//! Error types for GitHub operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for GitHub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`crate::GitHub`] implementations.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum Error {
    /// A required argument was empty.
    #[error("{message}")]
    #[diagnostic(code(ghbr::github::validation))]
    Validation {
        /// What was missing
        message: String,
    },

    /// The repository, release, ref or file does not exist.
    #[error("{operation}: {target} was not found")]
    #[diagnostic(
        code(ghbr::github::not_found),
        help("Check the owner, repository and branch names, and that the token can see the repository")
    )]
    NotFound {
        /// The operation that failed (e.g. "get latest release")
        operation: &'static str,
        /// The identifiers the operation was called with
        target: String,
    },

    /// The API answered with an error status, or the request never completed.
    #[error("{operation} failed for {target}{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(ghbr::github::api))]
    Api {
        /// The operation that failed
        operation: &'static str,
        /// The identifiers the operation was called with
        target: String,
        /// HTTP status, when the API answered
        status: Option<u16>,
        /// The error message
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to create GitHub client: {message}")]
    #[diagnostic(code(ghbr::github::client))]
    Client {
        /// The error message
        message: String,
    },

    /// A response could not be interpreted.
    #[error("Unexpected GitHub response: {message}")]
    #[diagnostic(code(ghbr::github::decode))]
    Decode {
        /// The error message
        message: String,
    },
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error.
    #[must_use]
    pub fn api(
        operation: &'static str,
        target: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            operation,
            target: target.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Translate an octocrab error into an annotated error for `operation`.
    ///
    /// A 404 becomes [`Error::NotFound`]; every other status keeps its code.
    pub(crate) fn from_octocrab(
        operation: &'static str,
        target: impl Into<String>,
        err: &octocrab::Error,
    ) -> Self {
        let target = target.into();
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                if status == 404 {
                    Self::NotFound { operation, target }
                } else {
                    Self::api(operation, target, Some(status), source.message.clone())
                }
            }
            other => Self::api(operation, target, None, other.to_string()),
        }
    }

    /// Returns `true` if this is a [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Fails with a validation error when `value` is empty.
pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::validation(format!("missing GitHub {what}")))
    } else {
        Ok(())
    }
}
