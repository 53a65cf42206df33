//! Error types for formula workflows.

use crate::formula::FormulaField;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for formula workflows.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a release or updating a formula.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// An expected failure whose message is already written for the user.
    ///
    /// Callers display it as-is instead of wrapping it.
    #[error("{message}")]
    #[diagnostic(code(ghbr::handled))]
    Handled {
        /// The message to show
        message: String,
    },

    /// The formula document lacks one of the recognized fields.
    #[error("could not find `{field}` in the formula file")]
    #[diagnostic(
        code(ghbr::formula::parse),
        help("The formula must contain a line like `{field} \"...\"`")
    )]
    Parse {
        /// The missing field
        field: FormulaField,
    },

    /// The release asset could not be downloaded.
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(code(ghbr::download))]
    Download {
        /// The asset URL
        url: String,
        /// The error message
        message: String,
    },

    /// The HTTP client for asset downloads could not be built.
    #[error("Failed to create HTTP client: {message}")]
    #[diagnostic(code(ghbr::http_client))]
    Client {
        /// The error message
        message: String,
    },

    /// A required input was missing or invalid.
    #[error("{message}")]
    #[diagnostic(code(ghbr::validation))]
    Validation {
        /// What was wrong
        message: String,
    },

    /// A GitHub API call failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    GitHub(#[from] ghbr_github::Error),

    /// An operation failed and undoing its partial work failed too.
    ///
    /// Displays as the primary error; the rollback failures are attached as
    /// related diagnostics.
    #[error("{primary}")]
    #[diagnostic(
        code(ghbr::rollback_incomplete),
        help("Some changes could not be rolled back; check the formula repository for a leftover branch or pull request")
    )]
    RollbackIncomplete {
        /// The error that triggered the rollback
        primary: Box<Error>,
        /// Failures of the rollback calls themselves
        #[related]
        rollback_errors: Vec<ghbr_github::Error>,
    },

    /// Wrapped I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(ghbr::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new handled error.
    #[must_use]
    pub fn handled(message: impl Into<String>) -> Self {
        Self::Handled {
            message: message.into(),
        }
    }

    /// Create a new download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new HTTP client error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Attach rollback failures to `primary`.
    ///
    /// Returns `primary` untouched when every rollback call succeeded.
    #[must_use]
    pub fn with_rollback_errors(primary: Self, rollback_errors: Vec<ghbr_github::Error>) -> Self {
        if rollback_errors.is_empty() {
            primary
        } else {
            Self::RollbackIncomplete {
                primary: Box::new(primary),
                rollback_errors,
            }
        }
    }

    /// The error that caused the failure, looking through rollback wrappers.
    #[must_use]
    pub fn primary(&self) -> &Self {
        match self {
            Self::RollbackIncomplete { primary, .. } => primary.primary(),
            other => other,
        }
    }

    /// Returns `true` if the primary cause is a [`Error::Handled`].
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self.primary(), Self::Handled { .. })
    }
}
