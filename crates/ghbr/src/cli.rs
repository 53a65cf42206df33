use clap::{Args, Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Failure of a command after its inputs were accepted
pub const EXIT_ERROR: i32 = 11;
/// Flag parsing or configuration error exit code
pub const EXIT_PARSE_FLAGS: i32 = 12;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Flag or configuration error (exit code 12)
    #[error("{message}")]
    #[diagnostic(code(ghbr::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// A workflow failed (exit code 11, or 12 for validation failures)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Workflow(#[from] ghbr_homebrew::Error),

    /// Other unexpected error (exit code 11)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(ghbr::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Short machine-readable code used in the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Other { .. } => "other",
            Self::Workflow(err) => match err {
                ghbr_homebrew::Error::Handled { .. } => "handled",
                ghbr_homebrew::Error::Parse { .. } => "parse",
                ghbr_homebrew::Error::Download { .. } => "download",
                ghbr_homebrew::Error::Client { .. } => "http_client",
                ghbr_homebrew::Error::Validation { .. } => "validation",
                ghbr_homebrew::Error::GitHub(_) => "github",
                ghbr_homebrew::Error::Io(_) => "io",
                ghbr_homebrew::Error::RollbackIncomplete { .. } => "rollback_incomplete",
            },
        }
    }
}

impl From<ghbr_github::Error> for CliError {
    fn from(err: ghbr_github::Error) -> Self {
        match err {
            ghbr_github::Error::Validation { message } => Self::config(message),
            other => Self::Workflow(other.into()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_PARSE_FLAGS,
        CliError::Workflow(inner)
            if matches!(inner.primary(), ghbr_homebrew::Error::Validation { .. }) =>
        {
            EXIT_PARSE_FLAGS
        }
        CliError::Workflow(_) | CliError::Other { .. } => EXIT_ERROR,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": err.code(),
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else if let CliError::Workflow(inner) = &err
        && matches!(inner, ghbr_homebrew::Error::Handled { .. })
    {
        // Handled messages are already written for the user
        eprintln!("{inner}");
    } else {
        let report = Report::new(err);
        eprintln!("{report:?}");
    }
    let _ = io::stderr().flush();
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Main CLI entry point for ghbr.
///
/// Publishes and updates Homebrew formulas driven by GitHub Releases.
#[derive(Parser, Debug)]
#[command(name = "ghbr")]
#[command(about = "Publish and update Homebrew formulas from GitHub Releases")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "info",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Emit JSON logs and a JSON result envelope.
    #[arg(long, global = true, help = "Emit JSON logs and a JSON result envelope")]
    pub json: bool,
}

/// GitHub coordinates shared by `create` and `release`.
#[derive(Args, Debug, Clone, Default)]
pub struct GitHubArgs {
    /// GitHub personal access token.
    #[arg(
        short = 't',
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub personal access token"
    )]
    pub token: Option<String>,

    /// Owner of the application repository.
    #[arg(short = 'o', long, help = "GitHub repository owner")]
    pub owner: Option<String>,

    /// Application repository name.
    #[arg(short = 'r', long = "repository", help = "GitHub repository name")]
    pub repository: Option<String>,

    /// Organization hosting the formula repository.
    #[arg(short = 'g', long = "org", help = "GitHub organization of the formula repository")]
    pub org: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Homebrew formula repository.
    #[command(
        alias = "init",
        about = "Create a new GitHub repository for Homebrew formula"
    )]
    Create {
        /// GitHub coordinates.
        #[command(flatten)]
        github: GitHubArgs,

        /// Font of the ASCII-art banner in the formula's caveats.
        #[arg(
            short = 'f',
            long,
            default_value = "standard",
            help = "FIGlet font for the caveats banner: `standard` or a path to a .flf file"
        )]
        font: String,

        /// Create the repository as private.
        #[arg(short = 'p', long, help = "Create a private repository")]
        private: bool,
    },

    /// Update a formula to point at the latest release.
    #[command(
        visible_aliases = ["update", "bumpup"],
        about = "Update your Homebrew formula to point to the latest release"
    )]
    Release {
        /// GitHub coordinates.
        #[command(flatten)]
        github: GitHubArgs,

        /// Branch of the formula repository.
        #[arg(short = 'b', long, help = "Branch of the formula repository [default: master]")]
        branch: Option<String>,

        /// Update even when the formula already points at the release.
        #[arg(
            short = 'f',
            long,
            help = "Forcefully update a formula file, even if it's up-to-date"
        )]
        force: bool,

        /// Merge the pull request right away.
        #[arg(short = 'm', long, help = "Merge the pull request after creating it")]
        merge: bool,
    },

    /// Show version information.
    #[command(about = "Show version information")]
    Version,
}

impl Commands {
    /// Name used in logs and spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Release { .. } => "release",
            Self::Version => "version",
        }
    }
}

/// Parse command line arguments.
///
/// Help and version requests return `Ok(None)` after printing; every other
/// parse failure is rendered and mapped to [`EXIT_PARSE_FLAGS`].
pub fn parse_from<I, T>(args: I) -> Result<Option<Cli>, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    Ok(None)
                }
                _ => Err(EXIT_PARSE_FLAGS),
            }
        }
    }
}
