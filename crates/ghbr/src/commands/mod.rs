//! Command implementations.
//!
//! Each command returns a [`CommandOutput`]; printing is left to the binary.

pub mod create;
pub mod release;
pub mod version;

use crate::cli::{CliError, Commands, OkEnvelope};
use crate::config::{FileConfig, Sources, SystemGit};
use serde::Serialize;

/// What a command reports on success.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Human-readable summary
    pub text: String,
    /// Payload of the JSON envelope
    pub data: serde_json::Value,
}

impl CommandOutput {
    /// Pairs a summary with its JSON payload.
    pub fn new(text: impl Into<String>, data: &impl Serialize) -> Result<Self, CliError> {
        let data = serde_json::to_value(data)
            .map_err(|e| CliError::other(format!("JSON serialization failed: {e}")))?;
        Ok(Self {
            text: text.into(),
            data,
        })
    }

    /// The text to print on stdout.
    pub fn render(&self, json_mode: bool) -> Result<String, CliError> {
        if json_mode {
            serde_json::to_string(&OkEnvelope::new(&self.data))
                .map(|json| format!("{json}\n"))
                .map_err(|e| CliError::other(format!("JSON serialization failed: {e}")))
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Resolves configuration and runs `command`.
pub async fn execute(command: Commands) -> Result<CommandOutput, CliError> {
    match command {
        Commands::Version => version::execute().await,
        Commands::Release {
            github,
            branch,
            force,
            merge,
        } => {
            let sources = Sources {
                git: &SystemGit,
                file: FileConfig::load()?,
            };
            let config = sources.release(&github, branch.as_deref(), force, merge)?;
            release::execute(&config).await
        }
        Commands::Create {
            github,
            font,
            private,
        } => {
            let sources = Sources {
                git: &SystemGit,
                file: FileConfig::load()?,
            };
            let config = sources.create(&github, &font, private)?;
            create::execute(&config).await
        }
    }
}
