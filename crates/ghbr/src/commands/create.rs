//! `ghbr create`: bootstrap a formula repository from the latest release.

use super::CommandOutput;
use crate::cli::CliError;
use crate::config::CreateConfig;
use ghbr_github::{GitHub, OctocrabClient, RepoRef};
use ghbr_homebrew::{CreateOutcome, CreateRequest, FormulaBootstrapper, ReleaseResolver};

/// Runs the command against GitHub.
pub async fn execute(config: &CreateConfig) -> Result<CommandOutput, CliError> {
    let github = OctocrabClient::new(config.token.clone())?;
    run(&github, config).await
}

/// Resolves the latest release of `owner/repo` and creates its formula repository.
pub async fn run(github: &dyn GitHub, config: &CreateConfig) -> Result<CommandOutput, CliError> {
    let source = RepoRef::new(&config.owner, &config.repo);
    let release = ReleaseResolver::new(github)?.resolve(&source).await?;

    let request = CreateRequest {
        owner: config.owner.clone(),
        org: config.org.clone(),
        app: config.repo.clone(),
        banner: config.font.clone(),
        private: config.private,
        release,
    };
    let outcome = FormulaBootstrapper::new(github).create(&request).await?;

    CommandOutput::new(summary(&outcome), &outcome)
}

/// Human-readable report of a created repository.
#[must_use]
pub fn summary(outcome: &CreateOutcome) -> String {
    format!(
        "Yay! Your Homebrew formula repository has been successfully created!\n\
         Access {} and see what we achieved.\n",
        outcome.repository.html_url
    )
}
