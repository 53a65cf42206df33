//! `ghbr release`: point an existing formula at the latest release.

use super::CommandOutput;
use crate::cli::CliError;
use crate::config::ReleaseConfig;
use ghbr_github::{GitHub, OctocrabClient, RepoRef};
use ghbr_homebrew::{FormulaTarget, FormulaUpdater, ReleaseResolver, UpdateOutcome, UpdateRequest};

/// Runs the command against GitHub.
pub async fn execute(config: &ReleaseConfig) -> Result<CommandOutput, CliError> {
    let github = OctocrabClient::new(config.token.clone())?;
    run(&github, config).await
}

/// Resolves the latest release of `owner/repo` and updates its formula.
pub async fn run(github: &dyn GitHub, config: &ReleaseConfig) -> Result<CommandOutput, CliError> {
    let source = RepoRef::new(&config.owner, &config.repo);
    let release = ReleaseResolver::new(github)?.resolve(&source).await?;

    let request = UpdateRequest {
        target: FormulaTarget::for_app(&config.owner, config.org.as_deref(), &config.repo),
        branch: config.branch.clone(),
        release,
        force: config.force,
        merge: config.merge,
    };
    let outcome = FormulaUpdater::new(github).update(&request).await?;

    CommandOutput::new(summary(&outcome), &outcome)
}

/// Human-readable report of an update.
#[must_use]
pub fn summary(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::UpToDate { version } => format!(
            "The current formula (pointing to version {version}) is up-to-date.\n\
             If you want to update the formula anyway, run `ghbr release` with `--force` option.\n"
        ),
        UpdateOutcome::Merged { .. } => "Yay! Now your formula is up-to-date!\n".to_string(),
        UpdateOutcome::PullRequestOpened { url, .. } => format!(
            "Yay! Now your formula is ready to update!\n\n\
             Access {url} and merge the Pull Request\n"
        ),
    }
}
