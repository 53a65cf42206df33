//! Formula updates through a branch, a commit and a pull request.
//!
//! ```text
//! Fetching -> Comparing -> UpToDate
//!                       -> Branching -> Committing -> PrCreating -> MergePending
//!                                                                -> Merging -> CleaningUp -> Done
//! ```
//!
//! Any failure after the staging branch exists goes through `RollingBack`
//! before the original error is returned.

use crate::error::{Error, Result};
use crate::formula::FormulaDocument;
use crate::resolver::ReleaseInfo;
use ghbr_github::{FileChange, GitHub, NewPullRequest, RepoRef};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Name of the staging branch for `version`.
#[must_use]
pub fn branch_name(version: &str) -> String {
    format!("bumps_up_to_{version}")
}

/// Commit message, pull request title and body for `version`.
#[must_use]
pub fn commit_message(version: &str) -> String {
    format!("Bumps up to {version}")
}

/// Where a formula lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTarget {
    /// The formula repository
    pub repo: RepoRef,
    /// Path of the formula file in the repository
    pub path: String,
}

impl FormulaTarget {
    /// The conventional tap layout: `<org-or-owner>/homebrew-<app>`, file `<app>.rb`.
    #[must_use]
    pub fn for_app(owner: &str, org: Option<&str>, app: &str) -> Self {
        let formula_owner = org.filter(|org| !org.is_empty()).unwrap_or(owner);
        Self {
            repo: RepoRef::new(formula_owner, format!("homebrew-{app}")),
            path: format!("{app}.rb"),
        }
    }
}

/// Input of [`FormulaUpdater::update`].
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// The formula to update
    pub target: FormulaTarget,
    /// Branch the formula is read from and the pull request targets
    pub branch: String,
    /// The release to point the formula at
    pub release: ReleaseInfo,
    /// Update even when the formula already names this version
    pub force: bool,
    /// Merge the pull request instead of leaving it open
    pub merge: bool,
}

/// How an update ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The formula already pointed at the release; nothing was written.
    UpToDate {
        /// Version found in the formula
        version: String,
    },
    /// A pull request was opened and left for the user to merge.
    PullRequestOpened {
        /// Pull request number
        number: u64,
        /// Browser URL of the pull request
        url: String,
        /// Staging branch holding the change
        branch: String,
    },
    /// The pull request was merged and the staging branch deleted.
    Merged {
        /// Pull request number
        number: u64,
        /// Browser URL of the pull request
        url: String,
    },
}

/// Steps of an update, logged as they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Reading the current formula
    Fetching,
    /// Comparing the formula version with the release
    Comparing,
    /// Nothing to do
    UpToDate,
    /// Creating the staging branch
    Branching,
    /// Committing the bumped formula
    Committing,
    /// Opening the pull request
    PrCreating,
    /// Pull request left open
    MergePending,
    /// Merging the pull request
    Merging,
    /// Deleting the merged staging branch
    CleaningUp,
    /// Undoing partial work after a failure
    RollingBack,
    /// Formula updated
    Done,
}

impl UpdateState {
    /// Progress message shown when the state is entered.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Fetching => "Fetching the current formula",
            Self::Comparing => "Comparing the formula version with the latest release",
            Self::UpToDate => "The formula is already up-to-date",
            Self::Branching => "Creating a new branch",
            Self::Committing => "Updating the formula",
            Self::PrCreating => "Creating a pull request",
            Self::MergePending => "Leaving the pull request open",
            Self::Merging => "Merging the pull request",
            Self::CleaningUp => "Deleting the branch",
            Self::RollingBack => "Rolling back",
            Self::Done => "Formula updated",
        }
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Comparing => "comparing",
            Self::UpToDate => "up_to_date",
            Self::Branching => "branching",
            Self::Committing => "committing",
            Self::PrCreating => "pr_creating",
            Self::MergePending => "merge_pending",
            Self::Merging => "merging",
            Self::CleaningUp => "cleaning_up",
            Self::RollingBack => "rolling_back",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Moves an existing formula to a new release.
pub struct FormulaUpdater<'a> {
    github: &'a dyn GitHub,
}

impl<'a> FormulaUpdater<'a> {
    /// Creates an updater over `github`.
    #[must_use]
    pub fn new(github: &'a dyn GitHub) -> Self {
        Self { github }
    }

    /// Runs the update.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. When partial work had to be
    /// undone and undoing it failed too, the error is an
    /// [`Error::RollbackIncomplete`] wrapping the original one.
    pub async fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let repo = &request.target.repo;
        let path = request.target.path.as_str();
        let version = request.release.version.as_str();

        if request.branch.is_empty() {
            return Err(Error::validation("missing GitHub branch"));
        }

        enter(UpdateState::Fetching, repo);
        let file = self.github.get_file(repo, &request.branch, path).await?;
        let current = FormulaDocument::decode(&file)?;

        enter(UpdateState::Comparing, repo);
        let current_version = current.version()?;
        if current_version == version && !request.force {
            enter(UpdateState::UpToDate, repo);
            return Ok(UpdateOutcome::UpToDate {
                version: current_version.to_string(),
            });
        }

        let bumped = current.bump(&request.release)?;
        let staging = branch_name(version);
        let message = commit_message(version);

        enter(UpdateState::Branching, repo);
        self.github
            .create_branch(repo, &request.branch, &staging)
            .await?;

        enter(UpdateState::Committing, repo);
        let change = FileChange::new(
            path,
            staging.as_str(),
            message.as_str(),
            bumped.into_string(),
        );
        if let Err(e) = self.github.update_file(repo, &change, &file.sha).await {
            return Err(self.roll_back(repo, None, &staging, e.into()).await);
        }

        enter(UpdateState::PrCreating, repo);
        let new_pull = NewPullRequest {
            title: message.clone(),
            head: staging.clone(),
            base: request.branch.clone(),
            body: message,
        };
        let pull = match self.github.create_pull_request(repo, &new_pull).await {
            Ok(pull) => pull,
            Err(e) => return Err(self.roll_back(repo, None, &staging, e.into()).await),
        };

        if !request.merge {
            enter(UpdateState::MergePending, repo);
            return Ok(UpdateOutcome::PullRequestOpened {
                number: pull.number,
                url: pull.html_url,
                branch: staging,
            });
        }

        enter(UpdateState::Merging, repo);
        if let Err(e) = self.github.merge_pull_request(repo, pull.number).await {
            return Err(self
                .roll_back(repo, Some(pull.number), &staging, e.into())
                .await);
        }

        enter(UpdateState::CleaningUp, repo);
        self.github.delete_branch(repo, &staging).await?;

        enter(UpdateState::Done, repo);
        Ok(UpdateOutcome::Merged {
            number: pull.number,
            url: pull.html_url,
        })
    }

    /// Closes the pull request (if any) and deletes the staging branch.
    ///
    /// Every step is attempted; failures are logged and attached to `primary`.
    async fn roll_back(
        &self,
        repo: &RepoRef,
        pull: Option<u64>,
        branch: &str,
        primary: Error,
    ) -> Error {
        warn!(repo = %repo, error = %primary, "{}", UpdateState::RollingBack.description());
        let mut failures = Vec::new();

        if let Some(number) = pull
            && let Err(e) = self.github.close_pull_request(repo, number).await
        {
            warn!(repo = %repo, number, error = %e, "Failed to close the pull request");
            failures.push(e);
        }

        if let Err(e) = self.github.delete_branch(repo, branch).await {
            warn!(repo = %repo, branch, error = %e, "Failed to delete the branch");
            failures.push(e);
        }

        Error::with_rollback_errors(primary, failures)
    }
}

fn enter(state: UpdateState, repo: &RepoRef) {
    info!(repo = %repo, state = %state, "{}", state.description());
}
