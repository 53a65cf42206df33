//! `ghbr version`: current version plus an advisory update check.

use super::CommandOutput;
use crate::cli::CliError;
use ghbr_github::{GitHub, OctocrabClient, RepoRef};
use semver::Version;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Repository ghbr itself is released from.
pub const OWNER: &str = "shuheiktgw";
/// Name of the tool and its repository.
pub const NAME: &str = "ghbr";
/// How long the update check may take.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct VersionInfo<'a> {
    current: &'a str,
    latest: Option<String>,
}

/// Runs the command; the update check never fails it.
pub async fn execute() -> Result<CommandOutput, CliError> {
    let latest = match OctocrabClient::anonymous() {
        Ok(github) => check_latest(&github, CHECK_TIMEOUT).await,
        Err(e) => {
            debug!(error = %e, "Skipping the update check");
            None
        }
    };

    let current = env!("CARGO_PKG_VERSION");
    let text = version_text(current, latest.as_ref());
    CommandOutput::new(
        text,
        &VersionInfo {
            current,
            latest: latest.map(|v| v.to_string()),
        },
    )
}

/// The latest released version, if it is newer than the running one and
/// GitHub answers within `timeout`.
pub async fn check_latest(github: &dyn GitHub, timeout: Duration) -> Option<Version> {
    let repo = RepoRef::new(OWNER, NAME);
    let release = match tokio::time::timeout(timeout, github.latest_release(&repo)).await {
        Ok(Ok(release)) => release,
        Ok(Err(e)) => {
            debug!(error = %e, "Update check failed");
            return None;
        }
        Err(_) => {
            debug!("Update check timed out");
            return None;
        }
    };

    newer_version(env!("CARGO_PKG_VERSION"), &release.tag_name)
}

/// `tag` as a version, when it is newer than `current`.
#[must_use]
pub fn newer_version(current: &str, tag: &str) -> Option<Version> {
    let current = Version::parse(current.trim_start_matches('v')).ok()?;
    let latest = Version::parse(tag.trim_start_matches('v')).ok()?;
    (latest > current).then_some(latest)
}

/// Output of the command.
#[must_use]
pub fn version_text(current: &str, newer: Option<&Version>) -> String {
    let mut text = format!("The current version of {NAME} is v{current}\n");
    if let Some(newer) = newer {
        text.push_str(&format!("The latest version is v{newer}, please update {NAME}\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ghbr_github::{
        FileChange, FileContent, NewPullRequest, NewRepository, PullRequest, Release, Repository,
        Result,
    };

    /// Answers `latest_release` after `delay`; every other call is unused.
    struct SlowReleases {
        tag: &'static str,
        delay: Duration,
    }

    fn unused<T>() -> Result<T> {
        Err(ghbr_github::Error::validation("unused in version tests"))
    }

    #[async_trait]
    impl GitHub for SlowReleases {
        async fn latest_release(&self, _repo: &RepoRef) -> Result<Release> {
            tokio::time::sleep(self.delay).await;
            Ok(Release {
                tag_name: self.tag.to_string(),
                html_url: String::new(),
                assets: Vec::new(),
            })
        }
        async fn create_branch(&self, _: &RepoRef, _: &str, _: &str) -> Result<()> {
            unused()
        }
        async fn delete_branch(&self, _: &RepoRef, _: &str) -> Result<()> {
            unused()
        }
        async fn create_pull_request(
            &self,
            _: &RepoRef,
            _: &NewPullRequest,
        ) -> Result<PullRequest> {
            unused()
        }
        async fn merge_pull_request(&self, _: &RepoRef, _: u64) -> Result<()> {
            unused()
        }
        async fn close_pull_request(&self, _: &RepoRef, _: u64) -> Result<()> {
            unused()
        }
        async fn get_file(&self, _: &RepoRef, _: &str, _: &str) -> Result<FileContent> {
            unused()
        }
        async fn create_file(&self, _: &RepoRef, _: &FileChange) -> Result<()> {
            unused()
        }
        async fn update_file(&self, _: &RepoRef, _: &FileChange, _: &str) -> Result<()> {
            unused()
        }
        async fn delete_file(&self, _: &RepoRef, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
            unused()
        }
        async fn create_repository(&self, _: &NewRepository) -> Result<Repository> {
            unused()
        }
        async fn delete_repository(&self, _: &RepoRef) -> Result<()> {
            unused()
        }
    }

    #[test]
    fn test_newer_version() {
        assert_eq!(newer_version("0.1.0", "v0.2.0"), Some(Version::new(0, 2, 0)));
        assert_eq!(newer_version("0.1.0", "0.1.0"), None);
        assert_eq!(newer_version("0.2.0", "v0.1.9"), None);
        assert_eq!(newer_version("0.1.0", "nightly"), None);
    }

    #[test]
    fn test_version_text() {
        assert_eq!(
            version_text("0.1.0", None),
            "The current version of ghbr is v0.1.0\n"
        );
        assert_eq!(
            version_text("0.1.0", Some(&Version::new(1, 0, 0))),
            "The current version of ghbr is v0.1.0\nThe latest version is v1.0.0, please update ghbr\n"
        );
    }

    #[tokio::test]
    async fn test_check_latest_reports_newer() {
        let github = SlowReleases {
            tag: "v999.0.0",
            delay: Duration::ZERO,
        };
        let latest = check_latest(&github, Duration::from_secs(1)).await;
        assert_eq!(latest, Some(Version::new(999, 0, 0)));
    }

    #[tokio::test]
    async fn test_check_latest_times_out() {
        let github = SlowReleases {
            tag: "v999.0.0",
            delay: Duration::from_secs(5),
        };
        let latest = check_latest(&github, Duration::from_millis(50)).await;
        assert_eq!(latest, None);
    }
}
