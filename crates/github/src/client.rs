//! The GitHub capability set ghbr depends on.

use crate::error::Result;
use crate::models::{
    FileChange, FileContent, NewPullRequest, NewRepository, PullRequest, Release, RepoRef,
    Repository,
};
use async_trait::async_trait;

/// Repository, release and pull request operations against GitHub.
///
/// Every method takes the identifying strings of the resource it touches and
/// returns the resource, or an [`crate::Error`] annotated with the operation
/// name and those identifiers. Implementations never retry.
///
/// # Implementors
///
/// - [`crate::OctocrabClient`] - the GitHub REST API
#[async_trait]
pub trait GitHub: Send + Sync {
    /// Fetches the most recent published release of `repo`.
    async fn latest_release(&self, repo: &RepoRef) -> Result<Release>;

    /// Creates branch `new` pointing at the current head of `origin`.
    async fn create_branch(&self, repo: &RepoRef, origin: &str, new: &str) -> Result<()>;

    /// Deletes `branch`.
    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepoRef,
        pull: &NewPullRequest,
    ) -> Result<PullRequest>;

    /// Merges pull request `number`.
    async fn merge_pull_request(&self, repo: &RepoRef, number: u64) -> Result<()>;

    /// Closes pull request `number` without merging.
    async fn close_pull_request(&self, repo: &RepoRef, number: u64) -> Result<()>;

    /// Fetches the file at `path` on `branch`.
    async fn get_file(&self, repo: &RepoRef, branch: &str, path: &str) -> Result<FileContent>;

    /// Creates a new file.
    async fn create_file(&self, repo: &RepoRef, change: &FileChange) -> Result<()>;

    /// Replaces an existing file. `sha` is the blob SHA the change is based on;
    /// GitHub rejects the write if the file moved on since.
    async fn update_file(&self, repo: &RepoRef, change: &FileChange, sha: &str) -> Result<()>;

    /// Deletes a file.
    async fn delete_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        message: &str,
        sha: &str,
    ) -> Result<()>;

    /// Creates a repository under the authenticated user or `new.org`.
    async fn create_repository(&self, new: &NewRepository) -> Result<Repository>;

    /// Deletes a repository.
    async fn delete_repository(&self, repo: &RepoRef) -> Result<()>;
}
