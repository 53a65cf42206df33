//! Plain data types exchanged with [`crate::GitHub`].
//!
//! These deliberately carry only the fields ghbr reads, so test doubles can
//! build them without touching octocrab's models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// User or organization owning the repository
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Creates a new repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Browser URL of the repository on github.com.
    #[must_use]
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag the release points at (e.g. "v0.1.0")
    pub tag_name: String,
    /// Browser URL of the release page
    pub html_url: String,
    /// Uploaded assets, in the order the API lists them
    pub assets: Vec<ReleaseAsset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Asset file name
    pub name: String,
    /// Public download URL
    pub browser_download_url: String,
}

impl ReleaseAsset {
    /// Creates a new release asset.
    #[must_use]
    pub fn new(name: impl Into<String>, browser_download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            browser_download_url: browser_download_url.into(),
        }
    }
}

/// Request body for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Pull request title
    pub title: String,
    /// Branch holding the changes
    pub head: String,
    /// Branch the changes should be merged into
    pub base: String,
    /// Pull request description
    pub body: String,
}

/// An opened pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Browser URL of the pull request
    pub html_url: String,
}

/// A file fetched from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Path within the repository
    pub path: String,
    /// Blob SHA, required to update or delete the file
    pub sha: String,
    /// Encoding of `content` as reported by the API (normally "base64")
    pub encoding: String,
    /// Encoded file content
    pub content: String,
}

/// A file write on a branch (create or update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path within the repository
    pub path: String,
    /// Branch to commit to
    pub branch: String,
    /// Commit message
    pub message: String,
    /// Raw (unencoded) file content
    pub content: Vec<u8>,
}

impl FileChange {
    /// Creates a new file change.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        branch: impl Into<String>,
        message: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            message: message.into(),
            content: content.into(),
        }
    }
}

/// Request body for creating a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepository {
    /// Organization to create the repository under; the authenticated user when `None`
    #[serde(skip)]
    pub org: Option<String>,
    /// Repository name
    pub name: String,
    /// Short description
    pub description: String,
    /// Homepage URL
    pub homepage: String,
    /// Whether the repository is private
    pub private: bool,
}

/// A created repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// "owner/name"
    pub full_name: String,
    /// Browser URL of the repository
    pub html_url: String,
}
