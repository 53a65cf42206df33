//! [`GitHub`] implementation over the GitHub REST API.

use crate::client::GitHub;
use crate::error::{Error, Result, require};
use crate::models::{
    FileChange, FileContent, NewPullRequest, NewRepository, PullRequest, Release, ReleaseAsset,
    RepoRef, Repository,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use tracing::debug;

/// GitHub client backed by octocrab.
pub struct OctocrabClient {
    inner: Octocrab,
}

impl OctocrabClient {
    /// Creates a client authenticated with a personal access token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        require(&token, "personal access token")?;

        let inner = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;

        Ok(Self { inner })
    }

    /// Creates an unauthenticated client, good for reading public releases.
    pub fn anonymous() -> Result<Self> {
        let inner = Octocrab::builder().build().map_err(|e| Error::Client {
            message: e.to_string(),
        })?;

        Ok(Self { inner })
    }

    /// Wraps an already configured octocrab instance (e.g. GitHub Enterprise).
    #[must_use]
    pub const fn from_octocrab(inner: Octocrab) -> Self {
        Self { inner }
    }
}

fn require_repo(repo: &RepoRef) -> Result<()> {
    require(&repo.owner, "repository owner")?;
    require(&repo.name, "repository name")
}

#[async_trait]
impl GitHub for OctocrabClient {
    async fn latest_release(&self, repo: &RepoRef) -> Result<Release> {
        require_repo(repo)?;
        debug!(repo = %repo, "Fetching latest release");

        let release = self
            .inner
            .repos(&repo.owner, &repo.name)
            .releases()
            .get_latest()
            .await
            .map_err(|e| Error::from_octocrab("get latest release", repo.to_string(), &e))?;

        Ok(Release {
            tag_name: release.tag_name,
            html_url: release.html_url.to_string(),
            assets: release
                .assets
                .into_iter()
                .map(|asset| ReleaseAsset::new(asset.name, asset.browser_download_url.to_string()))
                .collect(),
        })
    }

    async fn create_branch(&self, repo: &RepoRef, origin: &str, new: &str) -> Result<()> {
        require_repo(repo)?;
        require(origin, "origin branch name")?;
        require(new, "new branch name")?;

        let handler = self.inner.repos(&repo.owner, &repo.name);

        let origin_ref = handler
            .get_ref(&Reference::Branch(origin.to_string()))
            .await
            .map_err(|e| Error::from_octocrab("get ref", format!("{repo}@heads/{origin}"), &e))?;

        let sha = match origin_ref.object {
            Object::Commit { sha, .. } | Object::Tag { sha, .. } => sha,
            #[allow(unreachable_patterns)]
            _ => {
                return Err(Error::decode(format!(
                    "heads/{origin} in {repo} does not point at a commit"
                )));
            }
        };

        debug!(repo = %repo, origin, new, sha = %sha, "Creating branch");

        handler
            .create_ref(&Reference::Branch(new.to_string()), sha)
            .await
            .map_err(|e| Error::from_octocrab("create ref", format!("{repo}@heads/{new}"), &e))?;

        Ok(())
    }

    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()> {
        require_repo(repo)?;
        require(branch, "branch name")?;
        debug!(repo = %repo, branch, "Deleting branch");

        self.inner
            .repos(&repo.owner, &repo.name)
            .delete_ref(&Reference::Branch(branch.to_string()))
            .await
            .map_err(|e| Error::from_octocrab("delete ref", format!("{repo}@heads/{branch}"), &e))
    }

    async fn create_pull_request(
        &self,
        repo: &RepoRef,
        pull: &NewPullRequest,
    ) -> Result<PullRequest> {
        require_repo(repo)?;
        require(&pull.title, "pull request title")?;
        require(&pull.head, "pull request head branch")?;
        require(&pull.base, "pull request base branch")?;
        require(&pull.body, "pull request body")?;
        debug!(repo = %repo, head = %pull.head, base = %pull.base, "Creating pull request");

        let created = self
            .inner
            .pulls(&repo.owner, &repo.name)
            .create(&pull.title, &pull.head, &pull.base)
            .body(&pull.body)
            .send()
            .await
            .map_err(|e| {
                Error::from_octocrab(
                    "create pull request",
                    format!("{repo} {} -> {}", pull.head, pull.base),
                    &e,
                )
            })?;

        let html_url = created
            .html_url
            .map(|url| url.to_string())
            .unwrap_or_else(|| format!("{}/pull/{}", repo.html_url(), created.number));

        Ok(PullRequest {
            number: created.number,
            html_url,
        })
    }

    async fn merge_pull_request(&self, repo: &RepoRef, number: u64) -> Result<()> {
        require_repo(repo)?;
        if number == 0 {
            return Err(Error::validation("missing GitHub pull request number"));
        }
        debug!(repo = %repo, number, "Merging pull request");

        let target = format!("{repo}#{number}");
        let merge = self
            .inner
            .pulls(&repo.owner, &repo.name)
            .merge(number)
            .send()
            .await
            .map_err(|e| Error::from_octocrab("merge pull request", target.clone(), &e))?;

        if merge.merged {
            Ok(())
        } else {
            Err(Error::api(
                "merge pull request",
                target,
                None,
                merge
                    .message
                    .unwrap_or_else(|| "pull request was not merged".to_string()),
            ))
        }
    }

    async fn close_pull_request(&self, repo: &RepoRef, number: u64) -> Result<()> {
        require_repo(repo)?;
        debug!(repo = %repo, number, "Closing pull request");

        self.inner
            .pulls(&repo.owner, &repo.name)
            .update(number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await
            .map_err(|e| {
                Error::from_octocrab("close pull request", format!("{repo}#{number}"), &e)
            })?;

        Ok(())
    }

    async fn get_file(&self, repo: &RepoRef, branch: &str, path: &str) -> Result<FileContent> {
        require_repo(repo)?;
        require(branch, "branch name")?;
        require(path, "file path")?;
        debug!(repo = %repo, branch, path, "Fetching file");

        let target = format!("{repo}@{branch}:{path}");
        let items = self
            .inner
            .repos(&repo.owner, &repo.name)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await
            .map_err(|e| Error::from_octocrab("get file", target.clone(), &e))?;

        let item = items
            .items
            .into_iter()
            .next()
            .ok_or(Error::NotFound {
                operation: "get file",
                target,
            })?;

        Ok(FileContent {
            path: item.path,
            sha: item.sha,
            encoding: item.encoding.unwrap_or_default(),
            content: item.content.unwrap_or_default(),
        })
    }

    async fn create_file(&self, repo: &RepoRef, change: &FileChange) -> Result<()> {
        require_repo(repo)?;
        require(&change.path, "file path")?;
        require(&change.branch, "branch name")?;
        require(&change.message, "commit message")?;
        debug!(repo = %repo, branch = %change.branch, path = %change.path, "Creating file");

        self.inner
            .repos(&repo.owner, &repo.name)
            .create_file(&change.path, &change.message, &change.content)
            .branch(&change.branch)
            .send()
            .await
            .map_err(|e| {
                Error::from_octocrab(
                    "create file",
                    format!("{repo}@{}:{}", change.branch, change.path),
                    &e,
                )
            })?;

        Ok(())
    }

    async fn update_file(&self, repo: &RepoRef, change: &FileChange, sha: &str) -> Result<()> {
        require_repo(repo)?;
        require(&change.path, "file path")?;
        require(&change.branch, "branch name")?;
        require(&change.message, "commit message")?;
        require(sha, "file sha")?;
        if change.content.is_empty() {
            return Err(Error::validation("missing GitHub content"));
        }
        debug!(repo = %repo, branch = %change.branch, path = %change.path, sha, "Updating file");

        self.inner
            .repos(&repo.owner, &repo.name)
            .update_file(&change.path, &change.message, &change.content, sha)
            .branch(&change.branch)
            .send()
            .await
            .map_err(|e| {
                Error::from_octocrab(
                    "update file",
                    format!("{repo}@{}:{}", change.branch, change.path),
                    &e,
                )
            })?;

        Ok(())
    }

    async fn delete_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        message: &str,
        sha: &str,
    ) -> Result<()> {
        require_repo(repo)?;
        require(branch, "branch name")?;
        require(path, "file path")?;
        require(message, "commit message")?;
        require(sha, "file sha")?;
        debug!(repo = %repo, branch, path, "Deleting file");

        self.inner
            .repos(&repo.owner, &repo.name)
            .delete_file(path, message, sha)
            .branch(branch)
            .send()
            .await
            .map_err(|e| {
                Error::from_octocrab("delete file", format!("{repo}@{branch}:{path}"), &e)
            })?;

        Ok(())
    }

    async fn create_repository(&self, new: &NewRepository) -> Result<Repository> {
        require(&new.name, "repository name")?;
        require(&new.description, "repository description")?;

        let route = match new.org.as_deref() {
            Some(org) if !org.is_empty() => format!("/orgs/{org}/repos"),
            _ => "/user/repos".to_string(),
        };
        debug!(route = %route, name = %new.name, private = new.private, "Creating repository");

        let created: octocrab::models::Repository = self
            .inner
            .post(&route, Some(new))
            .await
            .map_err(|e| Error::from_octocrab("create repository", new.name.clone(), &e))?;

        let full_name = created.full_name.unwrap_or_else(|| {
            new.org
                .as_deref()
                .map_or_else(|| created.name.clone(), |org| format!("{org}/{}", created.name))
        });
        let html_url = created
            .html_url
            .map_or_else(|| format!("https://github.com/{full_name}"), |url| url.to_string());

        Ok(Repository {
            full_name,
            html_url,
        })
    }

    async fn delete_repository(&self, repo: &RepoRef) -> Result<()> {
        require_repo(repo)?;
        debug!(repo = %repo, "Deleting repository");

        self.inner
            .repos(&repo.owner, &repo.name)
            .delete()
            .await
            .map_err(|e| Error::from_octocrab("delete repository", repo.to_string(), &e))
    }
}
