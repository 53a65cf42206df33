//! Git remote URL parsing.

/// Parse a GitHub remote URL into (owner, repo).
///
/// Accepts the SSH (`git@github.com:owner/repo.git`) and HTTPS
/// (`https://github.com/owner/repo.git`) forms, with or without `.git`.
#[must_use]
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("https://github.com/"))?;

    let path = rest.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Extract the owner from any remote whose path ends in `owner/repo`.
///
/// Works for hosts other than github.com, which is enough to guess a default
/// owner name.
#[must_use]
pub fn owner_from_remote(url: &str) -> Option<String> {
    let path = url.trim_end_matches('/');
    let (head, repo) = path.rsplit_once('/')?;
    if repo.is_empty() {
        return None;
    }
    let owner = head.rsplit(['/', ':']).next()?;
    if !owner.is_empty()
        && owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        Some(owner.to_string())
    } else {
        None
    }
}

/// Extract the repository name from any remote whose path ends in `owner/repo`.
#[must_use]
pub fn repo_from_remote(url: &str) -> Option<String> {
    let path = url.trim_end_matches('/');
    let (_, repo) = path.rsplit_once(['/', ':'])?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        None
    } else {
        Some(repo.to_string())
    }
}
