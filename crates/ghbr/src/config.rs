//! Configuration resolution.
//!
//! Every setting is taken from the first non-empty source, in order: the
//! command-line flag (or its environment variable), `git config`, then
//! `<config_dir>/ghbr/config.toml`.

use crate::cli::{CliError, GitHubArgs};
use ghbr_github::remote::{owner_from_remote, parse_github_remote, repo_from_remote};
use ghbr_homebrew::{BannerFont, DEFAULT_BRANCH};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Values read from a `git config` source.
pub trait GitConfig {
    /// Value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads values by running `git config --get`.
pub struct SystemGit;

impl GitConfig for SystemGit {
    fn get(&self, key: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["config", "--get", key])
            .output()
            .ok()?;

        if !output.status.success() {
            debug!(key, "git config value is unset");
            return None;
        }

        non_empty(String::from_utf8_lossy(&output.stdout).trim())
    }
}

/// Optional settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// GitHub personal access token
    pub token: Option<String>,
    /// Default repository owner
    pub owner: Option<String>,
    /// Default organization of formula repositories
    pub org: Option<String>,
    /// Default branch of formula repositories
    pub branch: Option<String>,
}

impl FileConfig {
    /// `<config_dir>/ghbr/config.toml`, when the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ghbr").join("config.toml"))
    }

    /// Loads the file at the default path; a missing file is an empty config.
    pub fn load() -> Result<Self, CliError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads `path`; a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CliError::config(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), "Loading configuration file");
        toml::from_str(&content).map_err(|e| {
            CliError::config_with_help(
                format!("invalid configuration file {}: {e}", path.display()),
                "Supported keys are token, owner, org and branch",
            )
        })
    }
}

/// Settings of `ghbr release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// GitHub personal access token
    pub token: String,
    /// Owner of the application repository
    pub owner: String,
    /// Application repository name
    pub repo: String,
    /// Organization of the formula repository
    pub org: Option<String>,
    /// Branch of the formula repository
    pub branch: String,
    /// Update even when up-to-date
    pub force: bool,
    /// Merge the pull request
    pub merge: bool,
}

/// Settings of `ghbr create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConfig {
    /// GitHub personal access token
    pub token: String,
    /// Owner of the application repository
    pub owner: String,
    /// Application repository name
    pub repo: String,
    /// Organization of the formula repository
    pub org: Option<String>,
    /// Font of the caveats banner
    pub font: BannerFont,
    /// Create the repository as private
    pub private: bool,
}

/// Where settings come from besides the flags.
pub struct Sources<'a> {
    /// `git config`
    pub git: &'a dyn GitConfig,
    /// Settings file
    pub file: FileConfig,
}

struct Coordinates {
    token: String,
    owner: String,
    repo: String,
    org: Option<String>,
}

impl Sources<'_> {
    /// Resolves the settings of `ghbr release`.
    pub fn release(
        &self,
        args: &GitHubArgs,
        branch: Option<&str>,
        force: bool,
        merge: bool,
    ) -> Result<ReleaseConfig, CliError> {
        if branch.is_some_and(|branch| branch.trim().is_empty()) {
            return Err(CliError::config("missing GitHub branch"));
        }

        let coordinates = self.coordinates(args)?;
        let branch = first([
            branch.map(str::to_string),
            self.file.branch.clone(),
            Some(DEFAULT_BRANCH.to_string()),
        ])
        .ok_or_else(|| CliError::config("missing GitHub branch"))?;

        Ok(ReleaseConfig {
            token: coordinates.token,
            owner: coordinates.owner,
            repo: coordinates.repo,
            org: coordinates.org,
            branch,
            force,
            merge,
        })
    }

    /// Resolves the settings of `ghbr create`.
    pub fn create(
        &self,
        args: &GitHubArgs,
        font: &str,
        private: bool,
    ) -> Result<CreateConfig, CliError> {
        let coordinates = self.coordinates(args)?;

        Ok(CreateConfig {
            token: coordinates.token,
            owner: coordinates.owner,
            repo: coordinates.repo,
            org: coordinates.org,
            font: BannerFont::from_arg(font),
            private,
        })
    }

    fn coordinates(&self, args: &GitHubArgs) -> Result<Coordinates, CliError> {
        let remote = self.git.get("remote.origin.url");
        let github_remote = remote.as_deref().and_then(parse_github_remote);

        let token = first([
            args.token.clone(),
            self.git.get("github.token"),
            self.file.token.clone(),
        ])
        .ok_or_else(|| {
            CliError::config_with_help(
                "missing GitHub personal access token",
                "Pass it with -t, set the GITHUB_TOKEN environment variable, or run `git config --global github.token <token>`",
            )
        })?;

        let owner = first([
            args.owner.clone(),
            github_remote.as_ref().map(|(owner, _)| owner.clone()),
            remote.as_deref().and_then(owner_from_remote),
            self.git.get("github.user"),
            self.git.get("user.name"),
            self.file.owner.clone(),
        ])
        .ok_or_else(|| {
            CliError::config_with_help(
                "missing GitHub repository owner",
                "Pass it with -o, or run `git config --global github.user <user>`",
            )
        })?;

        let repo = first([
            args.repository.clone(),
            github_remote.map(|(_, repo)| repo),
            remote.as_deref().and_then(repo_from_remote),
        ])
        .ok_or_else(|| {
            CliError::config_with_help(
                "missing GitHub repository",
                "Pass it with -r, or run ghbr inside a clone with an origin remote",
            )
        })?;

        let org = first([args.org.clone(), self.file.org.clone()]);

        Ok(Coordinates {
            token,
            owner,
            repo,
            org,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn first<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find_map(|value| non_empty(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapGit(HashMap<&'static str, &'static str>);

    impl MapGit {
        fn with(mut self, key: &'static str, value: &'static str) -> Self {
            self.0.insert(key, value);
            self
        }
    }

    impl GitConfig for MapGit {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|value| (*value).to_string())
        }
    }

    fn args(token: Option<&str>, owner: Option<&str>, repo: Option<&str>) -> GitHubArgs {
        GitHubArgs {
            token: token.map(str::to_string),
            owner: owner.map(str::to_string),
            repository: repo.map(str::to_string),
            org: None,
        }
    }

    #[test]
    fn test_flags_win() {
        let git = MapGit::default()
            .with("github.token", "git-token")
            .with("remote.origin.url", "git@github.com:remote-owner/remote-repo.git");
        let sources = Sources {
            git: &git,
            file: FileConfig {
                token: Some("file-token".to_string()),
                ..FileConfig::default()
            },
        };

        let config = sources
            .release(&args(Some("flag-token"), Some("o"), Some("r")), None, false, true)
            .unwrap();

        assert_eq!(config.token, "flag-token");
        assert_eq!(config.owner, "o");
        assert_eq!(config.repo, "r");
        assert_eq!(config.branch, "master");
        assert!(config.merge);
    }

    #[test]
    fn test_git_config_fallbacks() {
        let git = MapGit::default()
            .with("github.token", "git-token")
            .with("remote.origin.url", "https://github.com/remote-owner/remote-repo.git")
            .with("github.user", "gh-user");
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let config = sources.release(&args(None, None, None), None, false, false).unwrap();

        assert_eq!(config.token, "git-token");
        assert_eq!(config.owner, "remote-owner");
        assert_eq!(config.repo, "remote-repo");
    }

    #[test]
    fn test_owner_falls_back_to_user_settings() {
        let git = MapGit::default()
            .with("github.token", "t")
            .with("user.name", "name");
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let config = sources
            .create(&args(None, None, Some("app")), "standard", false)
            .unwrap();
        assert_eq!(config.owner, "name");

        let git = MapGit::default()
            .with("github.user", "gh-user")
            .with("user.name", "name");
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };
        let config = sources
            .create(&args(Some("t"), None, Some("app")), "standard", false)
            .unwrap();
        assert_eq!(config.owner, "gh-user");
    }

    #[test]
    fn test_file_config_is_last() {
        let git = MapGit::default();
        let sources = Sources {
            git: &git,
            file: FileConfig {
                token: Some("file-token".to_string()),
                owner: Some("file-owner".to_string()),
                org: Some("file-org".to_string()),
                branch: Some("main".to_string()),
            },
        };

        let config = sources
            .release(&args(None, None, Some("app")), None, false, false)
            .unwrap();

        assert_eq!(config.token, "file-token");
        assert_eq!(config.owner, "file-owner");
        assert_eq!(config.org.as_deref(), Some("file-org"));
        assert_eq!(config.branch, "main");

        let config = sources
            .release(&args(None, None, Some("app")), Some("develop"), false, false)
            .unwrap();
        assert_eq!(config.branch, "develop");
    }

    #[test]
    fn test_missing_token() {
        let git = MapGit::default();
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let err = sources
            .release(&args(Some("  "), Some("o"), Some("r")), None, false, false)
            .unwrap_err();

        assert_eq!(err.to_string(), "missing GitHub personal access token");
        match err {
            CliError::Config { help, .. } => {
                let help = help.unwrap();
                assert!(help.contains("-t"));
                assert!(help.contains("GITHUB_TOKEN"));
                assert!(help.contains("github.token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_owner_and_repo() {
        let git = MapGit::default();
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let err = sources
            .release(&args(Some("t"), None, Some("r")), None, false, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing GitHub repository owner");

        let err = sources
            .release(&args(Some("t"), Some("o"), None), None, false, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing GitHub repository");
    }

    #[test]
    fn test_empty_branch_flag() {
        let git = MapGit::default();
        let sources = Sources {
            git: &git,
            file: FileConfig {
                branch: Some("main".to_string()),
                ..FileConfig::default()
            },
        };

        let err = sources
            .release(&args(Some("t"), Some("o"), Some("r")), Some(""), false, false)
            .unwrap_err();

        assert_eq!(err.to_string(), "missing GitHub branch");
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_remote_with_underscore_owner() {
        let git = MapGit::default()
            .with("github.token", "t")
            .with("remote.origin.url", "git@github.com:my_team/tool.git")
            .with("user.name", "name");
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let config = sources.release(&args(None, None, None), None, false, false).unwrap();

        assert_eq!(config.owner, "my_team");
        assert_eq!(config.repo, "tool");
    }

    #[test]
    fn test_create_font() {
        let git = MapGit::default();
        let sources = Sources {
            git: &git,
            file: FileConfig::default(),
        };

        let config = sources
            .create(&args(Some("t"), Some("o"), Some("r")), "fonts/slant.flf", true)
            .unwrap();

        assert_eq!(
            config.font,
            BannerFont::File(PathBuf::from("fonts/slant.flf"))
        );
        assert!(config.private);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "token = \"abc\"\nbranch = \"main\"\n").unwrap();

        let config = FileConfig::load_from(&path).unwrap();

        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.branch.as_deref(), Some("main"));
        assert_eq!(config.owner, None);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tokn = \"abc\"\n").unwrap();

        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("invalid configuration file"));
    }
}
