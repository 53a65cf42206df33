//! In-memory GitHub double shared by the integration tests.
//!
//! Keeps branches, files and pull requests of a single formula repository,
//! records every call in order and fails any operation on request.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ghbr_github::{
    Error, FileChange, FileContent, GitHub, NewPullRequest, NewRepository, PullRequest, Release,
    RepoRef, Repository, Result,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Operations the double can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    LatestRelease,
    CreateBranch,
    DeleteBranch,
    CreatePullRequest,
    MergePullRequest,
    ClosePullRequest,
    GetFile,
    CreateFile,
    UpdateFile,
    DeleteFile,
    CreateRepository,
    DeleteRepository,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LatestRelease(RepoRef),
    CreateBranch { origin: String, new: String },
    DeleteBranch(String),
    CreatePullRequest(NewPullRequest),
    MergePullRequest(u64),
    ClosePullRequest(u64),
    GetFile { branch: String, path: String },
    CreateFile { branch: String, path: String, message: String },
    UpdateFile { branch: String, path: String, message: String, sha: String },
    DeleteFile { branch: String, path: String },
    CreateRepository(NewRepository),
    DeleteRepository(RepoRef),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    failures: HashSet<Op>,
    release: Option<Release>,
    /// Formula repository the branches belong to; any repository when unset
    tap: Option<RepoRef>,
    /// branch -> path -> content
    branches: BTreeMap<String, BTreeMap<String, String>>,
    /// number -> (head, base)
    open_pulls: HashMap<u64, (String, String)>,
    next_pull: u64,
}

/// Recording GitHub double.
#[derive(Default)]
pub struct FakeGitHub {
    state: Mutex<State>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_pull = 1;
        fake
    }

    /// Adds a branch holding a single file.
    pub fn with_file(self, branch: &str, path: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .branches
            .entry(branch.to_string())
            .or_default()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Serves files only for `repo`; other repositories are not found.
    pub fn serving(self, repo: RepoRef) -> Self {
        self.state.lock().unwrap().tap = Some(repo);
        self
    }

    pub fn with_release(self, release: Release) -> Self {
        self.state.lock().unwrap().release = Some(release);
        self
    }

    pub fn failing(self, op: Op) -> Self {
        self.state.lock().unwrap().failures.insert(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    pub fn file(&self, branch: &str, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .branches
            .get(branch)
            .and_then(|files| files.get(path))
            .cloned()
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().unwrap().branches.contains_key(branch)
    }

    pub fn open_pull_requests(&self) -> usize {
        self.state.lock().unwrap().open_pulls.len()
    }

    fn record(&self, op: Op, call: Call) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failures.contains(&op) {
            return Err(Error::api(
                op_name(op),
                "fake",
                Some(500),
                format!("injected {} failure", op_name(op)),
            ));
        }
        Ok(state)
    }
}

fn op_name(op: Op) -> &'static str {
    match op {
        Op::LatestRelease => "get latest release",
        Op::CreateBranch => "create ref",
        Op::DeleteBranch => "delete ref",
        Op::CreatePullRequest => "create pull request",
        Op::MergePullRequest => "merge pull request",
        Op::ClosePullRequest => "close pull request",
        Op::GetFile => "get file",
        Op::CreateFile => "create file",
        Op::UpdateFile => "update file",
        Op::DeleteFile => "delete file",
        Op::CreateRepository => "create repository",
        Op::DeleteRepository => "delete repository",
    }
}

fn blob_sha(content: &str) -> String {
    format!("sha-{}", content.len())
}

/// Base64 wrapped at 60 columns, the way the contents API returns it.
pub fn encode_wrapped(content: &str) -> String {
    let encoded = STANDARD.encode(content);
    encoded
        .as_bytes()
        .chunks(60)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

fn not_found(operation: &'static str, target: impl Into<String>) -> Error {
    Error::NotFound {
        operation,
        target: target.into(),
    }
}

#[async_trait]
impl GitHub for FakeGitHub {
    async fn latest_release(&self, repo: &RepoRef) -> Result<Release> {
        let state = self.record(Op::LatestRelease, Call::LatestRelease(repo.clone()))?;
        state
            .release
            .clone()
            .ok_or_else(|| not_found("get latest release", repo.to_string()))
    }

    async fn create_branch(&self, _repo: &RepoRef, origin: &str, new: &str) -> Result<()> {
        let mut state = self.record(
            Op::CreateBranch,
            Call::CreateBranch {
                origin: origin.to_string(),
                new: new.to_string(),
            },
        )?;
        let files = state
            .branches
            .get(origin)
            .cloned()
            .ok_or_else(|| not_found("get ref", origin))?;
        if state.branches.contains_key(new) {
            return Err(Error::api("create ref", new, Some(422), "Reference already exists"));
        }
        state.branches.insert(new.to_string(), files);
        Ok(())
    }

    async fn delete_branch(&self, _repo: &RepoRef, branch: &str) -> Result<()> {
        let mut state = self.record(Op::DeleteBranch, Call::DeleteBranch(branch.to_string()))?;
        state
            .branches
            .remove(branch)
            .map(|_| ())
            .ok_or_else(|| not_found("delete ref", branch))?;
        state.open_pulls.retain(|_, (head, _)| head != branch);
        Ok(())
    }

    async fn create_pull_request(
        &self,
        _repo: &RepoRef,
        pull: &NewPullRequest,
    ) -> Result<PullRequest> {
        let mut state = self.record(Op::CreatePullRequest, Call::CreatePullRequest(pull.clone()))?;
        let number = state.next_pull;
        state.next_pull += 1;
        state
            .open_pulls
            .insert(number, (pull.head.clone(), pull.base.clone()));
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/fake/homebrew-app/pull/{number}"),
        })
    }

    async fn merge_pull_request(&self, _repo: &RepoRef, number: u64) -> Result<()> {
        let mut state = self.record(Op::MergePullRequest, Call::MergePullRequest(number))?;
        let (head, base) = state
            .open_pulls
            .remove(&number)
            .ok_or_else(|| not_found("merge pull request", number.to_string()))?;
        let files = state.branches.get(&head).cloned().unwrap_or_default();
        state.branches.insert(base, files);
        Ok(())
    }

    async fn close_pull_request(&self, _repo: &RepoRef, number: u64) -> Result<()> {
        let mut state = self.record(Op::ClosePullRequest, Call::ClosePullRequest(number))?;
        state.open_pulls.remove(&number);
        Ok(())
    }

    async fn get_file(&self, repo: &RepoRef, branch: &str, path: &str) -> Result<FileContent> {
        let state = self.record(
            Op::GetFile,
            Call::GetFile {
                branch: branch.to_string(),
                path: path.to_string(),
            },
        )?;
        if state.tap.as_ref().is_some_and(|tap| tap != repo) {
            return Err(not_found("get file", format!("{repo}@{branch}:{path}")));
        }
        let content = state
            .branches
            .get(branch)
            .and_then(|files| files.get(path))
            .ok_or_else(|| not_found("get file", format!("{branch}:{path}")))?;
        Ok(FileContent {
            path: path.to_string(),
            sha: blob_sha(content),
            encoding: "base64".to_string(),
            content: encode_wrapped(content),
        })
    }

    async fn create_file(&self, _repo: &RepoRef, change: &FileChange) -> Result<()> {
        let mut state = self.record(
            Op::CreateFile,
            Call::CreateFile {
                branch: change.branch.clone(),
                path: change.path.clone(),
                message: change.message.clone(),
            },
        )?;
        state
            .branches
            .entry(change.branch.clone())
            .or_default()
            .insert(
                change.path.clone(),
                String::from_utf8_lossy(&change.content).into_owned(),
            );
        Ok(())
    }

    async fn update_file(&self, _repo: &RepoRef, change: &FileChange, sha: &str) -> Result<()> {
        let mut state = self.record(
            Op::UpdateFile,
            Call::UpdateFile {
                branch: change.branch.clone(),
                path: change.path.clone(),
                message: change.message.clone(),
                sha: sha.to_string(),
            },
        )?;
        let files = state
            .branches
            .get_mut(&change.branch)
            .ok_or_else(|| not_found("update file", change.branch.clone()))?;
        let current = files
            .get(&change.path)
            .ok_or_else(|| not_found("update file", change.path.clone()))?;
        if blob_sha(current) != sha {
            return Err(Error::api("update file", change.path.clone(), Some(409), "sha mismatch"));
        }
        files.insert(
            change.path.clone(),
            String::from_utf8_lossy(&change.content).into_owned(),
        );
        Ok(())
    }

    async fn delete_file(
        &self,
        _repo: &RepoRef,
        branch: &str,
        path: &str,
        _message: &str,
        _sha: &str,
    ) -> Result<()> {
        let mut state = self.record(
            Op::DeleteFile,
            Call::DeleteFile {
                branch: branch.to_string(),
                path: path.to_string(),
            },
        )?;
        state
            .branches
            .get_mut(branch)
            .and_then(|files| files.remove(path))
            .map(|_| ())
            .ok_or_else(|| not_found("delete file", format!("{branch}:{path}")))
    }

    async fn create_repository(&self, new: &NewRepository) -> Result<Repository> {
        self.record(Op::CreateRepository, Call::CreateRepository(new.clone()))?;
        let owner = new.org.clone().unwrap_or_else(|| "fake-user".to_string());
        let full_name = format!("{owner}/{}", new.name);
        Ok(Repository {
            html_url: format!("https://github.com/{full_name}"),
            full_name,
        })
    }

    async fn delete_repository(&self, repo: &RepoRef) -> Result<()> {
        self.record(Op::DeleteRepository, Call::DeleteRepository(repo.clone()))?;
        Ok(())
    }
}
