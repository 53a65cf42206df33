//! GitHub operations for ghbr.
//!
//! This crate provides the [`GitHub`] capability trait used by the formula
//! workflows, and [`OctocrabClient`], its implementation over the GitHub REST
//! API.
//!
//! # Example
//!
//! ```rust,ignore
//! use ghbr_github::{GitHub, OctocrabClient, RepoRef};
//!
//! let client = OctocrabClient::new("ghp_xxx")?;
//! let release = client.latest_release(&RepoRef::new("owner", "app")).await?;
//! println!("{}", release.tag_name);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

mod client;
mod error;
mod models;
mod octocrab_client;
pub mod remote;

pub use client::GitHub;
pub use error::{Error, Result};
pub use models::{
    FileChange, FileContent, NewPullRequest, NewRepository, PullRequest, Release, ReleaseAsset,
    RepoRef, Repository,
};
pub use octocrab_client::OctocrabClient;
