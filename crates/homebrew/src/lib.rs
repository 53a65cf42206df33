// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

//! Homebrew formula workflows for ghbr.
//!
//! This crate drives a formula repository (`<owner>/homebrew-<app>`) off an
//! application's GitHub Releases:
//!
//! - [`ReleaseResolver`] finds the macOS asset of the latest release and
//!   computes its SHA-256
//! - [`FormulaUpdater`] moves an existing formula to a new release through a
//!   branch, commit and pull request, rolling back on failure
//! - [`FormulaBootstrapper`] creates a new formula repository
//!
//! # Example
//!
//! ```rust,ignore
//! use ghbr_github::{OctocrabClient, RepoRef};
//! use ghbr_homebrew::{FormulaTarget, FormulaUpdater, ReleaseResolver, UpdateRequest};
//!
//! let github = OctocrabClient::new(token)?;
//! let release = ReleaseResolver::new(&github)?
//!     .resolve(&RepoRef::new("owner", "app"))
//!     .await?;
//!
//! let outcome = FormulaUpdater::new(&github)
//!     .update(&UpdateRequest {
//!         target: FormulaTarget::for_app("owner", None, "app"),
//!         branch: "master".to_string(),
//!         release,
//!         force: false,
//!         merge: true,
//!     })
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

mod banner;
mod bootstrap;
pub mod error;
mod formula;
mod resolver;
mod updater;

pub use banner::BannerFont;
pub use bootstrap::{CreateOutcome, CreateRequest, DEFAULT_BRANCH, FormulaBootstrapper};
pub use error::{Error, Result};
pub use formula::{FormulaData, FormulaDocument, FormulaField, FormulaGenerator};
pub use resolver::{AssetMatcher, ReleaseInfo, ReleaseResolver};
pub use updater::{
    FormulaTarget, FormulaUpdater, UpdateOutcome, UpdateRequest, UpdateState, branch_name,
    commit_message,
};
