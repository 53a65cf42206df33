// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

//! ghbr - Homebrew formulas driven by GitHub Releases
//!
//! The binary wires three pieces together:
//!
//! - [`cli`] parses flags and maps errors to exit codes
//! - [`config`] resolves the token, owner, repository and branch from flags,
//!   `git config` and `~/.config/ghbr/config.toml`
//! - [`commands`] runs `create`, `release` and `version` on top of
//!   `ghbr-homebrew`

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// CLI argument parsing and exit codes.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Configuration resolution.
pub mod config;
/// Tracing setup.
pub mod tracing;
