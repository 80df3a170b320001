//! Shared test utilities for the suite-manifest workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git repository fixtures
//! - [`install`] - [`TestInstall`](install::TestInstall) builder for a fake install root

pub mod git;
pub mod install;
