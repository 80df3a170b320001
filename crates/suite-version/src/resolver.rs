//! The ordered strategy chain
//!
//! ```text
//!   pyproject ─> src-marker ─> package-marker ─> package-json ─> vcs ─> "unknown"
//!   (python)     (python)      (python)          (node)          (all)
//! ```
//!
//! The first strategy that applies to the ecosystem and reports a version
//! wins. Nothing after it is probed.

use crate::source::{Ecosystem, UNKNOWN_VERSION, VersionStrategy, first_success};
use crate::strategy::{
    GitCli, PackageJsonStrategy, PackageMarkerStrategy, PyprojectStrategy, RevisionQuery,
    SourceMarkerStrategy, VcsStrategy,
};
use std::path::Path;
use std::time::Duration;

/// Best-effort version lookup for a project directory.
///
/// [`resolve`](Self::resolve) never fails; it returns [`UNKNOWN_VERSION`]
/// once every applicable strategy is exhausted.
pub struct VersionResolver {
    strategies: Vec<Box<dyn VersionStrategy>>,
}

impl VersionResolver {
    /// Standard chain with the `git` CLI bounded by `vcs_timeout`.
    pub fn new(vcs_timeout: Duration) -> Self {
        Self::with_revision_query(GitCli::new(vcs_timeout))
    }

    /// Standard chain with a caller-supplied revision source.
    pub fn with_revision_query(query: impl RevisionQuery + 'static) -> Self {
        Self::with_strategies(vec![
            Box::new(PyprojectStrategy::new()),
            Box::new(SourceMarkerStrategy::new()),
            Box::new(PackageMarkerStrategy::new()),
            Box::new(PackageJsonStrategy::new()),
            Box::new(VcsStrategy::new(query)),
        ])
    }

    /// Arbitrary chain, probed in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn VersionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in chain order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, project_dir: &Path, ecosystem: Ecosystem) -> String {
        let applicable = self
            .strategies
            .iter()
            .filter(|s| s.applies_to(ecosystem))
            .map(|s| &**s);

        match first_success(applicable, project_dir) {
            Some((strategy, version)) => {
                tracing::debug!(
                    strategy,
                    %ecosystem,
                    dir = %project_dir.display(),
                    version = %version,
                    "Resolved version"
                );
                version
            }
            None => {
                tracing::warn!(
                    %ecosystem,
                    dir = %project_dir.display(),
                    "No version source found, using sentinel"
                );
                UNKNOWN_VERSION.to_string()
            }
        }
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::with_revision_query(GitCli::default())
    }
}

impl std::fmt::Debug for VersionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionResolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
