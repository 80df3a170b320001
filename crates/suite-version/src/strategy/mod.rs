//! Built-in version strategies, in chain order

mod marker;
mod package_json;
mod pyproject;
mod vcs;

pub use marker::{PackageMarkerStrategy, SourceMarkerStrategy, normalize_package_name};
pub use package_json::PackageJsonStrategy;
pub use pyproject::PyprojectStrategy;
pub use vcs::{DEFAULT_VCS_TIMEOUT, GitCli, RevisionQuery, VCS_PREFIX, VcsStrategy};

use crate::error::{Error, Result};
use crate::source::VersionSourceResult;
use std::path::Path;

/// Read a file that may legitimately be absent.
///
/// Missing files are `Ok(None)`; anything else that goes wrong is an error
/// for the caller to downgrade.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| Error::io(path, e))
}

/// Turn a strategy's internal outcome into a result, logging failures.
pub(crate) fn settle(strategy: &'static str, outcome: Result<Option<String>>) -> VersionSourceResult {
    match outcome {
        Ok(value) => VersionSourceResult::from_option(value),
        Err(e) => {
            tracing::warn!(strategy, error = %e, "Version strategy failed");
            VersionSourceResult::NotFound
        }
    }
}
