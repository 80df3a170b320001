//! `__version__` assignments in package marker files

use super::{read_optional, settle};
use crate::source::{Ecosystem, VersionSourceResult, VersionStrategy};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const MARKER_FILE: &str = "__init__.py";

static VERSION_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__version__\s*=\s*["']([^"']+)["']"#).unwrap());

fn extract(content: &str) -> Option<String> {
    VERSION_ASSIGNMENT
        .captures(content)
        .map(|caps| caps[1].to_string())
}

fn probe_marker(strategy: &'static str, path: &Path) -> VersionSourceResult {
    let outcome = read_optional(path).map(|content| content.as_deref().and_then(extract));
    settle(strategy, outcome)
}

/// Derive the importable package folder from a project directory name.
///
/// Every character that is not ASCII alphanumeric becomes `_`, so
/// `am-agents-labs` maps to `am_agents_labs`.
pub fn normalize_package_name(dir_name: &str) -> String {
    dir_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `src/__init__.py`
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceMarkerStrategy;

impl SourceMarkerStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn marker_path(project_dir: &Path) -> PathBuf {
        project_dir.join("src").join(MARKER_FILE)
    }
}

impl VersionStrategy for SourceMarkerStrategy {
    fn name(&self) -> &'static str {
        "src-marker"
    }

    fn applies_to(&self, ecosystem: Ecosystem) -> bool {
        ecosystem == Ecosystem::Python
    }

    fn probe(&self, project_dir: &Path) -> VersionSourceResult {
        probe_marker(self.name(), &Self::marker_path(project_dir))
    }
}

/// `<package>/__init__.py`, with the package named after the project directory
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageMarkerStrategy;

impl PackageMarkerStrategy {
    pub fn new() -> Self {
        Self
    }

    /// `None` when the directory has no usable base name (e.g. `/`).
    pub fn marker_path(project_dir: &Path) -> Option<PathBuf> {
        let base = project_dir.file_name()?.to_str()?;
        Some(project_dir.join(normalize_package_name(base)).join(MARKER_FILE))
    }
}

impl VersionStrategy for PackageMarkerStrategy {
    fn name(&self) -> &'static str {
        "package-marker"
    }

    fn applies_to(&self, ecosystem: Ecosystem) -> bool {
        ecosystem == Ecosystem::Python
    }

    fn probe(&self, project_dir: &Path) -> VersionSourceResult {
        match Self::marker_path(project_dir) {
            Some(path) => probe_marker(self.name(), &path),
            None => VersionSourceResult::NotFound,
        }
    }
}
