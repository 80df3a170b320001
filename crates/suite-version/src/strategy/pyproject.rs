//! Static `version` field in `pyproject.toml`

use super::{read_optional, settle};
use crate::source::{Ecosystem, VersionSourceResult, VersionStrategy};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const PYPROJECT_FILE: &str = "pyproject.toml";

static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*\[\[?\s*([A-Za-z0-9_.\-"' ]+?)\s*\]\]?\s*(#.*)?$"#).unwrap());

static SECTION_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*version\s*=\s*["']([^"']+)["']"#).unwrap());

static TOP_LEVEL_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^version\s*=\s*["']([^"']+)["']"#).unwrap());

/// Reads the statically declared version from `pyproject.toml`.
///
/// The `[project]` table is searched first. A `dynamic = ["version"]`
/// declaration has no literal to match and falls through to a scan of the
/// whole file for a line-start `version = "..."`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PyprojectStrategy;

impl PyprojectStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Extract a version from manifest text.
    pub fn extract(content: &str) -> Option<String> {
        if let Some(section) = project_section(content) {
            if let Some(caps) = SECTION_VERSION.captures(&section) {
                return Some(caps[1].to_string());
            }
        }
        TOP_LEVEL_VERSION
            .captures(content)
            .map(|caps| caps[1].to_string())
    }
}

/// Lines belonging to the `[project]` table, header excluded.
fn project_section(content: &str) -> Option<String> {
    let mut lines = content.lines();
    lines.by_ref().find(|line| {
        TABLE_HEADER
            .captures(line)
            .is_some_and(|caps| &caps[1] == "project" && !line.trim_start().starts_with("[["))
    })?;

    let body: Vec<&str> = lines.take_while(|line| !TABLE_HEADER.is_match(line)).collect();
    Some(body.join("\n"))
}

impl VersionStrategy for PyprojectStrategy {
    fn name(&self) -> &'static str {
        "pyproject"
    }

    fn applies_to(&self, ecosystem: Ecosystem) -> bool {
        ecosystem == Ecosystem::Python
    }

    fn probe(&self, project_dir: &Path) -> VersionSourceResult {
        let path = project_dir.join(PYPROJECT_FILE);
        let outcome = read_optional(&path).map(|content| content.as_deref().and_then(Self::extract));
        settle(self.name(), outcome)
    }
}
