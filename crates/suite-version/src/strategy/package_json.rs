//! `version` property of `package.json`

use super::settle;
use crate::error::{Error, Result};
use crate::source::{Ecosystem, VersionSourceResult, VersionStrategy};
use serde::Deserialize;
use std::path::Path;

pub const PACKAGE_JSON_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    version: Option<serde_json::Value>,
}

/// Reads the declared version of a Node package.
///
/// Only a non-empty string counts; numbers, objects and empty strings are
/// treated as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageJsonStrategy;

impl PackageJsonStrategy {
    pub fn new() -> Self {
        Self
    }

    fn read(path: &Path) -> Result<Option<String>> {
        let Some(content) = super::read_optional(path)? else {
            return Ok(None);
        };
        let manifest: PackageManifest = serde_json::from_str(&content).map_err(|e| Error::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(manifest
            .version
            .and_then(|v| v.as_str().map(String::from))
            .filter(|v| !v.is_empty()))
    }
}

impl VersionStrategy for PackageJsonStrategy {
    fn name(&self) -> &'static str {
        "package-json"
    }

    fn applies_to(&self, ecosystem: Ecosystem) -> bool {
        ecosystem == Ecosystem::Node
    }

    fn probe(&self, project_dir: &Path) -> VersionSourceResult {
        settle(self.name(), Self::read(&project_dir.join(PACKAGE_JSON_FILE)))
    }
}
