//! Strategy trait and the tagged result every strategy returns

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version reported when every strategy comes up empty.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Outcome of a single version strategy.
///
/// A file that exists but cannot be parsed is `NotFound` for that strategy;
/// nothing here is ever fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSourceResult {
    Found(String),
    NotFound,
}

impl VersionSourceResult {
    /// Wrap an optional match, discarding blank values.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Found(v.trim().to_string()),
            _ => Self::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound => None,
        }
    }
}

/// Language ecosystem hint declared by a service.
///
/// Decides which strategies are consulted for a project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Python,
    Node,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Node => "node",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "node" => Ok(Self::Node),
            other => Err(format!("unknown ecosystem '{other}' (expected python or node)")),
        }
    }
}

/// One self-contained way of extracting a version from a project directory.
///
/// Implementations must be pure reads and must swallow their own errors.
pub trait VersionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy is consulted for the given ecosystem.
    fn applies_to(&self, ecosystem: Ecosystem) -> bool;

    fn probe(&self, project_dir: &Path) -> VersionSourceResult;
}

/// Run strategies in order and return the first hit.
///
/// Later strategies are not probed once one succeeds.
pub fn first_success<'a, I, S>(strategies: I, project_dir: &Path) -> Option<(&'static str, String)>
where
    I: IntoIterator<Item = &'a S>,
    S: VersionStrategy + ?Sized + 'a,
{
    for strategy in strategies {
        if let VersionSourceResult::Found(version) = strategy.probe(project_dir) {
            return Some((strategy.name(), version));
        }
        tracing::debug!(
            strategy = strategy.name(),
            dir = %project_dir.display(),
            "No version from strategy"
        );
    }
    None
}
