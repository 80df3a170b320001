//! The version command

use std::path::Path;
use std::time::Duration;
use suite_version::{Ecosystem, VersionResolver};

use super::canonical_dir;
use crate::error::Result;

/// Resolve the version of one project directory.
pub fn resolve_version(dir: &Path, ecosystem: Ecosystem, vcs_timeout: Duration) -> Result<String> {
    let dir = canonical_dir(dir, "Project directory")?;
    Ok(VersionResolver::new(vcs_timeout).resolve(&dir, ecosystem))
}

/// Run the version command
pub fn run_version(dir: &Path, ecosystem: Ecosystem, vcs_timeout: Duration) -> Result<()> {
    println!("{}", resolve_version(dir, ecosystem, vcs_timeout)?);
    Ok(())
}
