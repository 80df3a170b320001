//! Command implementations for suite-cli

pub mod compile;
pub mod list;
pub mod version;

pub use compile::{CompileArgs, run_compile};
pub use list::run_list;
pub use version::run_version;

use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use suite_core::Catalog;

/// Canonical absolute form of a user-supplied directory.
pub(crate) fn canonical_dir(path: &Path, what: &str) -> Result<PathBuf> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        CliError::user(format!("{what} '{}' is not accessible: {e}", path.display()))
    })?;
    if !canonical.is_dir() {
        return Err(CliError::user(format!(
            "{what} '{}' is not a directory",
            path.display()
        )));
    }
    Ok(canonical)
}

/// The catalog at `path`, or the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    Ok(match path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    })
}
