//! Compilation options

use crate::catalog::Catalog;
use crate::compiler::{SuiteCompiler, SuiteManifest};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use suite_version::{DEFAULT_VCS_TIMEOUT, VersionResolver};

/// Overlay file name looked up under the install root.
pub const DEFAULT_OVERLAY_FILE: &str = ".env";

/// Inputs of one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    install_root: PathBuf,
    overlay: Option<PathBuf>,
    catalog: Option<PathBuf>,
    vcs_timeout: Duration,
}

impl CompileOptions {
    /// Options for `install_root` with every other setting at its default.
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            overlay: None,
            catalog: None,
            vcs_timeout: DEFAULT_VCS_TIMEOUT,
        }
    }

    /// Use this overlay file instead of `<root>/.env`.
    pub fn with_overlay(mut self, path: impl Into<PathBuf>) -> Self {
        self.overlay = Some(path.into());
        self
    }

    /// Use this catalog file instead of the built-in one.
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    pub fn with_vcs_timeout(mut self, timeout: Duration) -> Self {
        self.vcs_timeout = timeout;
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Overlay path in effect.
    pub fn overlay_path(&self) -> PathBuf {
        self.overlay
            .clone()
            .unwrap_or_else(|| self.install_root.join(DEFAULT_OVERLAY_FILE))
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.as_deref()
    }

    pub fn vcs_timeout(&self) -> Duration {
        self.vcs_timeout
    }

    /// The catalog these options select.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::builtin(),
        }
    }

    /// A compiler configured from these options.
    pub fn compiler(&self) -> Result<SuiteCompiler> {
        Ok(SuiteCompiler::new(
            self.load_catalog()?,
            VersionResolver::new(self.vcs_timeout),
        ))
    }
}

/// Compile the suite described by `options`.
pub fn compile(options: &CompileOptions) -> Result<SuiteManifest> {
    let compiler = options.compiler()?;
    let overlay = options.overlay_path();
    compiler.compile_with_source(options.install_root(), Some(overlay.as_path()))
}
