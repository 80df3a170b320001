//! Layered version resolution for suite services
//!
//! A service's version is read from the first source that has one:
//! a static `pyproject.toml` field, a `__version__` marker file, a
//! `package.json` property, or the short git revision. When none of them
//! answer, the version is [`UNKNOWN_VERSION`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use suite_version::{Ecosystem, VersionResolver};
//!
//! let resolver = VersionResolver::new(Duration::from_secs(5));
//! let version = resolver.resolve(Path::new("/opt/automagik/automagik-spark"), Ecosystem::Python);
//! println!("{version}");
//! ```

pub mod error;
pub mod resolver;
pub mod source;
pub mod strategy;

pub use error::{Error, Result};
pub use resolver::VersionResolver;
pub use source::{Ecosystem, UNKNOWN_VERSION, VersionSourceResult, VersionStrategy, first_success};
pub use strategy::{
    DEFAULT_VCS_TIMEOUT, GitCli, PackageJsonStrategy, PackageMarkerStrategy, PyprojectStrategy,
    RevisionQuery, SourceMarkerStrategy, VCS_PREFIX, VcsStrategy, normalize_package_name,
};
