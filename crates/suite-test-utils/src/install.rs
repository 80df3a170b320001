//! [`TestInstall`] builder for a throwaway install root.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary install root holding one directory per service project.
///
/// # Example
///
/// ```rust,no_run
/// use suite_test_utils::install::TestInstall;
///
/// let install = TestInstall::new();
/// install.pyproject("automagik-spark", "1.2.3");
/// install.overlay("AUTOMAGIK_SPARK_API_PORT=9000\n");
/// ```
pub struct TestInstall {
    temp_dir: TempDir,
}

impl Default for TestInstall {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInstall {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Absolute path of the install root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create (if needed) and return a project directory under the root.
    pub fn project(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("TestInstall: failed to create {}: {e}", dir.display()));
        dir
    }

    /// Write `content` to `rel` under the root, creating parents.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestInstall: failed to write {}: {e}", path.display()));
        path
    }

    /// `pyproject.toml` with a static `[project]` version.
    pub fn pyproject(&self, project: &str, version: &str) -> PathBuf {
        self.write(
            &format!("{project}/pyproject.toml"),
            &format!("[project]\nname = \"{project}\"\nversion = \"{version}\"\n"),
        )
    }

    /// `src/__init__.py` declaring `__version__`.
    pub fn src_marker(&self, project: &str, version: &str) -> PathBuf {
        self.write(
            &format!("{project}/src/__init__.py"),
            &format!("__version__ = \"{version}\"\n"),
        )
    }

    /// `<package>/__init__.py` declaring `__version__`, where `package` is
    /// the already-normalized folder name.
    pub fn package_marker(&self, project: &str, package: &str, version: &str) -> PathBuf {
        self.write(
            &format!("{project}/{package}/__init__.py"),
            &format!("__version__ = \"{version}\"\n"),
        )
    }

    /// `package.json` with a `version` property.
    pub fn package_json(&self, project: &str, version: &str) -> PathBuf {
        self.write(
            &format!("{project}/package.json"),
            &format!("{{\"name\": \"{project}\", \"version\": \"{version}\"}}\n"),
        )
    }

    /// The default overlay file, `<root>/.env`.
    pub fn overlay(&self, content: &str) -> PathBuf {
        self.write(".env", content)
    }
}
