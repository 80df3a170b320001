//! Short revision of the checked-out commit
//!
//! The `git` CLI is invoked as a subprocess and bounded by a timeout so an
//! unreachable or hung repository cannot stall compilation.

use super::settle;
use crate::error::{Error, Result};
use crate::source::{Ecosystem, VersionSourceResult, VersionStrategy};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Prefix distinguishing a revision from a semantic version.
pub const VCS_PREFIX: &str = "git-";

/// Default bound on a single revision query.
pub const DEFAULT_VCS_TIMEOUT: Duration = Duration::from_secs(5);

const REV_PARSE_ARGS: [&str; 3] = ["rev-parse", "--short", "HEAD"];

/// Source of the short revision identifier for a directory.
pub trait RevisionQuery: Send + Sync {
    /// `Ok(None)` when the directory simply has no revision to report.
    fn short_revision(&self, project_dir: &Path) -> Result<Option<String>>;
}

/// Runs `git rev-parse --short HEAD`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    /// Use a different executable in place of `git`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_line(&self) -> String {
        format!("{} {}", self.program, REV_PARSE_ARGS.join(" "))
    }

    async fn run(&self, project_dir: &Path) -> Result<Option<String>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(REV_PARSE_ARGS)
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| Error::Spawn {
                command: self.command_line(),
                source: e,
            })?,
            Err(_) => {
                return Err(Error::Timeout {
                    command: self.command_line(),
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.command_line(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!revision.is_empty()).then_some(revision))
    }
}

impl GitCli {
    fn block_on_run(&self, project_dir: &Path) -> Result<Option<String>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Spawn {
                command: self.command_line(),
                source: e,
            })?;
        runtime.block_on(self.run(project_dir))
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_VCS_TIMEOUT)
    }
}

impl RevisionQuery for GitCli {
    /// Blocks until the query finishes or times out.
    ///
    /// Inside an existing tokio runtime the query runs on a scoped thread
    /// with its own runtime, since the caller's runtime cannot be blocked on.
    fn short_revision(&self, project_dir: &Path) -> Result<Option<String>> {
        if !project_dir.is_dir() {
            return Ok(None);
        }

        if tokio::runtime::Handle::try_current().is_ok() {
            std::thread::scope(|scope| {
                scope
                    .spawn(|| self.block_on_run(project_dir))
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
        } else {
            self.block_on_run(project_dir)
        }
    }
}

/// Reports `git-<short revision>` for the project directory.
pub struct VcsStrategy {
    query: Box<dyn RevisionQuery>,
}

impl VcsStrategy {
    pub fn new(query: impl RevisionQuery + 'static) -> Self {
        Self {
            query: Box::new(query),
        }
    }
}

impl Default for VcsStrategy {
    fn default() -> Self {
        Self::new(GitCli::default())
    }
}

impl VersionStrategy for VcsStrategy {
    fn name(&self) -> &'static str {
        "vcs"
    }

    fn applies_to(&self, _ecosystem: Ecosystem) -> bool {
        true
    }

    fn probe(&self, project_dir: &Path) -> VersionSourceResult {
        let outcome = self
            .query
            .short_revision(project_dir)
            .map(|rev| rev.map(|rev| format!("{VCS_PREFIX}{rev}")));
        settle(self.name(), outcome)
    }
}
