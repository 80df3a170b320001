//! Git repository fixtures.
//!
//! Repositories are created with `git2`, so building a fixture never needs
//! the `git` binary. Reading the revision back through the CLI does; check
//! [`git_available`] first and skip when it returns `false`.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Whether a usable `git` executable is on `PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Initialise an empty repository (no commits, so `HEAD` is unborn).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn empty_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "empty_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialise a repository and commit everything under `path`.
///
/// A `README.md` is written first so the commit is never empty. Returns the
/// abbreviated id of the new commit, as `git rev-parse --short HEAD` would
/// print it.
///
/// # Panics
/// Panics if any git operation fails.
pub fn git_repo_with_commit(path: &Path) -> String {
    let repo = empty_git_repo(path);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("git_repo_with_commit: failed to write README.md: {e}"));

    let mut index = repo.index().expect("git_repo_with_commit: no index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("git_repo_with_commit: add_all failed");
    index.write().expect("git_repo_with_commit: index write failed");
    let tree_id = index.write_tree().expect("git_repo_with_commit: write_tree failed");
    let tree = repo.find_tree(tree_id).expect("git_repo_with_commit: tree missing");

    let sig = git2::Signature::now("Test User", "test@test.com")
        .expect("git_repo_with_commit: bad signature");
    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("git_repo_with_commit: commit failed");

    let object = repo
        .find_object(oid, None)
        .expect("git_repo_with_commit: commit object missing");
    let short = object
        .short_id()
        .expect("git_repo_with_commit: short_id failed");
    short
        .as_str()
        .expect("git_repo_with_commit: short id is not UTF-8")
        .to_string()
}
