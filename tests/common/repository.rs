//! Git repository management and setup utilities
//!
//! Builds throwaway repositories with a known history for the git provider
//! and CLI tests.

#![allow(dead_code)]

use git_timeline::core::error::{Result, TimelineError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test repository. The TempDir must be kept alive for the duration of the
/// test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sets up a fresh git repository with user config, and no commits.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Repository with three commits:
///
/// 0. "Initial commit": README.md
/// 1. "Add library": src/lib.rs, README.md changed
/// 2. "Add store module": src/core/store.rs, src/lib.rs changed
pub fn setup_history_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "README.md", "# Demo\n")?;
    commit_all(&repo.path, "Initial commit")?;

    create_file(&repo.path, "README.md", "# Demo\n\nNow with code.\n")?;
    create_file(&repo.path, "src/lib.rs", "pub mod core;\n")?;
    commit_all(&repo.path, "Add library")?;

    create_file(&repo.path, "src/lib.rs", "pub mod core;\npub mod store;\n")?;
    create_file(&repo.path, "src/core/store.rs", "pub struct Store;\n")?;
    commit_all(&repo.path, "Add store module")?;

    Ok(repo)
}

/// Creates a file (and its parent directories) in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Stages everything and commits it with the given message
pub fn commit_all(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["add", "."])?;
    git(repo_path, &["commit", "-m", message])
}

fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    if !output.status.success() {
        return Err(TimelineError::provider_failed(
            format!("git {}", args.join(" ")),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(())
}
