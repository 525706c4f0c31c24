//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`TimelineError`] which covers every failure the store,
//! the provider boundary and the CLI can report. It uses `thiserror` for
//! ergonomic error definitions and includes constructors for the common cases.
//!
//! # Public API
//! - [`TimelineError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, TimelineError>`
//!
//! # Error Categories
//! - **Provider calls**: rejected requests and malformed responses
//! - **Navigation**: viewer or commit indices that do not exist
//! - **Git operations**: git2 library errors, unknown commit ids
//! - **Configuration**: I/O and JSON errors while reading or writing config

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-timeline
#[derive(Error, Debug)]
pub enum TimelineError {
    // Provider errors
    #[error("Provider request '{command}' failed: {message}")]
    ProviderFailed { command: String, message: String },

    #[error("Malformed response to '{command}': {reason}")]
    MalformedResponse { command: String, reason: String },

    #[error("No repository has been opened")]
    RepositoryNotOpen,

    #[error("Repository has no commits")]
    EmptyRepository,

    // Navigation errors
    #[error("File tree viewer {index} does not exist ({count} open)")]
    ViewerOutOfRange { index: usize, count: usize },

    #[error("Commit {index} is out of range ({loaded} loaded)")]
    CommitOutOfRange { index: usize, loaded: usize },

    // Git repository errors
    #[error("Not in a git repository: {path}")]
    NotInGitRepo { path: PathBuf },

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Unknown commit id: {commit_id}")]
    UnknownCommit { commit_id: String },

    // Configuration errors
    #[error("Could not find configuration directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using TimelineError
pub type Result<T> = std::result::Result<T, TimelineError>;

impl TimelineError {
    /// Create a provider failure for the named command
    pub fn provider_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error for the named command
    pub fn malformed_response(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn viewer_out_of_range(index: usize, count: usize) -> Self {
        Self::ViewerOutOfRange { index, count }
    }

    pub fn commit_out_of_range(index: usize, loaded: usize) -> Self {
        Self::CommitOutOfRange { index, loaded }
    }

    pub fn not_in_git_repo(path: impl Into<PathBuf>) -> Self {
        Self::NotInGitRepo { path: path.into() }
    }

    pub fn unknown_commit(commit_id: impl Into<String>) -> Self {
        Self::UnknownCommit {
            commit_id: commit_id.into(),
        }
    }

    /// Create a config read failed error
    pub fn config_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a config parse failed error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failed_display() {
        let err = TimelineError::provider_failed("prepare_cache", "disk on fire");
        assert_eq!(
            err.to_string(),
            "Provider request 'prepare_cache' failed: disk on fire"
        );
    }

    #[test]
    fn test_malformed_response_display() {
        let err = TimelineError::malformed_response("get_commit_details", "missing commit_id");
        assert!(err.to_string().contains("get_commit_details"));
        assert!(err.to_string().contains("missing commit_id"));
    }

    #[test]
    fn test_viewer_out_of_range_display() {
        let err = TimelineError::viewer_out_of_range(3, 1);
        assert_eq!(err.to_string(), "File tree viewer 3 does not exist (1 open)");
    }

    #[test]
    fn test_config_read_failed() {
        let path = std::path::PathBuf::from("/test/config.json");
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = TimelineError::config_read_failed(&path, io_err);
        assert!(err.to_string().contains("/test/config.json"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_config_parse_failed() {
        let path = std::path::PathBuf::from("/test/config.json");
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json").unwrap_err();
        let err = TimelineError::config_parse_failed(&path, json_err);
        assert!(err.to_string().contains("/test/config.json"));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
