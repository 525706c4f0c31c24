//! Contract with the external repository-data provider.
//!
//! The store never reads version-control data itself. It sends one of four
//! [`ProviderRequest`]s and receives a JSON payload in the provider's wire
//! format (see [`crate::core::api`]).

use crate::core::error::Result;
use serde_json::Value;
use std::future::Future;

/// The four operations a provider answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    /// Open the repository at a local path. Must succeed before any other call.
    OpenRepository { path: String },
    /// Warm the provider-side cache; answers with the total commit count.
    PrepareCache,
    /// First page when `after_commit_id` is `None`, otherwise the page after that id.
    GetCommits { after_commit_id: Option<String> },
    /// Full detail, including the file tree, for one commit.
    GetCommitDetails { commit_id: String },
}

impl ProviderRequest {
    /// Command name used in logs and error messages.
    pub fn command(&self) -> &'static str {
        match self {
            Self::OpenRepository { .. } => "open_repository",
            Self::PrepareCache => "prepare_cache",
            Self::GetCommits { .. } => "get_commits",
            Self::GetCommitDetails { .. } => "get_commit_details",
        }
    }
}

/// A backend that owns the actual repository data.
///
/// Implementations resolve each request with a JSON value or reject it with a
/// [`crate::core::error::TimelineError`]; they must never leave a request pending forever.
pub trait RepositoryProvider: Send + Sync {
    fn invoke(&self, request: ProviderRequest) -> impl Future<Output = Result<Value>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        let open = ProviderRequest::OpenRepository {
            path: "/tmp/repo".to_string(),
        };
        assert_eq!(open.command(), "open_repository");
        assert_eq!(ProviderRequest::PrepareCache.command(), "prepare_cache");
        assert_eq!(
            ProviderRequest::GetCommits {
                after_commit_id: None
            }
            .command(),
            "get_commits"
        );
        assert_eq!(
            ProviderRequest::GetCommitDetails {
                commit_id: "abc".to_string()
            }
            .command(),
            "get_commit_details"
        );
    }
}
