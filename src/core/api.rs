//! Wire shapes exchanged with a repository provider.
//!
//! Providers answer with snake_case JSON (`commit_id`, `file_structure`,
//! `object_id`, `relative_root_path`, `is_directory`). The functions here are
//! the only place those shapes are decoded and translated into
//! [`crate::core::model`] entities.

use crate::core::{
    error::{Result, TimelineError},
    model::{CommitFrame, CommitSummary, FileBlob, FileTree},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page of commits as returned by `get_commits`: `(commit_id, commit_message)` pairs.
pub type ApiRepositoryResponse = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFileBlob {
    pub object_id: String,
    pub relative_root_path: String,
    pub name: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFileTree {
    pub object_id: String,
    pub blobs: Vec<ApiFileBlob>,
}

/// Full commit detail as returned by `get_commit_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCommitFrame {
    pub commit_id: String,
    pub commit_message: String,
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_structure: Option<ApiFileTree>,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// Type guard: a commit frame response must be an object carrying `commit_id`.
pub fn is_api_commit_frame(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("commit_id"))
}

impl From<ApiFileBlob> for FileBlob {
    fn from(blob: ApiFileBlob) -> Self {
        Self {
            id: blob.object_id.clone(),
            object_id: blob.object_id,
            relative_root_path: blob.relative_root_path,
            name: blob.name,
            is_directory: blob.is_directory,
        }
    }
}

impl From<ApiFileTree> for FileTree {
    fn from(tree: ApiFileTree) -> Self {
        Self {
            object_id: tree.object_id,
            blobs: tree.blobs.into_iter().map(FileBlob::from).collect(),
        }
    }
}

impl From<ApiCommitFrame> for CommitFrame {
    fn from(frame: ApiCommitFrame) -> Self {
        Self {
            commit_id: frame.commit_id,
            commit_message: frame.commit_message,
            file_tree: frame.file_structure.map(FileTree::from),
            time: Some(frame.time),
        }
    }
}

/// Decode a `get_commit_details` response into a [`CommitFrame`].
///
/// Responses failing the type guard, or carrying fields of the wrong type,
/// are rejected with [`TimelineError::MalformedResponse`].
pub fn decode_commit_frame(command: &str, value: Value) -> Result<CommitFrame> {
    if !is_api_commit_frame(&value) {
        return Err(TimelineError::malformed_response(
            command,
            "response has no commit_id",
        ));
    }
    let frame: ApiCommitFrame = serde_json::from_value(value)
        .map_err(|e| TimelineError::malformed_response(command, e.to_string()))?;
    Ok(frame.into())
}

/// Decode a `get_commits` page.
pub fn decode_commit_page(command: &str, value: Value) -> Result<Vec<CommitSummary>> {
    let page: ApiRepositoryResponse = serde_json::from_value(value)
        .map_err(|e| TimelineError::malformed_response(command, e.to_string()))?;
    Ok(page.into_iter().map(CommitSummary::from).collect())
}

/// Decode the commit count returned by `prepare_cache`.
pub fn decode_commit_count(command: &str, value: Value) -> Result<usize> {
    let count = value
        .as_u64()
        .ok_or_else(|| TimelineError::malformed_response(command, "expected a commit count"))?;
    usize::try_from(count)
        .map_err(|_| TimelineError::malformed_response(command, format!("commit count {count} is too large")))
}
