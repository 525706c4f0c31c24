//! Entity shapes held by the store.
//!
//! These are the internal, already-translated records. Wire shapes coming from a
//! provider live in [`crate::core::api`] and are converted at that boundary.

use serde::{Deserialize, Serialize};

/// One file or directory inside a [`FileTree`].
///
/// `id` and `object_id` carry the same opaque value; `relative_root_path` is
/// the containing directory (empty at the root) and `name` the final segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub id: String,
    pub object_id: String,
    pub relative_root_path: String,
    pub name: String,
    pub is_directory: bool,
}

impl FileBlob {
    /// Full path of the blob under the tree root, segments joined by `/`.
    pub fn path(&self) -> String {
        if self.relative_root_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.relative_root_path, self.name)
        }
    }

    /// Directory of the blob as path segments.
    pub fn parent_segments(&self) -> Vec<&str> {
        self.relative_root_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

/// Flat listing of the working tree at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
    pub object_id: String,
    pub blobs: Vec<FileBlob>,
}

impl FileTree {
    /// Blobs whose parent directory is exactly `segments` (`[]` = tree root).
    ///
    /// Directories sort before files, then by name.
    pub fn entries_in(&self, segments: &[String]) -> Vec<&FileBlob> {
        let mut entries: Vec<&FileBlob> = self
            .blobs
            .iter()
            .filter(|blob| {
                let parent = blob.parent_segments();
                parent.len() == segments.len()
                    && parent.iter().zip(segments).all(|(a, b)| *a == b.as_str())
            })
            .collect();
        entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Whether `segments` names a directory present in this tree.
    pub fn has_directory(&self, segments: &[String]) -> bool {
        match segments.split_last() {
            None => true,
            Some((name, parent)) => self
                .entries_in(parent)
                .iter()
                .any(|blob| blob.is_directory && &blob.name == name),
        }
    }
}

/// Lightweight commit record as returned by pagination: `(id, message)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub commit_id: String,
    pub commit_message: String,
}

impl From<(String, String)> for CommitSummary {
    fn from((commit_id, commit_message): (String, String)) -> Self {
        Self {
            commit_id,
            commit_message,
        }
    }
}

/// One historical snapshot known to the store.
///
/// `file_tree` and `time` are only filled in for a frame returned by a detail
/// fetch; the paginated catalog never carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFrame {
    pub commit_id: String,
    pub commit_message: String,
    pub file_tree: Option<FileTree>,
    /// Commit time, seconds since the epoch.
    pub time: Option<i64>,
}

impl From<CommitSummary> for CommitFrame {
    fn from(summary: CommitSummary) -> Self {
        Self {
            commit_id: summary.commit_id,
            commit_message: summary.commit_message,
            file_tree: None,
            time: None,
        }
    }
}

impl CommitFrame {
    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.commit_message.lines().next().unwrap_or("")
    }

    /// Abbreviated commit id for display.
    pub fn short_id(&self) -> &str {
        let end = self
            .commit_id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.commit_id.len());
        &self.commit_id[..end]
    }
}
