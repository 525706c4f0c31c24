//! Point-in-time snapshot of everything the store tracks.
//!
//! Observers receive clones of [`StoreState`]; only
//! [`crate::core::store::RepositoryStore`] writes it.

use crate::core::{
    catalog::CommitCatalog,
    model::{CommitFrame, FileTree},
    path_cursor::PathCursor,
    playback::PlaySpeed,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    /// A repository is open and its first commit's tree has loaded.
    pub is_ready: bool,
    pub repository_path: Option<String>,

    pub current_commit_index: usize,
    pub current_object_id: Option<String>,
    /// `None` while the tree for the current commit is loading.
    pub current_file_tree: Option<FileTree>,
    pub current_commit_time: Option<i64>,

    pub catalog: CommitCatalog,
    pub is_fetching_commits: bool,

    pub is_playing: bool,
    pub play_speed: PlaySpeed,

    pub last_error_message: Option<String>,

    pub file_tree_viewers: Vec<PathCursor>,
}

impl StoreState {
    /// Fresh session defaults: nothing loaded, `viewers` cursors at the root.
    pub fn with_defaults(play_speed: PlaySpeed, viewers: usize) -> Self {
        Self {
            is_ready: false,
            repository_path: None,
            current_commit_index: 0,
            current_object_id: None,
            current_file_tree: None,
            current_commit_time: None,
            catalog: CommitCatalog::default(),
            is_fetching_commits: false,
            is_playing: false,
            play_speed,
            last_error_message: None,
            file_tree_viewers: vec![PathCursor::default(); viewers.max(1)],
        }
    }

    pub fn commits(&self) -> &[CommitFrame] {
        self.catalog.commits()
    }

    pub fn commits_count(&self) -> usize {
        self.catalog.commits_count()
    }

    pub fn loaded_commits_count(&self) -> usize {
        self.catalog.loaded_commits_count()
    }

    pub fn current_commit(&self) -> Option<&CommitFrame> {
        self.catalog.get(self.current_commit_index)
    }

    /// Last index playback may reach.
    pub fn last_commit_index(&self) -> usize {
        self.commits_count().saturating_sub(1)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::with_defaults(PlaySpeed::default(), 1)
    }
}
