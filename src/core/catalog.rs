//! Paginated, append-only list of commit summaries.

use crate::core::model::{CommitFrame, CommitSummary};
use serde::{Deserialize, Serialize};

/// Commits loaded so far in this session, plus the total the provider reported.
///
/// The loaded count is the length of `commits`, so it can never drift from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitCatalog {
    commits: Vec<CommitFrame>,
    commits_count: usize,
}

impl CommitCatalog {
    pub fn commits(&self) -> &[CommitFrame] {
        &self.commits
    }

    pub fn get(&self, index: usize) -> Option<&CommitFrame> {
        self.commits.get(index)
    }

    /// Total commits in the repository, fixed when the repository is opened.
    pub fn commits_count(&self) -> usize {
        self.commits_count
    }

    pub fn set_commits_count(&mut self, count: usize) {
        self.commits_count = count;
    }

    pub fn loaded_commits_count(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.commits.len() >= self.commits_count
    }

    /// Pagination cursor for the next page.
    pub fn last_commit_id(&self) -> Option<&str> {
        self.commits.last().map(|commit| commit.commit_id.as_str())
    }

    /// Append a fetched page in provider order. Ids are trusted to be unique.
    pub fn append_page(&mut self, page: Vec<CommitSummary>) {
        self.commits.extend(page.into_iter().map(CommitFrame::from));
    }
}
