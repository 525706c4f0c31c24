//! Per-viewer navigation position inside a file tree.

use crate::core::state::StoreState;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Directory path of one tree panel, held as segments (`[]` = root).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCursor {
    current_path: Vec<String>,
}

impl PathCursor {
    pub fn new(current_path: Vec<String>) -> Self {
        Self { current_path }
    }

    /// Cursor positioned at a `/`-separated path; empty segments are dropped.
    pub fn from_slash_path(path: &str) -> Self {
        Self::new(split_path(path))
    }

    pub fn current_path(&self) -> &[String] {
        &self.current_path
    }

    pub fn to_slash_path(&self) -> String {
        self.current_path.join("/")
    }

    pub fn is_root(&self) -> bool {
        self.current_path.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.current_path.push(segment.into());
    }

    /// Drop the last segment. Popping the root leaves the root.
    pub fn pop(&mut self) {
        self.current_path.pop();
    }

    pub fn replace(&mut self, path: Vec<String>) {
        self.current_path = path;
    }
}

/// Split a `/`-separated path into cursor segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Live view of one viewer's path.
///
/// Reads always reflect the latest store state, so a holder sees every later
/// push, pop or replace on that viewer.
#[derive(Debug, Clone)]
pub struct CursorWatch {
    index: usize,
    receiver: watch::Receiver<StoreState>,
}

impl CursorWatch {
    pub(crate) fn new(index: usize, receiver: watch::Receiver<StoreState>) -> Self {
        Self { index, receiver }
    }

    /// Current path of the viewer, or `None` once the viewer no longer exists
    /// (the viewer set is rebuilt when a repository is reopened).
    pub fn get(&self) -> Option<Vec<String>> {
        self.receiver
            .borrow()
            .file_tree_viewers
            .get(self.index)
            .map(|cursor| cursor.current_path().to_vec())
    }

    /// Wait until this viewer's path differs from `seen`, returning the new path.
    pub async fn changed_from(&mut self, seen: &[String]) -> Option<Vec<String>> {
        loop {
            let current = self.get();
            if current.as_deref() != Some(seen) {
                return current;
            }
            if self.receiver.changed().await.is_err() {
                return self.get();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop() {
        let mut cursor = PathCursor::default();
        cursor.push("src");
        cursor.push("core");
        assert_eq!(cursor.to_slash_path(), "src/core");

        cursor.pop();
        assert_eq!(cursor.current_path(), ["src".to_string()]);
    }

    #[test]
    fn test_pop_at_root_stays_at_root() {
        let mut cursor = PathCursor::default();
        cursor.pop();
        assert!(cursor.is_root());
        assert!(cursor.current_path().is_empty());
    }

    #[test]
    fn test_replace_sets_absolute_path() {
        let mut cursor = PathCursor::from_slash_path("docs");
        cursor.replace(vec!["src".to_string(), "bin".to_string()]);
        assert_eq!(cursor.to_slash_path(), "src/bin");
    }

    #[test]
    fn test_from_slash_path_ignores_empty_segments() {
        let cursor = PathCursor::from_slash_path("/src//core/");
        assert_eq!(cursor.current_path(), ["src".to_string(), "core".to_string()]);
        assert!(PathCursor::from_slash_path("").is_root());
    }
}
