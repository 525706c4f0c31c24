//! "Most modified files" navigation aid.
//!
//! Files are grouped by their directory, keeping the order in which
//! directories first appear and, inside a directory, the order of the input.
//! Nothing is re-ranked.

use crate::core::path_cursor::split_path;

/// A modified file and how many commits touched it.
pub type FileChange = (String, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    /// Directory of the files (`""` for the repository root).
    pub directory: String,
    pub files: Vec<FileChange>,
}

/// Group `(path, count)` entries by directory, preserving input order.
pub fn group_by_directory(changes: &[FileChange]) -> Vec<DirectoryGroup> {
    let mut groups: Vec<DirectoryGroup> = Vec::new();
    for change in changes {
        let directory = parent_directory(&change.0);
        match groups.iter_mut().find(|group| group.directory == directory) {
            Some(group) => group.files.push(change.clone()),
            None => groups.push(DirectoryGroup {
                directory: directory.to_string(),
                files: vec![change.clone()],
            }),
        }
    }
    groups
}

/// The path with its final segment removed.
pub fn parent_directory(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Cursor segments to open when a suggestion is clicked: a directory opens
/// itself, a file opens the directory containing it.
pub fn suggestion_target_path(path: &str, is_directory: bool) -> Vec<String> {
    if is_directory {
        split_path(path)
    } else {
        split_path(parent_directory(path))
    }
}

/// Memoized grouping: recomputed only when the source sequence changes.
#[derive(Debug, Default)]
pub struct SuggestedFiles {
    source: Vec<FileChange>,
    groups: Vec<DirectoryGroup>,
}

impl SuggestedFiles {
    pub fn groups(&mut self, changes: &[FileChange]) -> &[DirectoryGroup] {
        if self.source.as_slice() != changes {
            self.source = changes.to_vec();
            self.groups = group_by_directory(changes);
        }
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str, count: usize) -> FileChange {
        (path.to_string(), count)
    }

    #[test]
    fn test_groups_in_first_seen_directory_order() {
        let changes = vec![change("src/a.ts", 3), change("src/b.ts", 1), change("lib/c.ts", 2)];

        let groups = group_by_directory(&changes);
        assert_eq!(
            groups,
            vec![
                DirectoryGroup {
                    directory: "src".to_string(),
                    files: vec![change("src/a.ts", 3), change("src/b.ts", 1)],
                },
                DirectoryGroup {
                    directory: "lib".to_string(),
                    files: vec![change("lib/c.ts", 2)],
                },
            ]
        );
    }

    #[test]
    fn test_interleaved_directories_are_not_resorted() {
        let changes = vec![
            change("lib/x.rs", 1),
            change("src/y.rs", 9),
            change("lib/z.rs", 5),
        ];

        let groups = group_by_directory(&changes);
        assert_eq!(groups[0].directory, "lib");
        assert_eq!(groups[0].files, vec![change("lib/x.rs", 1), change("lib/z.rs", 5)]);
        assert_eq!(groups[1].directory, "src");
    }

    #[test]
    fn test_root_files_use_empty_directory() {
        let groups = group_by_directory(&[change("README.md", 4)]);
        assert_eq!(groups[0].directory, "");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_directory(&[]).is_empty());
    }

    #[test]
    fn test_suggestion_target_path() {
        assert_eq!(
            suggestion_target_path("src/core/store.rs", false),
            vec!["src".to_string(), "core".to_string()]
        );
        assert_eq!(
            suggestion_target_path("src/core", true),
            vec!["src".to_string(), "core".to_string()]
        );
        assert!(suggestion_target_path("README.md", false).is_empty());
    }

    #[test]
    fn test_memo_recomputes_on_change() {
        let mut memo = SuggestedFiles::default();
        let first = vec![change("src/a.rs", 2)];
        assert_eq!(memo.groups(&first).len(), 1);

        let second = vec![change("src/a.rs", 2), change("docs/b.md", 1)];
        let groups = memo.groups(&second);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].directory, "docs");

        assert!(memo.groups(&[]).is_empty());
    }
}
