//! Common assertion helpers for CLI output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for the not-a-repository error
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks for a listed commit index
pub fn has_commit_index(index: usize) -> impl Predicate<str> {
    predicates::str::contains(format!("[{}]", index))
}

/// Creates a predicate that checks for a directory entry in a tree listing
pub fn has_directory_entry(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{}/", name))
}
