//! Output formatting for the CLI.
//!
//! # Design Principles
//! - **Consistent color scheme**: red for errors, blue for commit ids and
//!   directories, bright_black for secondary information
//! - **Plain layout**: one line per commit or tree entry so output stays
//!   greppable

use crate::core::model::{CommitFrame, FileBlob};
use crate::core::suggestions::DirectoryGroup;
use chrono::{DateTime, Utc};
use colored::*;

/// Formats and prints an error message
///
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header
///
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// `[index] shortid subject`, with a `*` marker on the current commit.
pub fn format_commit_line(index: usize, commit: &CommitFrame, is_current: bool) -> String {
    let marker = if is_current { "*" } else { " " };
    format!(
        "{}{}{} {} {} {}",
        "[".bright_black(),
        index.to_string().white(),
        "]".bright_black(),
        marker.green(),
        commit.short_id().blue(),
        commit.subject()
    )
}

/// Commit timestamp (seconds since epoch) in UTC.
pub fn format_commit_time(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// One tree entry; directories get a trailing `/`.
pub fn format_tree_entry(blob: &FileBlob) -> String {
    if blob.is_directory {
        format!("  {}/", blob.name.blue())
    } else {
        format!("  {}", blob.name)
    }
}

/// Directory heading followed by its files and their modification counts.
pub fn format_directory_group(group: &DirectoryGroup) -> Vec<String> {
    let heading = if group.directory.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", group.directory)
    };
    let mut lines = vec![heading.blue().bold().to_string()];
    for (path, count) in &group.files {
        let name = path.rsplit('/').next().unwrap_or(path);
        lines.push(format!("    {} {}", name, format!("({count})").bright_black()));
    }
    lines
}
