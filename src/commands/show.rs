use crate::core::{
    command_init::{load_through, StoreCommandInit},
    config::TimelineConfig,
    error::Result,
    output::{format_commit_line, format_commit_time, format_tree_entry, print_info, print_section_header},
    path_cursor::split_path,
};
use colored::*;
use std::path::PathBuf;

/// Select commit `index` and list the directory `dir` of its file tree.
pub async fn execute_show(
    path: Option<PathBuf>,
    index: usize,
    dir: Option<String>,
    config: TimelineConfig,
) -> Result<()> {
    let context = StoreCommandInit::initialize(path, config).await?;
    let store = &context.store;

    load_through(store, index).await?;
    if index != 0 {
        store.set_current_commit_index(index).await?;
    }
    if let Some(dir) = dir {
        store.set_path_in_file_tree(0, split_path(&dir))?;
    }

    let viewer = store.get_current_path_for_index(0)?;
    let current_path = viewer.get().unwrap_or_default();
    let state = store.snapshot();

    if let Some(commit) = state.current_commit() {
        println!();
        println!("{}", format_commit_line(index, commit, true));
        if let Some(time) = state.current_commit_time {
            println!("    {}", format_commit_time(time).bright_black());
        }
    }

    let Some(tree) = state.current_file_tree.as_ref() else {
        print_info("No file tree for this commit.");
        return Ok(());
    };
    if !tree.has_directory(&current_path) {
        print_info(&format!("No directory '{}' in this commit.", current_path.join("/")));
        return Ok(());
    }

    print_section_header(&format!("/{}", current_path.join("/")));
    for blob in tree.entries_in(&current_path) {
        println!("{}", format_tree_entry(blob));
    }
    println!();

    Ok(())
}
