use crate::core::{
    command_init::{load_all, StoreCommandInit},
    config::TimelineConfig,
    error::Result,
    output::{format_commit_line, print_info, print_section_header},
};
use std::path::PathBuf;

/// List the loaded commits; with `all`, page through the whole history first.
pub async fn execute_log(path: Option<PathBuf>, all: bool, config: TimelineConfig) -> Result<()> {
    let context = StoreCommandInit::initialize(path, config).await?;
    let store = &context.store;

    if all {
        load_all(store).await?;
    }

    let state = store.snapshot();
    print_section_header(&format!(
        "Commits ({} of {})",
        state.loaded_commits_count(),
        state.commits_count()
    ));
    for (index, commit) in state.commits().iter().enumerate() {
        println!(
            "{}",
            format_commit_line(index, commit, index == state.current_commit_index)
        );
    }

    if !state.catalog.is_fully_loaded() {
        print_info(&format!(
            "{} more commits not loaded. Use --all to list every commit.",
            state.commits_count() - state.loaded_commits_count()
        ));
    } else {
        println!();
    }

    Ok(())
}
