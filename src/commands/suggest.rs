use crate::core::{
    command_init::StoreCommandInit,
    config::TimelineConfig,
    error::Result,
    output::{format_directory_group, print_info, print_section_header},
    suggestions::SuggestedFiles,
};
use std::path::PathBuf;

/// Print the most modified files, grouped by directory.
pub async fn execute_suggest(path: Option<PathBuf>, limit: usize, config: TimelineConfig) -> Result<()> {
    let context = StoreCommandInit::initialize(path, config).await?;
    let changes = context.store.provider().files_by_modification_count(limit)?;

    if changes.is_empty() {
        print_info("No modified files found.");
        return Ok(());
    }

    print_section_header("Most modified files");
    let mut suggested = SuggestedFiles::default();
    for group in suggested.groups(&changes) {
        for line in format_directory_group(group) {
            println!("{line}");
        }
    }
    println!();

    Ok(())
}
