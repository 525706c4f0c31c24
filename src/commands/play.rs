use crate::core::{
    command_init::{load_through, StoreCommandInit},
    config::TimelineConfig,
    error::Result,
    output::{format_commit_line, print_info, print_success},
    playback::{PlaySpeed, PlaybackTicker},
};
use std::path::PathBuf;

/// Play history forward from commit `from`, printing every commit reached.
pub async fn execute_play(
    path: Option<PathBuf>,
    speed: Option<u32>,
    from: Option<usize>,
    config: TimelineConfig,
) -> Result<()> {
    let context = StoreCommandInit::initialize(path, config).await?;
    let store = &context.store;

    if let Some(speed) = speed {
        let target = PlaySpeed::clamped(speed);
        while store.read(|state| state.play_speed) != target {
            store.set_play_speed();
        }
    }
    if let Some(from) = from {
        load_through(store, from).await?;
        store.set_current_commit_index(from).await?;
    }

    let state = store.snapshot();
    print_info(&format!(
        "Playing {} commits at {}",
        state.commits_count(),
        state.play_speed
    ));
    if let Some(commit) = state.current_commit() {
        println!("{}", format_commit_line(state.current_commit_index, commit, true));
    }

    PlaybackTicker::new(store, context.config.tick_interval())
        .run(|state| {
            if let Some(commit) = state.current_commit() {
                println!("{}", format_commit_line(state.current_commit_index, commit, true));
            }
            true
        })
        .await?;

    print_success("Reached the last commit");
    println!();
    Ok(())
}
