//! Centralized initialization for commands that read repository history.
//!
//! Every command starts the same way: resolve the repository path, build a
//! [`RepositoryStore`] over a [`GitProvider`], and open the repository.
//!
//! # Initialization Steps
//! 1. **Path resolution**: explicit path argument, else the current directory
//! 2. **Store construction**: provider page size and play speed from config
//! 3. **Open**: run the store's open sequence and surface its error, if any

use crate::core::{
    config::TimelineConfig,
    error::{Result, TimelineError},
    git::GitProvider,
    provider::RepositoryProvider,
    state::StoreState,
    store::RepositoryStore,
};
use std::env;
use std::path::PathBuf;

/// Store opened on a repository, plus the config it was built from.
pub struct StoreContext {
    pub store: RepositoryStore<GitProvider>,
    pub config: TimelineConfig,
}

pub struct StoreCommandInit;

impl StoreCommandInit {
    /// Build a store for `path` (or the current directory) and open it.
    ///
    /// # Examples
    /// ```no_run
    /// use git_timeline::core::command_init::StoreCommandInit;
    /// use git_timeline::TimelineConfig;
    ///
    /// # async fn run() -> git_timeline::Result<()> {
    /// let context = StoreCommandInit::initialize(None, TimelineConfig::default()).await?;
    /// println!("{} commits", context.store.read(|state| state.commits_count()));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn initialize(path: Option<PathBuf>, config: TimelineConfig) -> Result<StoreContext> {
        let path = match path {
            Some(path) => path,
            None => env::current_dir()?,
        };
        log::debug!("Opening repository store at {}", path.display());

        let store = RepositoryStore::new(GitProvider::new(config.page_size()), &config);
        store.set_repository_path(path.to_string_lossy());
        store.open_repository().await?;

        Ok(StoreContext { store, config })
    }
}

/// Page through history until commit `index` is loaded.
///
/// Fails with [`TimelineError::CommitOutOfRange`] when the repository has
/// fewer commits.
pub async fn load_through<P: RepositoryProvider>(store: &RepositoryStore<P>, index: usize) -> Result<()> {
    loop {
        let loaded = store.read(StoreState::loaded_commits_count);
        if index < loaded {
            return Ok(());
        }
        if store.read(|state| state.catalog.is_fully_loaded()) {
            return Err(TimelineError::commit_out_of_range(index, loaded));
        }
        store.load_next_commits().await?;
        if store.read(StoreState::loaded_commits_count) == loaded {
            return Err(TimelineError::commit_out_of_range(index, loaded));
        }
    }
}

/// Page through the whole history.
pub async fn load_all<P: RepositoryProvider>(store: &RepositoryStore<P>) -> Result<()> {
    while !store.read(|state| state.catalog.is_fully_loaded()) {
        let loaded = store.read(StoreState::loaded_commits_count);
        store.load_next_commits().await?;
        if store.read(StoreState::loaded_commits_count) == loaded {
            break;
        }
    }
    Ok(())
}
