//! Repository state store.
//!
//! [`RepositoryStore`] is the single writer of the session state: which
//! repository is open, the paginated commit catalog, the current commit and
//! its file tree, playback and the file tree viewers. It is constructed once
//! and handed to consumers by reference (or `Arc`); there is no global.
//!
//! # Concurrency
//! Every mutation is a single `send_modify`/`send_if_modified` call on a
//! `tokio::sync::watch` channel, so observers only ever see whole snapshots.
//! Provider calls are awaited between mutations, never inside one.
//!
//! Overlapping operations are allowed: only pagination is guarded (by
//! `is_fetching_commits`). Tree fetches carry a navigation generation and a
//! response is applied only if no newer navigation was issued in the
//! meantime. Pagination responses are tied to the session that issued them
//! and are dropped if the repository was reopened.

use crate::core::{
    api,
    config::TimelineConfig,
    error::{Result, TimelineError},
    model::{CommitFrame, CommitSummary},
    path_cursor::{CursorWatch, PathCursor},
    playback::PlaySpeed,
    provider::{ProviderRequest, RepositoryProvider},
    state::StoreState,
};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

pub struct RepositoryStore<P: RepositoryProvider> {
    provider: P,
    state: watch::Sender<StoreState>,
    /// Bumped by every navigation that fetches a tree.
    navigation: AtomicU64,
    /// Bumped by every `open_repository`.
    session: AtomicU64,
    default_play_speed: PlaySpeed,
    initial_viewers: usize,
}

impl<P: RepositoryProvider> RepositoryStore<P> {
    pub fn new(provider: P, config: &TimelineConfig) -> Self {
        let default_play_speed = config.play_speed();
        let initial_viewers = config.initial_viewers.max(1);
        let (state, _) = watch::channel(StoreState::with_defaults(
            default_play_speed,
            initial_viewers,
        ));

        Self {
            provider,
            state,
            navigation: AtomicU64::new(0),
            session: AtomicU64::new(0),
            default_play_speed,
            initial_viewers,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Read from the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn set_repository_path(&self, path: impl Into<String>) {
        let path = path.into();
        self.state.send_modify(|state| state.repository_path = Some(path));
    }

    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|state| state.last_error_message.take().is_some());
    }

    /// Open the repository at `repository_path` and load its first page and first tree.
    ///
    /// Does nothing when no path is set. Otherwise the whole state is reset
    /// and the provider is asked, strictly in order, to open the path, prepare
    /// its cache (commit count), return the first page and return the first
    /// commit's detail. The first failure stops the sequence and is recorded
    /// in `last_error_message`; `is_ready` stays false.
    pub async fn open_repository(&self) -> Result<()> {
        let path = match self.read(|state| state.repository_path.clone()) {
            Some(path) if !path.is_empty() => path,
            _ => {
                log::debug!("open_repository skipped: no repository path set");
                return Ok(());
            }
        };

        let session = self.session.fetch_add(1, Ordering::SeqCst) + 1;
        let navigation = self.next_navigation();

        let mut fresh = StoreState::with_defaults(self.default_play_speed, self.initial_viewers);
        fresh.repository_path = Some(path.clone());
        fresh.is_fetching_commits = true;
        self.state.send_replace(fresh);

        match self.open_sequence(&path, session, navigation).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if self.is_current_session(session) {
                    log::warn!("{e}");
                    let message = e.to_string();
                    self.state.send_modify(|state| {
                        state.is_fetching_commits = false;
                        state.last_error_message = Some(message);
                    });
                }
                Err(e)
            }
        }
    }

    async fn open_sequence(&self, path: &str, session: u64, navigation: u64) -> Result<()> {
        self.request(ProviderRequest::OpenRepository {
            path: path.to_string(),
        })
        .await?;

        let request = ProviderRequest::PrepareCache;
        let command = request.command();
        let count = api::decode_commit_count(command, self.request(request).await?)?;
        if !self.is_current_session(session) {
            return Ok(());
        }
        self.state
            .send_modify(|state| state.catalog.set_commits_count(count));

        let page = self.fetch_commit_page(None).await?;
        let Some(first) = page.first().map(|commit| commit.commit_id.clone()) else {
            return Err(TimelineError::EmptyRepository);
        };
        if !self.is_current_session(session) {
            return Ok(());
        }
        self.state.send_modify(|state| {
            state.catalog.append_page(page);
            state.is_fetching_commits = false;
            state.current_commit_index = 0;
        });

        let frame = self.fetch_commit(&first).await?;
        if !self.is_current_navigation(navigation) {
            return Ok(());
        }
        self.state.send_modify(|state| {
            apply_tree(state, frame);
            state.is_ready = true;
            state.is_fetching_commits = false;
        });
        log::info!(
            "Opened {} ({} commits, {} loaded)",
            path,
            count,
            self.read(StoreState::loaded_commits_count)
        );
        Ok(())
    }

    /// Fetch and append the page after the last loaded commit.
    ///
    /// Does nothing unless the store is ready and no page is already in flight.
    pub async fn load_next_commits(&self) -> Result<()> {
        let mut cursor = None;
        let started = self.state.send_if_modified(|state| {
            if !state.is_ready || state.is_fetching_commits {
                return false;
            }
            state.is_fetching_commits = true;
            cursor = state.catalog.last_commit_id().map(str::to_string);
            true
        });
        if !started {
            log::debug!("load_next_commits skipped: not ready or already fetching");
            return Ok(());
        }

        let session = self.session.load(Ordering::SeqCst);
        let result = self.fetch_commit_page(cursor).await;
        if !self.is_current_session(session) {
            log::debug!("Dropping commit page from a previous session");
            return result.map(|_| ());
        }

        match result {
            Ok(page) => {
                let received = page.len();
                self.state.send_modify(|state| {
                    state.catalog.append_page(page);
                    state.is_fetching_commits = false;
                    state.last_error_message = None;
                });
                log::debug!(
                    "Loaded {} more commits ({} total)",
                    received,
                    self.read(StoreState::loaded_commits_count)
                );
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|state| {
                    state.is_fetching_commits = false;
                    state.last_error_message = Some(e.to_string());
                });
                log::warn!("Failed to load next commits: {e}");
                Err(e)
            }
        }
    }

    /// Jump to commit `index` and load its tree.
    ///
    /// The index moves immediately, the tree is cleared (loading) and playback
    /// stops. Does nothing unless the store is ready and `index` is loaded.
    pub async fn set_current_commit_index(&self, index: usize) -> Result<()> {
        let mut target = None;
        self.state.send_if_modified(|state| {
            if !state.is_ready {
                return false;
            }
            let Some(commit) = state.catalog.get(index) else {
                return false;
            };
            target = Some(commit.commit_id.clone());
            state.current_commit_index = index;
            state.current_file_tree = None;
            state.current_object_id = None;
            state.current_commit_time = None;
            state.is_playing = false;
            true
        });
        let Some(commit_id) = target else {
            log::debug!("set_current_commit_index({index}) skipped");
            return Ok(());
        };

        let navigation = self.next_navigation();
        self.load_tree(&commit_id, navigation).await
    }

    /// Advance one commit, as playback does on every tick.
    ///
    /// At the last commit playback stops and nothing else changes. Otherwise
    /// the index moves forward and playback is marked as running; the previous
    /// tree stays visible until the new one arrives. When the next commit is
    /// not loaded yet the next page is fetched first; if a page is already in
    /// flight this step is skipped.
    pub async fn next_commit(&self) -> Result<()> {
        let (is_ready, at_end, next_loaded, fetching) = self.read(|state| {
            (
                state.is_ready,
                state.current_commit_index >= state.last_commit_index(),
                state.current_commit_index + 1 < state.loaded_commits_count(),
                state.is_fetching_commits,
            )
        });
        if !is_ready {
            return Ok(());
        }
        if at_end {
            self.pause();
            return Ok(());
        }
        if !next_loaded {
            if fetching {
                log::debug!("next_commit waiting for the next page");
                return Ok(());
            }
            self.load_next_commits().await?;
        }

        let mut target = None;
        self.state.send_if_modified(|state| {
            if !state.is_ready {
                return false;
            }
            if state.current_commit_index >= state.last_commit_index() {
                return std::mem::replace(&mut state.is_playing, false);
            }
            let next = state.current_commit_index + 1;
            match state.catalog.get(next) {
                Some(commit) => {
                    target = Some(commit.commit_id.clone());
                    state.current_commit_index = next;
                    state.is_playing = true;
                    true
                }
                None => std::mem::replace(&mut state.is_playing, false),
            }
        });
        let Some(commit_id) = target else {
            return Ok(());
        };

        let navigation = self.next_navigation();
        self.load_tree(&commit_id, navigation).await
    }

    pub fn pause(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.is_playing, false));
    }

    /// Double the play speed, wrapping from 32 back to 1.
    pub fn set_play_speed(&self) {
        self.state
            .send_modify(|state| state.play_speed = state.play_speed.next());
    }

    pub fn set_path_in_file_tree(&self, index: usize, path: Vec<String>) -> Result<()> {
        self.modify_viewer(index, |cursor| cursor.replace(path))
    }

    pub fn append_path_in_file_tree(&self, index: usize, segment: impl Into<String>) -> Result<()> {
        let segment = segment.into();
        self.modify_viewer(index, |cursor| cursor.push(segment))
    }

    pub fn change_path_directory_up(&self, index: usize) -> Result<()> {
        self.modify_viewer(index, PathCursor::pop)
    }

    /// Live handle on viewer `index`'s path.
    pub fn get_current_path_for_index(&self, index: usize) -> Result<CursorWatch> {
        let count = self.read(|state| state.file_tree_viewers.len());
        if index >= count {
            return Err(TimelineError::viewer_out_of_range(index, count));
        }
        Ok(CursorWatch::new(index, self.subscribe()))
    }

    /// Open another tree panel positioned at `path`; returns its index.
    pub fn open_file_tree_viewer(&self, path: Vec<String>) -> usize {
        let mut index = 0;
        self.state.send_modify(|state| {
            state.file_tree_viewers.push(PathCursor::new(path));
            index = state.file_tree_viewers.len() - 1;
        });
        index
    }

    fn modify_viewer(&self, index: usize, f: impl FnOnce(&mut PathCursor)) -> Result<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            let count = state.file_tree_viewers.len();
            match state.file_tree_viewers.get_mut(index) {
                Some(cursor) => {
                    let before = cursor.clone();
                    f(cursor);
                    *cursor != before
                }
                None => {
                    result = Err(TimelineError::viewer_out_of_range(index, count));
                    false
                }
            }
        });
        result
    }

    async fn load_tree(&self, commit_id: &str, navigation: u64) -> Result<()> {
        match self.fetch_commit(commit_id).await {
            Ok(frame) => {
                if self.is_current_navigation(navigation) {
                    self.state.send_modify(|state| {
                        apply_tree(state, frame);
                        state.last_error_message = None;
                    });
                } else {
                    log::debug!("Discarding stale tree for {commit_id}");
                }
                Ok(())
            }
            Err(e) => {
                if self.is_current_navigation(navigation) {
                    self.record_error(&e);
                }
                Err(e)
            }
        }
    }

    async fn fetch_commit_page(&self, after_commit_id: Option<String>) -> Result<Vec<CommitSummary>> {
        let request = ProviderRequest::GetCommits { after_commit_id };
        let command = request.command();
        api::decode_commit_page(command, self.request(request).await?)
    }

    async fn fetch_commit(&self, commit_id: &str) -> Result<CommitFrame> {
        let request = ProviderRequest::GetCommitDetails {
            commit_id: commit_id.to_string(),
        };
        let command = request.command();
        api::decode_commit_frame(command, self.request(request).await?)
    }

    async fn request(&self, request: ProviderRequest) -> Result<Value> {
        log::debug!("Provider request: {request:?}");
        self.provider.invoke(request).await
    }

    fn record_error(&self, error: &TimelineError) {
        log::warn!("{error}");
        let message = error.to_string();
        self.state
            .send_modify(|state| state.last_error_message = Some(message));
    }

    fn next_navigation(&self) -> u64 {
        self.navigation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current_navigation(&self, navigation: u64) -> bool {
        self.navigation.load(Ordering::SeqCst) == navigation
    }

    fn is_current_session(&self, session: u64) -> bool {
        self.session.load(Ordering::SeqCst) == session
    }
}

fn apply_tree(state: &mut StoreState, frame: CommitFrame) {
    state.current_object_id = frame.file_tree.as_ref().map(|tree| tree.object_id.clone());
    state.current_file_tree = frame.file_tree;
    state.current_commit_time = frame.time;
}
