//! Core functionality for git-timeline.
//!
//! This module holds the repository state store, its contract with the
//! repository-data provider, the git-backed provider, and the ambient pieces
//! (errors, configuration, output).

pub mod api;
pub mod catalog;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod git;
pub mod model;
pub mod output;
pub mod path_cursor;
pub mod playback;
pub mod provider;
pub mod state;
pub mod store;
pub mod suggestions;

// === Error handling ===
pub use error::{Result, TimelineError};

// === Entities and wire format ===
pub use api::{is_api_commit_frame, ApiCommitFrame, ApiFileBlob, ApiFileTree, ApiRepositoryResponse};
pub use model::{CommitFrame, CommitSummary, FileBlob, FileTree};

// === Provider contract ===
pub use git::GitProvider;
pub use provider::{ProviderRequest, RepositoryProvider};

// === State management ===
pub use catalog::CommitCatalog;
pub use path_cursor::{CursorWatch, PathCursor};
pub use playback::{PlaySpeed, PlaybackTicker};
pub use state::StoreState;
pub use store::RepositoryStore;

// === Derived views ===
pub use suggestions::{group_by_directory, suggestion_target_path, DirectoryGroup, SuggestedFiles};

// === Command initialization ===
pub use command_init::{StoreCommandInit, StoreContext};

// === Configuration and output ===
pub use config::TimelineConfig;
pub use output::{print_error, print_info, print_section_header, print_success};
