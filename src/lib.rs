//! Git Timeline - step through the history of a git repository.
//!
//! The library is built around [`RepositoryStore`], the single owner of the
//! session state: the open repository, the paginated commit list, the current
//! commit and its file tree, auto-advancing playback, and any number of file
//! tree viewers. The store reads repository data only through a
//! [`RepositoryProvider`]; [`GitProvider`] is the bundled `git2` implementation.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The state store and its snapshot type
//! - The provider contract and wire format
//! - Playback speed and the playback timer
//! - Directory grouping for "most modified files"
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // State management
    CommitCatalog,
    CursorWatch,
    PathCursor,
    PlaySpeed,
    PlaybackTicker,
    RepositoryStore,
    StoreState,
    // Entities
    CommitFrame,
    CommitSummary,
    FileBlob,
    FileTree,
    // Providers
    GitProvider,
    ProviderRequest,
    RepositoryProvider,
    // Derived views
    group_by_directory,
    suggestion_target_path,
    DirectoryGroup,
    SuggestedFiles,
    // Configuration and error handling
    Result,
    TimelineConfig,
    TimelineError,
};
