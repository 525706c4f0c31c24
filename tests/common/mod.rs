//! Shared test utilities for git-timeline
//!
//! `provider` holds a scripted in-memory provider for store tests,
//! `repository` builds real git repositories for the git provider and CLI.

pub mod assertions;
pub mod provider;
pub mod repository;
