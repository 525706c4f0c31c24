//! Git-backed repository provider.
//!
//! [`GitProvider`] answers the four provider requests from a local repository
//! through `git2`, in the same snake_case wire format any other provider
//! would use (see [`crate::core::api`]).
//!
//! # Key Features
//! - **Commit cache**: history is walked once by `prepare_cache`, oldest
//!   commit first, and pages are cut from that ordered list
//! - **Cursor pagination**: `get_commits` continues after a given commit id
//! - **Flat trees**: `get_commit_details` lists every tree entry with its
//!   directory and name
//! - **Change frequency**: counts how many commits touched each file, for
//!   the "most modified files" suggestions

use crate::core::{
    api::{ApiCommitFrame, ApiFileBlob, ApiFileTree, ApiRepositoryResponse},
    error::{Result, TimelineError},
    provider::{ProviderRequest, RepositoryProvider},
    suggestions::FileChange,
};
use git2::{DiffOptions, ObjectType, Oid, Repository, Sort, Tree, TreeWalkMode, TreeWalkResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

struct GitSession {
    repo: Repository,
    /// Ordered history, filled by `prepare_cache`.
    commits: Option<Vec<Oid>>,
    positions: HashMap<Oid, usize>,
}

impl GitSession {
    fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            log::debug!("Repository::discover({}) failed: {e}", path.display());
            TimelineError::not_in_git_repo(path)
        })?;
        Ok(Self {
            repo,
            commits: None,
            positions: HashMap::new(),
        })
    }

    fn prepare_cache(&mut self) -> Result<usize> {
        let mut commits = Vec::new();
        if !self.repo.is_empty()? {
            let mut revwalk = self.repo.revwalk()?;
            revwalk.push_head()?;
            revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
            for oid in revwalk {
                commits.push(oid?);
            }
        }

        self.positions = commits
            .iter()
            .enumerate()
            .map(|(index, oid)| (*oid, index))
            .collect();
        let count = commits.len();
        self.commits = Some(commits);
        log::debug!("Cached {count} commits");
        Ok(count)
    }

    fn commits(&mut self) -> Result<&[Oid]> {
        if self.commits.is_none() {
            self.prepare_cache()?;
        }
        Ok(self.commits.as_deref().unwrap_or_default())
    }

    fn get_commits(&mut self, after: Option<&str>, page_size: usize) -> Result<ApiRepositoryResponse> {
        let start = match after {
            None => 0,
            Some(commit_id) => {
                self.commits()?;
                let oid = parse_oid(commit_id)?;
                self.positions
                    .get(&oid)
                    .map(|position| position + 1)
                    .ok_or_else(|| TimelineError::unknown_commit(commit_id))?
            }
        };

        let page: Vec<Oid> = self.commits()?.iter().skip(start).take(page_size).copied().collect();
        page.into_iter()
            .map(|oid| -> Result<(String, String)> {
                let commit = self.repo.find_commit(oid)?;
                let summary = commit.summary().unwrap_or("").to_string();
                Ok((oid.to_string(), summary))
            })
            .collect()
    }

    fn get_commit_details(&self, commit_id: &str) -> Result<ApiCommitFrame> {
        let commit = self
            .repo
            .find_commit(parse_oid(commit_id)?)
            .map_err(|_| TimelineError::unknown_commit(commit_id))?;
        let tree = commit.tree()?;

        Ok(ApiCommitFrame {
            commit_id: commit.id().to_string(),
            commit_message: commit.message().unwrap_or("").to_string(),
            time: commit.time().seconds(),
            file_structure: Some(flatten_tree(&tree)?),
            parents: commit.parent_ids().map(|oid| oid.to_string()).collect(),
        })
    }

    fn files_by_modification_count(&mut self, limit: usize) -> Result<Vec<FileChange>> {
        let commits = self.commits()?.to_vec();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for oid in commits {
            let commit = self.repo.find_commit(oid)?;
            let tree = commit.tree()?;
            let parent_tree = match commit.parents().next() {
                Some(parent) => Some(parent.tree()?),
                None => None,
            };

            let mut diff_opts = DiffOptions::new();
            diff_opts.ignore_filemode(true);
            let diff = self.repo.diff_tree_to_tree(
                parent_tree.as_ref(),
                Some(&tree),
                Some(&mut diff_opts),
            )?;

            for delta in diff.deltas() {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .and_then(|path| path.to_str());
                if let Some(path) = path {
                    *counts.entry(path.to_string()).or_default() += 1;
                }
            }
        }

        let mut changes: Vec<FileChange> = counts.into_iter().collect();
        changes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        changes.truncate(limit);
        Ok(changes)
    }
}

fn parse_oid(commit_id: &str) -> Result<Oid> {
    Oid::from_str(commit_id).map_err(|_| TimelineError::unknown_commit(commit_id))
}

/// Pre-order listing of every entry under `tree`.
fn flatten_tree(tree: &Tree) -> Result<ApiFileTree> {
    let mut blobs = Vec::new();
    let mut skipped = 0usize;

    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        let Some(name) = entry.name() else {
            skipped += 1;
            return TreeWalkResult::Skip;
        };
        blobs.push(ApiFileBlob {
            object_id: entry.id().to_string(),
            relative_root_path: root.trim_end_matches('/').to_string(),
            name: name.to_string(),
            is_directory: entry.kind() == Some(ObjectType::Tree),
        });
        TreeWalkResult::Ok
    })?;

    if skipped > 0 {
        log::warn!("Skipped {skipped} tree entries with non UTF-8 names");
    }

    Ok(ApiFileTree {
        object_id: tree.id().to_string(),
        blobs,
    })
}

/// Provider reading a local git repository.
///
/// `git2` calls are blocking, so every request runs on tokio's blocking pool.
pub struct GitProvider {
    page_size: usize,
    session: Arc<Mutex<Option<GitSession>>>,
}

impl GitProvider {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Root of the open repository's working tree (or its git dir when bare).
    pub fn repository_root(&self) -> Option<PathBuf> {
        lock(&self.session).as_ref().map(|session| {
            session
                .repo
                .workdir()
                .unwrap_or_else(|| session.repo.path())
                .to_path_buf()
        })
    }

    /// Files ordered by the number of commits that touched them, most first.
    pub fn files_by_modification_count(&self, limit: usize) -> Result<Vec<FileChange>> {
        let mut guard = lock(&self.session);
        let session = guard.as_mut().ok_or(TimelineError::RepositoryNotOpen)?;
        session.files_by_modification_count(limit)
    }

    fn handle(&self, request: ProviderRequest) -> Result<Value> {
        handle_request(&self.session, self.page_size, request)
    }
}

fn lock(session: &Mutex<Option<GitSession>>) -> MutexGuard<'_, Option<GitSession>> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn handle_request(
    session: &Mutex<Option<GitSession>>,
    page_size: usize,
    request: ProviderRequest,
) -> Result<Value> {
    let mut guard = lock(session);

    if let ProviderRequest::OpenRepository { path } = &request {
        *guard = Some(GitSession::open(Path::new(path))?);
        return Ok(Value::Null);
    }

    let session = guard.as_mut().ok_or(TimelineError::RepositoryNotOpen)?;
    match request {
        ProviderRequest::OpenRepository { .. } => Ok(Value::Null),
        ProviderRequest::PrepareCache => Ok(Value::from(session.prepare_cache()?)),
        ProviderRequest::GetCommits { after_commit_id } => Ok(serde_json::to_value(
            session.get_commits(after_commit_id.as_deref(), page_size)?,
        )?),
        ProviderRequest::GetCommitDetails { commit_id } => {
            Ok(serde_json::to_value(session.get_commit_details(&commit_id)?)?)
        }
    }
}

impl RepositoryProvider for GitProvider {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value> {
        let command = request.command();
        let session = Arc::clone(&self.session);
        let page_size = self.page_size;

        let result = tokio::task::spawn_blocking(move || handle_request(&session, page_size, request))
            .await
            .map_err(|e| TimelineError::provider_failed(command, e.to_string()))
            .and_then(|result| result);
        if let Err(e) = &result {
            log::debug!("{command} failed: {e}");
        }
        result
    }
}
