//! Scripted in-memory repository provider
//!
//! [`FakeProvider`] serves a synthetic history of `count` commits, ids
//! `c000`, `c001`, ... Every request is recorded, and tests can inject
//! failures, malformed detail responses and per-request delays.

#![allow(dead_code)]

use git_timeline::core::error::{Result, TimelineError};
use git_timeline::{ProviderRequest, RepositoryProvider};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Script {
    fail_on: Option<&'static str>,
    malformed_details: bool,
    detail_delays: HashMap<String, Duration>,
    page_delay: Duration,
}

pub struct FakeProvider {
    commits: Vec<(String, String)>,
    page_size: usize,
    calls: Mutex<Vec<ProviderRequest>>,
    script: Mutex<Script>,
}

pub fn commit_id(index: usize) -> String {
    format!("c{index:03}")
}

pub fn tree_id(index: usize) -> String {
    format!("tree-{index:03}")
}

impl FakeProvider {
    pub fn with_commits(count: usize, page_size: usize) -> Self {
        let commits = (0..count)
            .map(|index| (commit_id(index), format!("Commit number {index}")))
            .collect();
        Self {
            commits,
            page_size,
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(Script::default()),
        }
    }

    /// Reject every request for `command` from now on.
    pub fn fail_on(&self, command: &'static str) {
        self.script.lock().unwrap().fail_on = Some(command);
    }

    pub fn clear_failure(&self) {
        self.script.lock().unwrap().fail_on = None;
    }

    /// Answer `get_commit_details` with an object lacking `commit_id`.
    pub fn return_malformed_details(&self, malformed: bool) {
        self.script.lock().unwrap().malformed_details = malformed;
    }

    pub fn delay_details(&self, index: usize, delay: Duration) {
        self.script
            .lock()
            .unwrap()
            .detail_delays
            .insert(commit_id(index), delay);
    }

    pub fn delay_pages(&self, delay: Duration) {
        self.script.lock().unwrap().page_delay = delay;
    }

    pub fn calls(&self) -> Vec<ProviderRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.command() == command)
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn page_after(&self, after: Option<&str>) -> Result<Value> {
        let start = match after {
            None => 0,
            Some(id) => {
                self.commits
                    .iter()
                    .position(|(commit_id, _)| commit_id == id)
                    .ok_or_else(|| TimelineError::unknown_commit(id))?
                    + 1
            }
        };
        let page: Vec<_> = self.commits.iter().skip(start).take(self.page_size).collect();
        Ok(json!(page))
    }

    fn details(&self, commit_id: &str) -> Result<Value> {
        let index = self
            .commits
            .iter()
            .position(|(id, _)| id == commit_id)
            .ok_or_else(|| TimelineError::unknown_commit(commit_id))?;
        Ok(json!({
            "commit_id": commit_id,
            "commit_message": self.commits[index].1,
            "time": 1_700_000_000 + index as i64 * 60,
            "parents": if index == 0 { vec![] } else { vec![self::commit_id(index - 1)] },
            "file_structure": {
                "object_id": tree_id(index),
                "blobs": [
                    { "object_id": format!("readme-{index}"), "relative_root_path": "", "name": "README.md", "is_directory": false },
                    { "object_id": format!("src-{index}"), "relative_root_path": "", "name": "src", "is_directory": true },
                    { "object_id": format!("file-{index}"), "relative_root_path": "src", "name": format!("file{index}.rs"), "is_directory": false }
                ]
            }
        }))
    }
}

impl RepositoryProvider for FakeProvider {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        let command = request.command();

        let (delay, fail, malformed) = {
            let script = self.script.lock().unwrap();
            let delay = match &request {
                ProviderRequest::GetCommitDetails { commit_id } => {
                    script.detail_delays.get(commit_id).copied().unwrap_or_default()
                }
                ProviderRequest::GetCommits { .. } => script.page_delay,
                _ => Duration::ZERO,
            };
            (delay, script.fail_on == Some(command), script.malformed_details)
        };

        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(TimelineError::provider_failed(command, "scripted failure"));
        }

        match request {
            ProviderRequest::OpenRepository { .. } => Ok(Value::Null),
            ProviderRequest::PrepareCache => Ok(json!(self.commits.len())),
            ProviderRequest::GetCommits { after_commit_id } => self.page_after(after_commit_id.as_deref()),
            ProviderRequest::GetCommitDetails { commit_id } => {
                if malformed {
                    Ok(json!({ "commit_message": "no id here" }))
                } else {
                    self.details(&commit_id)
                }
            }
        }
    }
}
