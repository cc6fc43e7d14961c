//! In-memory [`IssueTracker`] for tests.
//!
//! Issues get sequential numbers starting at 1 and node ids `I_<number>`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use super::IssueTracker;
use super::types::{IssueInput, RemoteIssue, RepoRef};
use crate::error::{Error, Result};
use crate::model::normalize_title;

/// A recorded tracker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Update(u64),
    Link { issue: String, project: String },
}

#[derive(Debug, Clone, Default)]
pub struct MockIssue {
    pub title: String,
    pub body: String,
    pub label_ids: Vec<String>,
    pub type_id: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Default)]
struct State {
    next_number: u64,
    issues: BTreeMap<u64, MockIssue>,
    calls: Vec<Call>,
    labels: HashMap<String, String>,
    issue_types: HashMap<String, String>,
    projects: HashMap<String, String>,
    project_items: HashSet<(String, String)>,
    fail_titles: HashSet<String>,
}

pub struct MockTracker {
    state: Mutex<State>,
}

pub fn node_id(number: u64) -> String {
    format!("I_{number}")
}

fn number_of(node_id: &str) -> Option<u64> {
    node_id.strip_prefix("I_")?.parse().ok()
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_number: 1,
                ..State::default()
            }),
        }
    }

    pub fn with_label(self, name: &str) -> Self {
        self.lock()
            .labels
            .insert(normalize_title(name), format!("LA_{name}"));
        self
    }

    pub fn with_issue_type(self, name: &str) -> Self {
        self.lock()
            .issue_types
            .insert(normalize_title(name), format!("IT_{name}"));
        self
    }

    pub fn with_project(self, name: &str) -> Self {
        self.lock()
            .projects
            .insert(normalize_title(name), format!("PVT_{name}"));
        self
    }

    /// Seed an issue as if it had been created by an earlier run.
    pub fn with_existing_issue(self, title: &str) -> Self {
        {
            let mut state = self.lock();
            let number = state.next_number;
            state.next_number += 1;
            state.issues.insert(
                number,
                MockIssue {
                    title: title.to_string(),
                    ..MockIssue::default()
                },
            );
        }
        self
    }

    /// Make create and update fail for issues with this title.
    pub fn fail_for(self, title: &str) -> Self {
        self.lock().fail_titles.insert(normalize_title(title));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn creates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(title) => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(number) => Some(number),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Link { issue, project } => Some((issue, project)),
                _ => None,
            })
            .collect()
    }

    pub fn issue(&self, number: u64) -> Option<MockIssue> {
        self.lock().issues.get(&number).cloned()
    }

    /// Title of the parent of the issue titled `title`.
    pub fn parent_of(&self, title: &str) -> Option<String> {
        let state = self.lock();
        let child = state.issues.values().find(|i| i.title == title)?;
        let parent_number = number_of(child.parent_id.as_deref()?)?;
        state.issues.get(&parent_number).map(|p| p.title.clone())
    }
}

impl IssueTracker for MockTracker {
    async fn create_issue(&self, _repo: &RepoRef, input: &IssueInput) -> Result<RemoteIssue> {
        let mut state = self.lock();
        state.calls.push(Call::Create(input.title.clone()));
        if state.fail_titles.contains(&normalize_title(&input.title)) {
            return Err(Error::GitHub(format!("create rejected: {}", input.title)));
        }

        let number = state.next_number;
        state.next_number += 1;
        state.issues.insert(
            number,
            MockIssue {
                title: input.title.clone(),
                body: input.body.clone(),
                label_ids: input.label_ids.clone(),
                type_id: input.type_id.clone(),
                parent_id: input.parent_id.clone(),
            },
        );
        Ok(RemoteIssue {
            number,
            node_id: node_id(number),
        })
    }

    async fn update_issue(
        &self,
        _repo: &RepoRef,
        node_id: &str,
        input: &IssueInput,
    ) -> Result<RemoteIssue> {
        let mut state = self.lock();
        let number = number_of(node_id).ok_or_else(|| Error::NotFound {
            kind: "Issue",
            name: node_id.to_string(),
        })?;
        state.calls.push(Call::Update(number));
        if state.fail_titles.contains(&normalize_title(&input.title)) {
            return Err(Error::GitHub(format!("update rejected: {}", input.title)));
        }

        let issue = state.issues.get_mut(&number).ok_or_else(|| Error::NotFound {
            kind: "Issue",
            name: number.to_string(),
        })?;
        issue.title.clone_from(&input.title);
        issue.body.clone_from(&input.body);
        issue.label_ids.clone_from(&input.label_ids);
        if input.type_id.is_some() {
            issue.type_id.clone_from(&input.type_id);
        }
        if input.parent_id.is_some() {
            issue.parent_id.clone_from(&input.parent_id);
        }
        Ok(RemoteIssue {
            number,
            node_id: node_id.to_string(),
        })
    }

    async fn resolve_issue_node_id(&self, _repo: &RepoRef, number: u64) -> Result<String> {
        if self.lock().issues.contains_key(&number) {
            Ok(node_id(number))
        } else {
            Err(Error::NotFound {
                kind: "Issue",
                name: format!("#{number}"),
            })
        }
    }

    async fn resolve_parent_id(&self, _repo: &RepoRef, title: &str) -> Result<String> {
        let wanted = normalize_title(title);
        self.lock()
            .issues
            .iter()
            .find(|(_, issue)| normalize_title(&issue.title) == wanted)
            .map(|(number, _)| node_id(*number))
            .ok_or_else(|| Error::NotFound {
                kind: "Parent issue",
                name: title.to_string(),
            })
    }

    async fn resolve_label_ids(&self, _repo: &RepoRef, names: &[String]) -> Result<Vec<String>> {
        let state = self.lock();
        Ok(names
            .iter()
            .filter_map(|n| state.labels.get(&normalize_title(n)).cloned())
            .collect())
    }

    async fn resolve_issue_type_id(&self, _repo: &RepoRef, name: &str) -> Result<String> {
        self.lock()
            .issue_types
            .get(&normalize_title(name))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "Issue type",
                name: name.to_string(),
            })
    }

    async fn resolve_project_id(&self, _owner: &str, name: &str) -> Result<String> {
        self.lock()
            .projects
            .get(&normalize_title(name))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "Project",
                name: name.to_string(),
            })
    }

    async fn add_to_project(&self, issue_node_id: &str, project_node_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Link {
            issue: issue_node_id.to_string(),
            project: project_node_id.to_string(),
        });
        state
            .project_items
            .insert((issue_node_id.to_string(), project_node_id.to_string()));
        Ok(())
    }
}
