//! Types shared between the synchronizer and GitHub trackers.

use serde::Serialize;
use std::fmt;

/// A GitHub repository, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Fields sent when creating or updating an issue.
///
/// Identifiers are GraphQL node ids that were resolved beforehand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueInput {
    pub title: String,
    pub body: String,
    pub label_ids: Vec<String>,
    pub parent_id: Option<String>,
    pub type_id: Option<String>,
}

/// An issue as it exists on GitHub after a create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteIssue {
    /// Human-visible issue number (e.g. 123)
    pub number: u64,
    /// GraphQL node id
    pub node_id: String,
}

/// Repository summary shown by `md2issues info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub url: String,
    pub visibility: String,
    pub default_branch: Option<String>,
    pub open_issues: u64,
    pub has_issues_enabled: bool,
}
