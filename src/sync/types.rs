//! Types reported by the synchronization pipeline.
//!
//! Per-file and per-issue problems never abort a run. They are collected
//! here so the CLI can print a summary (or JSON) once the batch is done.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::model::{Issue, Phase};

/// What the synchronizer does with an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No `id` yet: create a new remote issue.
    Create,
    /// Has an `id`: update the existing remote issue.
    Update,
}

impl Action {
    /// Decide the action from the issue's `id` field.
    #[must_use]
    pub fn for_issue(issue: &Issue) -> Self {
        if issue.exists_remotely() {
            Self::Update
        } else {
            Self::Create
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// Step of the per-issue pipeline at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ParseId,
    ResolveType,
    LookupIssue,
    Create,
    Update,
    WriteBack,
    ResolveProject,
    LinkProject,
}

impl Stage {
    /// Whether a failure at this stage means the issue was not synchronized.
    ///
    /// Later stages fail after GitHub already holds the issue.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::ParseId | Self::ResolveType | Self::LookupIssue | Self::Create | Self::Update
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseId => "parse id",
            Self::ResolveType => "resolve issue type",
            Self::LookupIssue => "look up issue",
            Self::Create => "create",
            Self::Update => "update",
            Self::WriteBack => "write id back",
            Self::ResolveProject => "resolve project",
            Self::LinkProject => "link project",
        };
        f.write_str(name)
    }
}

/// An issue whose parent title matched no earlier issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    pub title: String,
    pub parent: String,
    pub phase: Phase,
}

/// An issue that was (or, in a dry run, would be) sent to GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueOutcome {
    pub title: String,
    pub file: PathBuf,
    pub action: Action,
    /// Remote issue number; `None` for a planned create
    pub number: Option<u64>,
    /// Project the issue was linked to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// A per-issue failure. The run continued past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueFailure {
    pub title: String,
    pub file: PathBuf,
    pub stage: Stage,
    pub message: String,
}

/// Result of one synchronization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// True when nothing was sent to GitHub
    pub dry_run: bool,
    /// Issues in the order they were processed
    pub outcomes: Vec<IssueOutcome>,
    pub failures: Vec<IssueFailure>,
    pub orphans: Vec<Orphan>,
    /// Run-scoped title to issue number map
    pub synced: BTreeMap<String, u64>,
}

impl SyncReport {
    /// Number of issues created (or planned for creation).
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(Action::Create)
    }

    /// Number of issues updated (or planned for update).
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(Action::Update)
    }

    /// Number of issues that could not be synchronized at all.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.iter().filter(|f| f.stage.is_blocking()).count()
    }

    /// Failures that happened after the issue reached GitHub.
    pub fn warnings(&self) -> impl Iterator<Item = &IssueFailure> {
        self.failures.iter().filter(|f| !f.stage.is_blocking())
    }

    fn count(&self, action: Action) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(stage: Stage) -> IssueFailure {
        IssueFailure {
            title: "A".into(),
            file: PathBuf::from("a.md"),
            stage,
            message: "boom".into(),
        }
    }

    #[test]
    fn test_action_for_issue() {
        assert_eq!(Action::for_issue(&Issue::new("a")), Action::Create);
        assert_eq!(Action::for_issue(&Issue::new("a").with_id("7")), Action::Update);
        assert_eq!(Action::for_issue(&Issue::new("a").with_id("  ")), Action::Create);
    }

    #[test]
    fn test_report_counts() {
        let mut report = SyncReport::default();
        for (title, action) in [("A", Action::Create), ("B", Action::Update), ("C", Action::Create)] {
            report.outcomes.push(IssueOutcome {
                title: title.into(),
                file: PathBuf::new(),
                action,
                number: Some(1),
                project: None,
            });
        }
        report.failures.push(failure(Stage::Update));
        report.failures.push(failure(Stage::LinkProject));

        assert_eq!(report.created(), 2);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let mut report = SyncReport::default();
        report.failures.push(failure(Stage::WriteBack));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["stage"], "write_back");
        assert_eq!(json["dry_run"], false);
    }
}
