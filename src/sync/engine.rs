//! Issue synchronizer.
//!
//! Drives sorted issues through GitHub one at a time. Issues without an
//! `id` are created and the new number is written back into their file;
//! issues with an `id` are updated. Afterwards the issue is linked to its
//! project, if it names one.
//!
//! Every failure is scoped to the issue it happened on: it is logged,
//! recorded in the [`SyncReport`], and the loop moves on.

use tracing::{debug, error, info, warn};

use super::sort::SortedIssues;
use super::types::{Action, IssueFailure, IssueOutcome, Stage, SyncReport};
use crate::error::{Error, Result};
use crate::github::{IssueInput, IssueTracker, RepoRef};
use crate::markdown::write_issue_id;
use crate::model::Issue;

type StepResult<T> = std::result::Result<T, (Stage, Error)>;

trait AtStage<T> {
    fn at(self, stage: Stage) -> StepResult<T>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> StepResult<T> {
        self.map_err(|e| (stage, e))
    }
}

/// Synchronizes issues into one repository.
pub struct Synchronizer<'a, T: IssueTracker> {
    tracker: &'a T,
    repo: &'a RepoRef,
}

impl<'a, T: IssueTracker> Synchronizer<'a, T> {
    pub fn new(tracker: &'a T, repo: &'a RepoRef) -> Self {
        Self { tracker, repo }
    }

    /// Create or update every issue, in order.
    pub async fn sync(&self, sorted: SortedIssues) -> SyncReport {
        let mut report = SyncReport {
            orphans: sorted.orphans,
            ..SyncReport::default()
        };

        for issue in sorted.issues {
            self.sync_one(&issue, &mut report).await;
        }

        info!(
            repo = %self.repo,
            synced = report.synced.len(),
            created = report.created(),
            updated = report.updated(),
            failed = report.failed(),
            "Synchronization finished"
        );
        report
    }

    async fn sync_one(&self, issue: &Issue, report: &mut SyncReport) {
        let action = Action::for_issue(issue);
        let result = match action {
            Action::Create => self.create(issue).await,
            Action::Update => self.update(issue).await,
        };

        let number = match result {
            Ok(number) => number,
            Err((stage, e)) => {
                error!(issue = %issue.describe(), stage = %stage, error = %e, "Failed to {action} issue");
                record_failure(report, issue, stage, &e);
                return;
            }
        };

        report.synced.insert(issue.title.clone(), number);
        let mut outcome = IssueOutcome {
            title: issue.title.clone(),
            file: issue.source_file(),
            action,
            number: Some(number),
            project: None,
        };

        if action == Action::Create {
            if let Err(e) = write_issue_id(&issue.source_file(), number) {
                // GitHub already has the issue; only the local file is stale.
                error!(
                    issue = %issue.describe(),
                    number,
                    error = %e,
                    "Created issue but could not record its id"
                );
                record_failure(report, issue, Stage::WriteBack, &e);
                report.outcomes.push(outcome);
                return;
            }
            debug!(issue = %issue.title, number, "Recorded issue id");
        }

        if let Some(project) = issue.project_name() {
            match self.link_project(number, project).await {
                Ok(()) => {
                    info!(issue = %issue.title, project, "Linked issue to project");
                    outcome.project = Some(project.to_string());
                }
                Err((stage, e)) => {
                    warn!(issue = %issue.describe(), project, error = %e, "Failed to link issue to project");
                    record_failure(report, issue, stage, &e);
                }
            }
        }

        report.outcomes.push(outcome);
    }

    async fn create(&self, issue: &Issue) -> StepResult<u64> {
        let input = self.build_input(issue).await?;
        let remote = self
            .tracker
            .create_issue(self.repo, &input)
            .await
            .at(Stage::Create)?;
        info!(issue = %issue.title, number = remote.number, "Created issue");
        Ok(remote.number)
    }

    async fn update(&self, issue: &Issue) -> StepResult<u64> {
        let number = parse_issue_number(&issue.id).at(Stage::ParseId)?;
        let input = self.build_input(issue).await?;
        let node_id = self
            .tracker
            .resolve_issue_node_id(self.repo, number)
            .await
            .at(Stage::LookupIssue)?;
        let remote = self
            .tracker
            .update_issue(self.repo, &node_id, &input)
            .await
            .at(Stage::Update)?;
        info!(issue = %issue.title, number = remote.number, "Updated issue");
        Ok(remote.number)
    }

    /// Resolve names to node ids.
    ///
    /// Unknown labels and an unresolvable parent only produce warnings; an
    /// unknown issue type fails the issue.
    async fn build_input(&self, issue: &Issue) -> StepResult<IssueInput> {
        let label_ids = if issue.labels.is_empty() {
            Vec::new()
        } else {
            match self.tracker.resolve_label_ids(self.repo, &issue.labels).await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(issue = %issue.title, error = %e, "Could not resolve labels; continuing without them");
                    Vec::new()
                }
            }
        };

        let parent = issue.parent.trim();
        let parent_id = if parent.is_empty() {
            None
        } else {
            match self.tracker.resolve_parent_id(self.repo, parent).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(issue = %issue.title, parent, error = %e, "Could not resolve parent issue");
                    None
                }
            }
        };

        let type_id = match issue.issue_type() {
            Some(kind) => Some(
                self.tracker
                    .resolve_issue_type_id(self.repo, kind)
                    .await
                    .at(Stage::ResolveType)?,
            ),
            None => None,
        };

        Ok(IssueInput {
            title: issue.title.clone(),
            body: issue.body.clone(),
            label_ids,
            parent_id,
            type_id,
        })
    }

    /// The issue's node id is looked up again by number so the link always
    /// targets what GitHub currently holds.
    async fn link_project(&self, number: u64, project: &str) -> StepResult<()> {
        let issue_node_id = self
            .tracker
            .resolve_issue_node_id(self.repo, number)
            .await
            .at(Stage::LinkProject)?;
        let project_id = self
            .tracker
            .resolve_project_id(&self.repo.owner, project)
            .await
            .at(Stage::ResolveProject)?;
        self.tracker
            .add_to_project(&issue_node_id, &project_id)
            .await
            .at(Stage::LinkProject)
    }
}

/// Report what a run would do, without contacting GitHub.
pub fn plan(sorted: SortedIssues) -> SyncReport {
    let mut report = SyncReport {
        dry_run: true,
        orphans: sorted.orphans,
        ..SyncReport::default()
    };

    for issue in sorted.issues {
        let action = Action::for_issue(&issue);
        let number = match action {
            Action::Create => None,
            Action::Update => match parse_issue_number(&issue.id) {
                Ok(number) => Some(number),
                Err(e) => {
                    record_failure(&mut report, &issue, Stage::ParseId, &e);
                    continue;
                }
            },
        };

        if let Some(number) = number {
            report.synced.insert(issue.title.clone(), number);
        }
        report.outcomes.push(IssueOutcome {
            title: issue.title.clone(),
            file: issue.source_file(),
            action,
            number,
            project: issue.project_name().map(String::from),
        });
    }

    report
}

/// Parse an `id` field as a GitHub issue number.
///
/// Accepts surrounding whitespace and a leading `#`.
///
/// # Errors
///
/// Returns `Error::InvalidIssueId` unless the id is a positive integer.
pub fn parse_issue_number(id: &str) -> Result<u64> {
    let trimmed = id.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    digits
        .parse::<u64>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::InvalidIssueId { id: id.to_string() })
}

fn record_failure(report: &mut SyncReport, issue: &Issue, stage: Stage, error: &Error) {
    report.failures.push(IssueFailure {
        title: issue.title.clone(),
        file: issue.source_file(),
        stage,
        message: error.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::MockTracker;
    use crate::sync::{read_issue_files, sort_by_dependency};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn repo() -> RepoRef {
        RepoRef::new("acme", "tools")
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    async fn run(tracker: &MockTracker, dir: &Path) -> SyncReport {
        let repo = repo();
        let issues = read_issue_files(dir).unwrap().issues;
        Synchronizer::new(tracker, &repo)
            .sync(sort_by_dependency(issues))
            .await
    }

    #[test]
    fn test_parse_issue_number() {
        assert_eq!(parse_issue_number("42").unwrap(), 42);
        assert_eq!(parse_issue_number(" #7 ").unwrap(), 7);
        assert!(parse_issue_number("0").is_err());
        assert!(parse_issue_number("-3").is_err());
        assert!(parse_issue_number("abc").is_err());
        assert!(parse_issue_number("").is_err());
    }

    #[tokio::test]
    async fn test_existing_id_takes_update_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: Known\nid: 42\n---\nBody\n");
        let tracker = (1..=42).fold(MockTracker::new(), |t, n| {
            t.with_existing_issue(&format!("Old {n}"))
        });

        let report = run(&tracker, dir.path()).await;

        assert!(tracker.creates().is_empty());
        assert_eq!(tracker.updates(), vec![42]);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.synced.get("Known"), Some(&42));
        assert_eq!(tracker.issue(42).unwrap().body, "Body");
        let content = fs::read_to_string(dir.path().join("a.md")).unwrap();
        assert_eq!(content, "---\ntitle: Known\nid: 42\n---\nBody\n");
    }

    #[tokio::test]
    async fn test_second_run_only_updates() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "1-epic.md", "---\ntitle: Epic\ntype: Epic\n---\n");
        write(dir.path(), "2-task.md", "---\ntitle: Task\nparent: Epic\n---\n");
        write(dir.path(), "3-bug.md", "---\ntitle: Bug\ntype: Bug\n---\n");
        let tracker = MockTracker::new()
            .with_issue_type("Epic")
            .with_issue_type("Bug");

        let first = run(&tracker, dir.path()).await;
        assert_eq!(first.created(), 3);
        assert!(first.failures.is_empty());
        // Bug has no parent so it is seeded before the orphaned task.
        assert_eq!(tracker.creates(), vec!["Bug", "Task", "Epic"]);
        assert_eq!(tracker.issue(3).unwrap().type_id.as_deref(), Some("IT_Epic"));
        // The epic did not exist yet when the task was created.
        assert_eq!(tracker.parent_of("Task"), None);

        let content = fs::read_to_string(dir.path().join("2-task.md")).unwrap();
        assert!(content.contains("id: 2\n"));

        let second = run(&tracker, dir.path()).await;
        assert_eq!(second.created(), 0);
        assert_eq!(second.updated(), 3);
        assert_eq!(tracker.creates().len(), 3);
        assert_eq!(tracker.updates(), vec![1, 2, 3]);
        assert_eq!(tracker.parent_of("Task"), Some("Epic".to_string()));
    }

    #[tokio::test]
    async fn test_parent_linked_on_create() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: Child\nparent: parent task\n---\n");
        write(dir.path(), "b.md", "---\ntitle: Parent Task\n---\n");
        let tracker = MockTracker::new();

        run(&tracker, dir.path()).await;

        assert_eq!(tracker.creates(), vec!["Parent Task", "Child"]);
        assert_eq!(tracker.parent_of("Child"), Some("Parent Task".to_string()));
    }

    #[tokio::test]
    async fn test_failure_does_not_block_other_issues() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: A\n---\n");
        write(dir.path(), "b.md", "---\ntitle: B\n---\n");
        write(dir.path(), "c.md", "---\ntitle: C\n---\n");
        let tracker = MockTracker::new().fail_for("B");

        let report = run(&tracker, dir.path()).await;

        assert_eq!(tracker.creates(), vec!["A", "B", "C"]);
        assert_eq!(report.created(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].title, "B");
        assert_eq!(report.failures[0].stage, Stage::Create);
        let b = fs::read_to_string(dir.path().join("b.md")).unwrap();
        assert!(!b.contains("id:"));
        let c = fs::read_to_string(dir.path().join("c.md")).unwrap();
        assert!(c.contains("id: 2"));
    }

    #[tokio::test]
    async fn test_unknown_type_fails_only_that_issue() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: Spike\ntype: Spike\n---\n");
        write(dir.path(), "b.md", "---\ntitle: Plain\n---\n");
        let tracker = MockTracker::new();

        let report = run(&tracker, dir.path()).await;

        assert_eq!(tracker.creates(), vec!["Plain"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, Stage::ResolveType);
    }

    #[tokio::test]
    async fn test_invalid_id_is_recorded() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: Broken\nid: abc\n---\n");
        let tracker = MockTracker::new();

        let report = run(&tracker, dir.path()).await;

        assert!(tracker.calls().is_empty());
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].stage, Stage::ParseId);
    }

    #[tokio::test]
    async fn test_labels_resolved_and_unknown_dropped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: A\nlabels: Bug, nope\n---\n");
        let tracker = MockTracker::new().with_label("bug");

        run(&tracker, dir.path()).await;

        assert_eq!(tracker.issue(1).unwrap().label_ids, vec!["LA_bug"]);
    }

    #[tokio::test]
    async fn test_project_linking() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: A\nproject: roadmap\n---\n");
        write(dir.path(), "b.md", "---\ntitle: B\nproject: Unknown\n---\n");
        write(dir.path(), "c.md", "---\ntitle: C\n---\n");
        let tracker = MockTracker::new().with_project("Roadmap");

        let report = run(&tracker, dir.path()).await;

        assert_eq!(
            tracker.links(),
            vec![("I_1".to_string(), "PVT_Roadmap".to_string())]
        );
        assert_eq!(report.created(), 3);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.outcomes[0].project.as_deref(), Some("roadmap"));
        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].title, "B");
        assert_eq!(warnings[0].stage, Stage::ResolveProject);
    }

    #[tokio::test]
    async fn test_write_back_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        let mut issue = Issue::new("Ghost file");
        issue.path = dir.path().join("missing");
        issue.file_name = "ghost.md".into();
        issue.project = "Roadmap".into();
        let tracker = MockTracker::new().with_project("Roadmap");
        let repo = repo();

        let report = Synchronizer::new(&tracker, &repo)
            .sync(sort_by_dependency(vec![issue, Issue::new("Next")]))
            .await;

        assert_eq!(tracker.creates(), vec!["Ghost file", "Next"]);
        assert_eq!(report.created(), 2);
        assert_eq!(report.synced.len(), 2);
        assert_eq!(report.failures[0].stage, Stage::WriteBack);
        assert!(tracker.links().is_empty());
    }

    #[tokio::test]
    async fn test_orphans_are_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "---\ntitle: Orphan\nparent: Ghost\n---\n");
        let tracker = MockTracker::new();

        let report = run(&tracker, dir.path()).await;

        assert_eq!(report.orphans.len(), 1);
        assert_eq!(tracker.creates(), vec!["Orphan"]);
    }

    #[test]
    fn test_plan_touches_nothing() {
        let issues = vec![
            Issue::new("New"),
            Issue::new("Old").with_id("9"),
            Issue::new("Bad").with_id("x"),
        ];

        let report = plan(sort_by_dependency(issues));

        assert!(report.dry_run);
        assert_eq!(report.created(), 1);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.synced.get("Old"), Some(&9));
        assert_eq!(report.outcomes[0].number, None);
    }
}
