//! Dependency ordering of issues.
//!
//! Issues are sent to GitHub one at a time, and a child can only be linked
//! to a parent that already exists there. The sorter therefore places every
//! parent before its children, in two phases: all regular issues first,
//! then all epics.
//!
//! Within a phase, parentless issues are placed first in input order. The
//! remaining issues are then scanned in waves: an issue is placed as soon
//! as an issue with its parent title has been placed, including one placed
//! earlier in the same wave. A wave that places nothing means the rest
//! reference unknown titles or form a cycle; they are flushed as orphans
//! so no issue is ever dropped.

use std::collections::HashMap;
use tracing::warn;

use super::types::Orphan;
use crate::model::{Issue, Phase};

/// Issues in creation order, plus the ones whose parent was never found.
#[derive(Debug, Clone, Default)]
pub struct SortedIssues {
    pub issues: Vec<Issue>,
    pub orphans: Vec<Orphan>,
}

impl SortedIssues {
    /// Titles in sorted order.
    pub fn titles(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.title.as_str()).collect()
    }
}

/// Order `issues` so that parents precede children and epics come last.
pub fn sort_by_dependency(issues: Vec<Issue>) -> SortedIssues {
    let mut sorter = DependencySorter::with_capacity(issues.len());
    let (regular, epics): (Vec<Issue>, Vec<Issue>) = issues
        .into_iter()
        .partition(|issue| issue.phase() == Phase::Regular);

    sorter.place_phase(Phase::Regular, regular);
    sorter.place_phase(Phase::Epic, epics);
    sorter.finish()
}

/// Accumulates the sorted output across both phases.
struct DependencySorter {
    output: Vec<Issue>,
    /// Normalized title to the index of the first issue placed with it
    placed: HashMap<String, usize>,
    orphans: Vec<Orphan>,
}

impl DependencySorter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            placed: HashMap::with_capacity(capacity),
            orphans: Vec::new(),
        }
    }

    fn place(&mut self, issue: Issue) {
        // First title wins when titles collide.
        self.placed
            .entry(issue.title_key())
            .or_insert(self.output.len());
        self.output.push(issue);
    }

    fn is_ready(&self, issue: &Issue) -> bool {
        issue
            .parent_key()
            .is_some_and(|parent| self.placed.contains_key(&parent))
    }

    fn place_phase(&mut self, phase: Phase, issues: Vec<Issue>) {
        let (roots, mut pending): (Vec<Issue>, Vec<Issue>) = issues
            .into_iter()
            .partition(|issue| issue.parent_key().is_none());

        for issue in roots {
            self.place(issue);
        }

        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::with_capacity(before);

            for issue in pending {
                if self.is_ready(&issue) {
                    self.place(issue);
                } else {
                    waiting.push(issue);
                }
            }

            if waiting.len() == before {
                for issue in waiting {
                    warn!(
                        issue = %issue.title,
                        parent = %issue.parent.trim(),
                        phase = %phase,
                        "Parent not found among earlier issues; placing issue anyway"
                    );
                    self.orphans.push(Orphan {
                        title: issue.title.clone(),
                        parent: issue.parent.trim().to_string(),
                        phase,
                    });
                    self.place(issue);
                }
                break;
            }

            pending = waiting;
        }
    }

    fn finish(self) -> SortedIssues {
        SortedIssues {
            issues: self.output,
            orphans: self.orphans,
        }
    }
}
