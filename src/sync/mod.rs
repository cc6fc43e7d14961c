//! Markdown to GitHub synchronization.
//!
//! The pipeline runs in three steps:
//!
//! - **Collect**: read every file of a directory into an `Issue`
//! - **Sort**: order issues so parents precede children, epics last
//! - **Sync**: create or update each issue, write new ids back, link projects
//!
//! # Example
//!
//! ```ignore
//! use md2issues::sync::{read_issue_files, sort_by_dependency, Synchronizer};
//!
//! let collected = read_issue_files(Path::new("issues"))?;
//! let sorted = sort_by_dependency(collected.issues);
//! let report = Synchronizer::new(&client, &repo).sync(sorted).await;
//! println!("{} created, {} updated", report.created(), report.updated());
//! ```

mod collect;
mod engine;
mod sort;
mod types;

pub use collect::{Collected, SkippedFile, issue_from_front_matter, read_issue_files};
pub use engine::{Synchronizer, parse_issue_number, plan};
pub use sort::{SortedIssues, sort_by_dependency};
pub use types::{Action, IssueFailure, IssueOutcome, Orphan, Stage, SyncReport};
