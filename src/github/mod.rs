//! GitHub access.
//!
//! The synchronizer talks to GitHub only through the [`IssueTracker`]
//! trait. [`GitHubClient`] implements it over the GraphQL API; tests use an
//! in-memory tracker.

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::GitHubClient;
pub use types::{IssueInput, RemoteIssue, RepoRef, RepositoryInfo};

use crate::error::Result;
use std::future::Future;

/// Remote issue operations consumed by the synchronizer.
///
/// Every call is an independent network request that may fail; callers
/// decide whether a failure is fatal for the current issue.
pub trait IssueTracker: Send + Sync {
    /// Create an issue and return its number and node id.
    fn create_issue(
        &self,
        repo: &RepoRef,
        input: &IssueInput,
    ) -> impl Future<Output = Result<RemoteIssue>> + Send;

    /// Update the issue with node id `node_id`.
    ///
    /// When `input.parent_id` is set the parent link is replaced as well.
    fn update_issue(
        &self,
        repo: &RepoRef,
        node_id: &str,
        input: &IssueInput,
    ) -> impl Future<Output = Result<RemoteIssue>> + Send;

    /// Look up the node id of issue `number`.
    fn resolve_issue_node_id(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Find an issue by exact (case-insensitive) title and return its node id.
    ///
    /// Title search can be ambiguous; the first exact match wins.
    fn resolve_parent_id(
        &self,
        repo: &RepoRef,
        title: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Map label names to node ids. Unknown names are dropped.
    fn resolve_label_ids(
        &self,
        repo: &RepoRef,
        names: &[String],
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Map an issue type name (e.g. "Bug") to its node id.
    fn resolve_issue_type_id(
        &self,
        repo: &RepoRef,
        name: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Find an organization project (v2) by title and return its node id.
    fn resolve_project_id(
        &self,
        owner: &str,
        name: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Add an issue to a project. An issue already in the project is a success.
    fn add_to_project(
        &self,
        issue_node_id: &str,
        project_node_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}
