//! Command implementations.

pub mod completions;
pub mod create;
pub mod examples;
pub mod info;
pub mod list;
pub mod version;

use std::path::Path;
use tracing::debug;

use crate::cli::RepoArgs;
use crate::config::infer_repo;
use crate::error::{Error, Result};
use crate::github::RepoRef;

/// Resolve the target repository from flags, the git checkout, and `cwd`.
///
/// Priority for each part:
/// 1. `--owner` / `--repo`
/// 2. The `origin` remote of the checkout at `cwd`
/// 3. Repository name only: the base name of `cwd`
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the owner (or name) stays unknown.
pub fn resolve_repo(args: &RepoArgs, cwd: &Path) -> Result<RepoRef> {
    let given = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };
    let (owner, name) = (given(&args.owner), given(&args.repo));

    let inferred = if owner.is_none() || name.is_none() {
        infer_repo(cwd)
    } else {
        None
    };
    if inferred.is_none() {
        debug!(dir = %cwd.display(), "No GitHub origin remote found");
    }

    let owner = owner
        .or_else(|| inferred.as_ref().map(|r| r.owner.clone()))
        .ok_or_else(|| {
            Error::InvalidArgument(
                "repository owner is unknown and could not be inferred from git".to_string(),
            )
        })?;

    let name = name
        .or_else(|| inferred.map(|r| r.name))
        .or_else(|| {
            cwd.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .ok_or_else(|| Error::InvalidArgument("repository name is unknown".to_string()))?;

    Ok(RepoRef::new(owner, name))
}

/// Current working directory.
pub(crate) fn current_dir() -> Result<std::path::PathBuf> {
    std::env::current_dir()
        .map_err(|e| Error::Other(format!("Failed to get current directory: {e}")))
}
