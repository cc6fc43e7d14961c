//! Info command implementation.

use colored::Colorize;
use tracing::debug;

use super::{current_dir, resolve_repo};
use crate::cli::RepoArgs;
use crate::config::resolve_token;
use crate::error::{Error, Result};
use crate::github::GitHubClient;

/// Execute the info command.
///
/// # Errors
///
/// Returns an error if no token is available, the repository cannot be
/// determined, or GitHub rejects the request.
pub fn execute(args: &RepoArgs, json: bool) -> Result<()> {
    let token = resolve_token()?;
    let repo = resolve_repo(args, &current_dir()?)?;
    debug!(repo = %repo, "Fetching repository info");

    let client = GitHubClient::new(token)?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    let info = rt.block_on(client.repository_info(&repo))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", format!("{}/{}", info.owner, info.name).bold());
    if let Some(description) = &info.description {
        println!("  {description}");
    }
    println!();
    println!("  URL:            {}", info.url);
    println!("  Visibility:     {}", info.visibility.to_lowercase());
    if let Some(branch) = &info.default_branch {
        println!("  Default branch: {branch}");
    }
    println!("  Open issues:    {}", info.open_issues);
    if !info.has_issues_enabled {
        println!("  {}", "Issues are disabled for this repository".yellow());
    }
    println!("  Node id:        {}", info.id.dimmed());
    Ok(())
}
