//! Create command implementation.
//!
//! Reads the issue folder, orders the issues, and synchronizes them into
//! the target repository. With `--dry-run` only the plan is printed.

use colored::Colorize;
use std::path::Path;
use tracing::info;

use super::{current_dir, resolve_repo};
use crate::cli::CreateArgs;
use crate::config::resolve_token;
use crate::error::{Error, Result};
use crate::github::{GitHubClient, RepoRef};
use crate::model::Issue;
use crate::sync::{
    Action, SkippedFile, SyncReport, Synchronizer, plan, read_issue_files, sort_by_dependency,
};

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if no token is available, the repository cannot be
/// determined, or the folder cannot be listed. Per-issue failures are
/// reported, not returned.
pub fn execute(args: &CreateArgs, dry_run: bool, json: bool) -> Result<()> {
    // Missing auth is fatal before any file is read.
    let token = if dry_run { None } else { Some(resolve_token()?) };

    let repo = resolve_repo(&args.repo, &current_dir()?)?;
    info!(repo = %repo, folder = %args.folder.display(), dry_run, "Synchronizing issues");

    let collected = read_issue_files(&args.folder)?;
    let mut issues = collected.issues;
    apply_overrides(&mut issues, args.project.as_deref(), args.parent.as_deref());
    let sorted = sort_by_dependency(issues);

    let report = match token {
        None => plan(sorted),
        Some(token) => {
            let client = GitHubClient::new(token)?;
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
            rt.block_on(Synchronizer::new(&client, &repo).sync(sorted))
        }
    };

    if json {
        let output = serde_json::json!({
            "success": report.failed() == 0,
            "repository": repo.to_string(),
            "folder": args.folder.display().to_string(),
            "created": report.created(),
            "updated": report.updated(),
            "failed": report.failed(),
            "skipped": collected.skipped,
            "report": report,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_report(&repo, &args.folder, &collected.skipped, &report);
    }
    Ok(())
}

/// Apply `--project` to every issue and `--parent` to parentless ones.
fn apply_overrides(issues: &mut [Issue], project: Option<&str>, parent: Option<&str>) {
    let project = project.map(str::trim).filter(|p| !p.is_empty());
    let parent = parent.map(str::trim).filter(|p| !p.is_empty());

    for issue in issues {
        if let Some(project) = project {
            issue.project = project.to_string();
        }
        if let Some(parent) = parent {
            // An issue cannot become its own parent.
            if issue.parent_key().is_none() && !issue.title.trim().eq_ignore_ascii_case(parent) {
                issue.parent = parent.to_string();
            }
        }
    }
}

fn print_report(repo: &RepoRef, folder: &Path, skipped: &[SkippedFile], report: &SyncReport) {
    if report.dry_run {
        println!(
            "Dry run for {} from {}",
            repo.to_string().bold(),
            folder.display()
        );
        println!();
        for outcome in &report.outcomes {
            let number = outcome.number.map(|n| format!("#{n} ")).unwrap_or_default();
            let action = match outcome.action {
                Action::Create => "create".green(),
                Action::Update => "update".cyan(),
            };
            println!("  {action}  {number}{}", outcome.title);
            if let Some(project) = &outcome.project {
                println!("          project: {project}");
            }
        }
    }

    for file in skipped {
        println!(
            "  {} {}: {}",
            "skipped".yellow(),
            file.path.display(),
            file.reason
        );
    }
    for orphan in &report.orphans {
        println!(
            "  {} {}: parent '{}' not found among earlier issues",
            "orphan".yellow(),
            orphan.title,
            orphan.parent
        );
    }
    for failure in &report.failures {
        let label = if failure.stage.is_blocking() {
            "failed".red()
        } else {
            "warning".yellow()
        };
        println!(
            "  {label} {} ({}): {}",
            failure.title, failure.stage, failure.message
        );
    }

    if !report.outcomes.is_empty() || !report.failures.is_empty() || !skipped.is_empty() {
        println!();
    }

    let summary = if report.dry_run {
        format!(
            "Would synchronize {} issues ({} to create, {} to update, {} invalid)",
            report.outcomes.len(),
            report.created(),
            report.updated(),
            report.failed()
        )
    } else {
        format!(
            "Synchronized {} issues ({} created, {} updated, {} failed)",
            report.synced.len(),
            report.created(),
            report.updated(),
            report.failed()
        )
    };

    if report.failed() > 0 {
        println!("{}", summary.red());
    } else {
        println!("{}", summary.green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_override_replaces_all() {
        let mut issues = vec![Issue::new("A"), Issue::new("B")];
        issues[1].project = "Old".into();

        apply_overrides(&mut issues, Some(" Roadmap "), None);

        assert!(issues.iter().all(|i| i.project == "Roadmap"));
    }

    #[test]
    fn test_default_parent_only_fills_gaps() {
        let mut issues = vec![
            Issue::new("A"),
            Issue::new("B").with_parent("A"),
            Issue::new("Umbrella"),
        ];

        apply_overrides(&mut issues, None, Some("umbrella"));

        assert_eq!(issues[0].parent, "umbrella");
        assert_eq!(issues[1].parent, "A");
        assert_eq!(issues[2].parent, "");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut issues = vec![Issue::new("A")];
        apply_overrides(&mut issues, Some("  "), Some(""));
        assert_eq!(issues[0], Issue::new("A"));
    }
}
