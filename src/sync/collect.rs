//! Issue collection: one `Issue` per file in a directory.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::markdown::{FrontMatter, list_files, read_front_matter};
use crate::model::{Issue, parse_labels};

/// A file that could not be turned into an issue.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Issues read from a directory, plus the files that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Issues in directory listing order
    pub issues: Vec<Issue>,
    pub skipped: Vec<SkippedFile>,
}

/// Read every non-directory entry of `dir` as an issue file.
///
/// A file whose front matter cannot be read or has no title is logged and
/// skipped; the rest of the directory is still processed.
///
/// # Errors
///
/// Returns `Error::DirectoryUnreadable` if `dir` cannot be listed.
pub fn read_issue_files(dir: &Path) -> Result<Collected> {
    let mut collected = Collected::default();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for path in list_files(dir)? {
        let issue = match read_front_matter(&path).and_then(|fm| issue_from_front_matter(&path, &fm))
        {
            Ok(issue) => issue,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Skipping issue file");
                collected.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let key = issue.title_key();
        if let Some(first) = seen.get(&key) {
            warn!(
                title = %issue.title,
                file = %path.display(),
                first = %first.display(),
                "Duplicate issue title; parent references bind to the first one"
            );
        } else {
            seen.insert(key, path.clone());
        }

        debug!(title = %issue.title, file = %path.display(), "Read issue");
        collected.issues.push(issue);
    }

    Ok(collected)
}

/// Build an `Issue` from a parsed record. Missing optional keys are empty.
///
/// # Errors
///
/// Returns `Error::FrontMatter` if the record has no title.
pub fn issue_from_front_matter(path: &Path, fm: &FrontMatter) -> Result<Issue> {
    let title = fm.text("title").trim().to_string();
    if title.is_empty() {
        return Err(Error::FrontMatter {
            path: path.to_path_buf(),
            reason: "missing `title`".to_string(),
        });
    }

    let body = if fm.body.is_empty() {
        fm.text("body")
    } else {
        fm.body.clone()
    };

    Ok(Issue {
        path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        title,
        body,
        labels: parse_labels(&fm.text("labels")),
        kind: fm.text("type"),
        id: fm.text("id"),
        project: fm.text("project"),
        parent: fm.text("parent"),
    })
}
