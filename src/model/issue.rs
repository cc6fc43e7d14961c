//! Issue model.
//!
//! An `Issue` is one markdown-backed ticket. It is built once per source
//! file, and its `id` changes at most once: when GitHub creates the issue
//! and the number is written back into the file.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Ordering tier used by the dependency sorter.
///
/// Epics are always placed after every regular issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Regular,
    Epic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => f.write_str("regular"),
            Self::Epic => f.write_str("epic"),
        }
    }
}

/// A markdown-backed issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Directory containing the source file
    pub path: PathBuf,

    /// Source file name within `path`
    pub file_name: String,

    /// Issue title; also the key other issues use in `parent`
    pub title: String,

    /// Markdown body
    pub body: String,

    /// Label names
    pub labels: Vec<String>,

    /// Issue type name (e.g. "Epic", "Bug"); empty when untyped
    #[serde(rename = "type")]
    pub kind: String,

    /// GitHub issue number as written in the file; empty until created
    pub id: String,

    /// Project (v2) name to link the issue to; empty for none
    pub project: String,

    /// Title of the parent issue; empty for none
    pub parent: String,
}

impl Issue {
    /// Create an issue with only a title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the parent title.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Set the issue type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the GitHub issue number.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Full path of the source markdown file.
    pub fn source_file(&self) -> PathBuf {
        self.path.join(&self.file_name)
    }

    /// Whether this issue has already been created on GitHub.
    pub fn exists_remotely(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Trimmed issue type, or `None` when untyped.
    pub fn issue_type(&self) -> Option<&str> {
        let kind = self.kind.trim();
        (!kind.is_empty()).then_some(kind)
    }

    /// Ordering tier: epics (case-insensitive) go last.
    pub fn phase(&self) -> Phase {
        if self.kind.trim().eq_ignore_ascii_case("epic") {
            Phase::Epic
        } else {
            Phase::Regular
        }
    }

    /// Normalized title used as a lookup key.
    pub fn title_key(&self) -> String {
        normalize_title(&self.title)
    }

    /// Normalized parent title, or `None` when the issue has no parent.
    pub fn parent_key(&self) -> Option<String> {
        let parent = self.parent.trim();
        (!parent.is_empty()).then(|| normalize_title(parent))
    }

    /// Project name, or `None` when unset.
    pub fn project_name(&self) -> Option<&str> {
        let project = self.project.trim();
        (!project.is_empty()).then_some(project)
    }

    /// Display label for logs and output: title plus file name.
    pub fn describe(&self) -> String {
        if self.file_name.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.file_name)
        }
    }
}

/// Normalize a title for case-insensitive, whitespace-insensitive matching.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Split a comma-separated label list, dropping empty entries.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

/// Whether `path` names a markdown file.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
