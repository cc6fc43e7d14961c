//! Error types for md2issues.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=not_found, 4=validation, 6=remote, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for md2issues operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not Found (exit 3)
    NotFound,

    // Validation (exit 4)
    InvalidArgument,
    InvalidIssueId,
    FrontMatterError,

    // Remote API (exit 6)
    GitHubError,
    HttpError,

    // Config / auth (exit 7)
    ConfigError,
    MissingToken,

    // I/O (exit 8)
    IoError,
    DirectoryUnreadable,
    JsonError,
    YamlError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidIssueId => "INVALID_ISSUE_ID",
            Self::FrontMatterError => "FRONT_MATTER_ERROR",
            Self::GitHubError => "GITHUB_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::MissingToken => "MISSING_TOKEN",
            Self::IoError => "IO_ERROR",
            Self::DirectoryUnreadable => "DIRECTORY_UNREADABLE",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotFound => 3,
            Self::InvalidArgument | Self::InvalidIssueId | Self::FrontMatterError => 4,
            Self::GitHubError | Self::HttpError => 6,
            Self::ConfigError | Self::MissingToken => 7,
            Self::IoError | Self::DirectoryUnreadable | Self::JsonError | Self::YamlError => 8,
        }
    }

    /// Whether retrying the same command may succeed.
    ///
    /// True for transport failures. No retry is attempted internally.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError | Self::GitHubError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in md2issues operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub token not found: GITHUB_TOKEN is unset and the gh hosts file has no token")]
    MissingToken,

    #[error("Cannot read issue directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front matter in {}: {reason}", path.display())]
    FrontMatter { path: PathBuf, reason: String },

    #[error("Invalid issue id '{id}': expected a positive issue number")]
    InvalidIssueId { id: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingToken => ErrorCode::MissingToken,
            Self::DirectoryUnreadable { .. } => ErrorCode::DirectoryUnreadable,
            Self::FrontMatter { .. } => ErrorCode::FrontMatterError,
            Self::InvalidIssueId { .. } => ErrorCode::InvalidIssueId,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::GitHub(_) => ErrorCode::GitHubError,
            Self::Http(_) => ErrorCode::HttpError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Yaml(_) => ErrorCode::YamlError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingToken => Some(
                "Export GITHUB_TOKEN=<token>, or run `gh auth login` so the token \
                 lands in the gh hosts file"
                    .to_string(),
            ),

            Self::DirectoryUnreadable { path, .. } => Some(format!(
                "Check that '{}' exists, or pass another folder with --folder",
                path.display()
            )),

            Self::FrontMatter { .. } => Some(
                "Issue files start with a `---` line, list `key: value` pairs, \
                 and close the block with another `---` line"
                    .to_string(),
            ),

            Self::InvalidIssueId { id } => Some(format!(
                "Fix or remove the `id: {id}` line; a missing id creates a new issue"
            )),

            Self::NotFound { kind, .. } if *kind == "Project" => Some(
                "Project names are matched against the organization's Projects (v2) titles"
                    .to_string(),
            ),

            Self::InvalidArgument(msg) if msg.contains("owner") => Some(
                "Pass --owner, or run inside a clone whose origin remote points at GitHub"
                    .to_string(),
            ),

            Self::Config(_) => Some(
                "Fix the gh hosts file, run `gh auth login` again, or export GITHUB_TOKEN"
                    .to_string(),
            ),

            Self::Http(_) => {
                Some("Check network access to the GitHub API and try again".to_string())
            }

            Self::NotFound { .. }
            | Self::GitHub(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
