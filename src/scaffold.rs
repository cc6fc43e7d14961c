//! Example issue files.
//!
//! `md2issues examples` writes ready-to-sync markdown files showing every
//! front matter key and the body sections each issue type usually carries.
//! Without a type it writes a linked set (epics with sub-epics, tasks, bugs
//! and features with parents) that exercises the dependency ordering.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::{Error, Result};

/// Issue types an example can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    Epic,
    Task,
    Bug,
    Feature,
}

impl ExampleKind {
    pub const ALL: [Self; 4] = [Self::Epic, Self::Task, Self::Bug, Self::Feature];

    /// Value written to the `type:` key.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Epic => "Epic",
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Feature => "Feature",
        }
    }

    /// File name used for a single generated example.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}-example.md", self.type_name().to_lowercase())
    }
}

impl FromStr for ExampleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "epic" => Ok(Self::Epic),
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(Error::InvalidArgument(format!(
                "unknown issue type '{s}'. Available types: epic, task, bug, feature"
            ))),
        }
    }
}

/// Content of one body section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
}

impl Block {
    fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Bullets(items) | Self::Numbered(items) => items.is_empty(),
        }
    }
}

/// An example issue before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleIssue {
    pub kind: ExampleKind,
    pub title: String,
    pub project: String,
    pub status: String,
    pub labels: String,
    pub parent: String,
    pub description: String,
    pub sections: Vec<(&'static str, Block)>,
}

/// Values given on the command line that replace the example defaults.
#[derive(Debug, Clone, Default)]
pub struct ExampleOverrides {
    pub title: Option<String>,
    pub project: Option<String>,
    pub status: Option<String>,
    pub labels: Option<String>,
    pub parent: Option<String>,
    pub description: Option<String>,
}

impl ExampleOverrides {
    fn apply(&self, issue: &mut ExampleIssue) {
        let fields = [
            (&self.title, &mut issue.title),
            (&self.project, &mut issue.project),
            (&self.status, &mut issue.status),
            (&self.labels, &mut issue.labels),
            (&self.parent, &mut issue.parent),
            (&self.description, &mut issue.description),
        ];
        for (value, target) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                *target = value.to_string();
            }
        }
    }
}

fn bullets(items: &[&str]) -> Block {
    Block::Bullets(items.iter().map(|s| (*s).to_string()).collect())
}

fn numbered(items: &[&str]) -> Block {
    Block::Numbered(items.iter().map(|s| (*s).to_string()).collect())
}

fn text(value: &str) -> Block {
    Block::Text(value.to_string())
}

impl ExampleIssue {
    fn new(kind: ExampleKind, title: &str, project: &str, status: &str, labels: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            project: project.to_string(),
            status: status.to_string(),
            labels: labels.to_string(),
            parent: String::new(),
            description: String::new(),
            sections: Vec::new(),
        }
    }

    #[must_use]
    fn parent(mut self, parent: &str) -> Self {
        self.parent = parent.to_string();
        self
    }

    #[must_use]
    fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    #[must_use]
    fn section(mut self, heading: &'static str, block: Block) -> Self {
        self.sections.push((heading, block));
        self
    }

    /// Generic example for `kind`, used by `examples --type`.
    #[must_use]
    pub fn template(kind: ExampleKind) -> Self {
        let base = Self::new(
            kind,
            &format!("Example {} Title", kind.type_name()),
            "Example Project",
            "todo",
            "",
        );
        match kind {
            ExampleKind::Epic => Self {
                status: "planning".into(),
                labels: "epic, example".into(),
                ..base
            }
            .description("This is an example epic description with comprehensive details about the feature or initiative.")
            .section("Implementation Details", bullets(&[
                "Define architecture and technical approach",
                "Break down into smaller tasks",
                "Establish acceptance criteria",
            ]))
            .section("Technical Requirements", bullets(&[
                "Scalable design for future growth",
                "Performance requirements defined",
                "Security considerations addressed",
            ]))
            .section("Testing Strategy", bullets(&[
                "Unit testing for all components",
                "Integration testing strategy",
                "User acceptance testing plan",
            ])),
            ExampleKind::Task => Self {
                labels: "task, example".into(),
                ..base
            }
            .description("This is an example task description with specific implementation details.")
            .section("Implementation Details", bullets(&[
                "Implement core functionality",
                "Add error handling",
                "Write documentation",
            ]))
            .section("Technical Requirements", bullets(&[
                "Response time < 500ms",
                "Handle concurrent requests",
                "Follow coding standards",
            ]))
            .section("Testing Strategy", bullets(&[
                "Unit tests for business logic",
                "Integration tests for APIs",
                "Performance testing",
            ])),
            ExampleKind::Bug => Self {
                status: "open".into(),
                labels: "bug, example".into(),
                ..base
            }
            .description("This is an example bug description with reproduction steps and expected behavior.")
            .section("Steps to Reproduce", numbered(&[
                "Navigate to the affected page",
                "Perform the specific action",
                "Observe the unexpected behavior",
            ]))
            .section("Expected Result", text("The feature should work as designed"))
            .section("Actual Result", text("The feature exhibits unexpected behavior"))
            .section("Environment", bullets(&[
                "Browser: Chrome, Firefox",
                "OS: Windows, macOS",
                "Version: Latest",
            ]))
            .section("Impact", bullets(&[
                "Severity: Medium",
                "Priority: High",
                "Affected users: Users experiencing the specific workflow",
                "Business impact: Moderate impact on user experience",
            ]))
            .section("Workaround", text("Temporary workaround available"))
            .section("Root Cause", bullets(&[
                "Race condition in state management",
                "Insufficient validation",
            ]))
            .section("Fix", numbered(&[
                "Add proper state synchronization",
                "Implement validation checks",
                "Add error handling",
            ])),
            ExampleKind::Feature => Self {
                status: "backlog".into(),
                labels: "feature, example, enhancement".into(),
                ..base
            }
            .description("This is an example feature description with user value and implementation approach.")
            .section("Implementation Details", bullets(&[
                "Design user interface components",
                "Implement backend API endpoints",
                "Add data persistence layer",
            ]))
            .section("Design Requirements", bullets(&[
                "Consistent with design system",
                "User-friendly interface",
                "Clear visual hierarchy",
            ]))
            .section("Testing Strategy", bullets(&[
                "Usability testing with target users",
                "A/B testing for feature adoption",
                "Performance testing under load",
            ])),
        }
    }

    /// Render as a markdown file with front matter.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        let keys = [
            ("title", self.title.as_str()),
            ("type", self.kind.type_name()),
            ("project", self.project.as_str()),
            ("status", self.status.as_str()),
            ("labels", self.labels.as_str()),
            ("parent", self.parent.as_str()),
        ];
        for (key, value) in keys {
            if !value.trim().is_empty() {
                let _ = writeln!(out, "{key}: {value}");
            }
        }
        out.push_str("---\n");

        if !self.description.trim().is_empty() {
            let _ = write!(out, "\n## Description\n\n{}\n", self.description.trim());
        }

        for (heading, block) in self.sections.iter().filter(|(_, b)| !b.is_empty()) {
            let _ = write!(out, "\n## {heading}\n\n");
            match block {
                Block::Text(text) => {
                    let _ = writeln!(out, "{}", text.trim());
                }
                Block::Bullets(items) => {
                    for item in items {
                        let _ = writeln!(out, "- {item}");
                    }
                }
                Block::Numbered(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        let _ = writeln!(out, "{}. {item}", idx + 1);
                    }
                }
            }
        }
        out
    }
}

/// The linked example set, paired with output file names.
#[must_use]
pub fn example_set() -> Vec<(&'static str, ExampleIssue)> {
    use ExampleKind::{Bug, Epic, Feature, Task};

    const AUTH_EPIC: &str = "User Authentication System Epic";
    const SEARCH_FEATURE: &str = "Advanced Search and Filtering System";

    vec![
        (
            "epic-parent-example.md",
            ExampleIssue::new(Epic, AUTH_EPIC, "Auth Team", "in-progress", "epic, high-priority, authentication")
                .description("Implement a comprehensive user authentication system including login, registration, password reset, multi-factor authentication, and user session management.")
                .section("Implementation Details", bullets(&[
                    "Use JWT for session management",
                    "Implement OAuth2 for third-party authentication",
                    "Password hashing with bcrypt",
                    "Rate limiting for authentication endpoints",
                    "Comprehensive logging and monitoring",
                ])),
        ),
        (
            "epic-child-example.md",
            ExampleIssue::new(Epic, "Multi-Factor Authentication Sub-Epic", "Auth Team", "backlog", "epic, security, mfa")
                .parent(AUTH_EPIC)
                .description("Implement multi-factor authentication (MFA) capabilities as part of the broader authentication system. This includes SMS, email, and authenticator app support.")
                .section("Implementation Details", bullets(&[
                    "Integration with SMS providers",
                    "TOTP library integration",
                    "Secure backup code generation",
                    "User-friendly enrollment process",
                ])),
        ),
        (
            "task-with-parent-example.md",
            ExampleIssue::new(Task, "Implement User Registration API", "Auth Team", "todo", "backend, api, registration")
                .parent(AUTH_EPIC)
                .description("Create API endpoints for user registration including email validation, password strength requirements, and duplicate email checking.")
                .section("Technical Requirements", bullets(&[
                    "Response time < 500ms",
                    "Support for 1000+ concurrent registrations",
                    "Secure password storage",
                ]))
                .section("Testing Strategy", bullets(&[
                    "Unit tests for validation logic",
                    "Integration tests for database operations",
                    "Load testing for concurrent users",
                ])),
        ),
        (
            "task-standalone-example.md",
            ExampleIssue::new(Task, "Setup Monitoring Dashboard", "DevOps Team", "in-progress", "monitoring, infrastructure, grafana")
                .description("Set up a monitoring dashboard to track application performance, system metrics, and user activity.")
                .section("Implementation Details", bullets(&[
                    "Deploy Grafana on Kubernetes",
                    "Configure Prometheus data sources",
                    "Create custom dashboards",
                    "Set up alert notifications",
                ])),
        ),
        (
            "bug-with-parent-example.md",
            ExampleIssue::new(Bug, "Fix Password Reset Email Not Sending", "Auth Team", "open", "bug, critical, email, password-reset")
                .parent(AUTH_EPIC)
                .description("Users are not receiving password reset emails. The reset request appears to succeed but no email is delivered.")
                .section("Steps to Reproduce", numbered(&[
                    "Go to login page",
                    "Click \"Forgot Password\"",
                    "Enter valid email address",
                    "Click \"Send Reset Link\"",
                    "Check email inbox and spam folder",
                ]))
                .section("Expected Result", text("Password reset email is received within 2-3 minutes"))
                .section("Actual Result", text("No email is received"))
                .section("Impact", bullets(&[
                    "Severity: Critical",
                    "Priority: High",
                    "Affected users: All users requesting password reset",
                    "Business impact: Users cannot recover their accounts",
                ]))
                .section("Workaround", text("Customer support can manually reset passwords through the admin panel."))
                .section("Fix", numbered(&[
                    "Update email service API credentials",
                    "Adjust rate limiting configuration",
                    "Implement email queue monitoring",
                    "Add retry mechanism for failed emails",
                ])),
        ),
        (
            "bug-standalone-example.md",
            ExampleIssue::new(Bug, "Memory Leak in File Upload Component", "Frontend Team", "confirmed", "bug, performance, memory-leak, file-upload")
                .description("The file upload component leaks memory when uploading large files or several files in succession.")
                .section("Steps to Reproduce", numbered(&[
                    "Open developer tools and monitor memory usage",
                    "Navigate to file upload page",
                    "Upload multiple large files (>10MB) consecutively",
                    "Observe memory usage in dev tools",
                ]))
                .section("Expected Result", text("Memory usage returns to baseline after uploads complete"))
                .section("Actual Result", text("Memory usage increases with each upload and is never freed"))
                .section("Investigation Notes", bullets(&[
                    "Issue occurs in all modern browsers",
                    "More pronounced with image files",
                    "Suspect blob URLs not being cleaned up",
                ])),
        ),
        (
            "feature-parent-example.md",
            ExampleIssue::new(Feature, SEARCH_FEATURE, "Product Team", "planning", "feature, search, user-experience, enhancement")
                .description("Implement an advanced search and filtering system that allows users to find content quickly using multiple criteria, saved searches, and suggestions.")
                .section("Technical Requirements", bullets(&[
                    "Search response time < 200ms",
                    "Support for 1000+ concurrent searches",
                    "Internationalization support",
                ])),
        ),
        (
            "feature-child-example.md",
            ExampleIssue::new(Feature, "Search Autocomplete and Suggestions", "Product Team", "backlog", "feature, search, autocomplete, ui")
                .parent(SEARCH_FEATURE)
                .description("Implement autocomplete and search suggestions to help users formulate better queries.")
                .section("Implementation Details", bullets(&[
                    "Debounced API calls (300ms delay)",
                    "Trie for prefix matching",
                    "Levenshtein distance for typo correction",
                    "LRU cache for popular suggestions",
                ])),
        ),
        (
            "feature-standalone-example.md",
            ExampleIssue::new(Feature, "Dark Mode Theme Support", "Frontend Team", "ready", "feature, ui, theme, accessibility")
                .description("Add dark mode theme support across the application.")
                .section("Design Requirements", bullets(&[
                    "Consistent color palette across components",
                    "Proper contrast ratios (4.5:1 for normal text)",
                    "Brand colors adapted for dark backgrounds",
                ])),
        ),
    ]
}

/// Write the linked example set into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn generate_all(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    example_set()
        .into_iter()
        .map(|(name, issue)| write_example(dir, name, &issue))
        .collect()
}

/// Write a single `<type>-example.md` with `overrides` applied.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn generate_single(
    dir: &Path,
    kind: ExampleKind,
    overrides: &ExampleOverrides,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let mut issue = ExampleIssue::template(kind);
    overrides.apply(&mut issue);
    write_example(dir, &kind.file_name(), &issue)
}

fn write_example(dir: &Path, name: &str, issue: &ExampleIssue) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, issue.render())?;
    info!(file = %path.display(), title = %issue.title, "Created example file");
    Ok(path)
}
