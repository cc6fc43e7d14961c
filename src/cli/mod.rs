//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Output format for commands that print results.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON (same as --json)
    Json,
}

/// Log level accepted by `--log-level`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// md2issues - turn a folder of markdown files into GitHub issues
#[derive(Parser, Debug)]
#[command(name = "md2issues", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (text, json)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Show what would be sent to GitHub without sending or writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level; overrides -v
    #[arg(long, value_enum, global = true, env = "MD2ISSUES_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update GitHub issues from markdown files
    Create(CreateArgs),

    /// List markdown issue files and their front matter
    List {
        /// Folder containing markdown issue files
        #[arg(short, long, default_value = "issues")]
        folder: PathBuf,
    },

    /// Show information about a GitHub repository
    Info(RepoArgs),

    /// Generate example issue files
    Examples(ExamplesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

/// Repository selection shared by commands that talk to GitHub.
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Repository owner (default: inferred from the origin remote)
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Repository name (default: inferred from the origin remote, else the current directory name)
    #[arg(short, long)]
    pub repo: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Folder containing markdown issue files
    #[arg(short, long, default_value = "issues")]
    pub folder: PathBuf,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Project (v2) to link every issue to, replacing per-file projects
    #[arg(short, long)]
    pub project: Option<String>,

    /// Parent title for issues that do not declare one
    #[arg(short = 'm', long)]
    pub parent: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExamplesArgs {
    /// Output directory for example files
    #[arg(short, long, default_value = "examples")]
    pub output: PathBuf,

    /// Generate a single example of this type (epic, task, bug, feature)
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Issue title
    #[arg(long)]
    pub title: Option<String>,

    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,

    /// Issue status
    #[arg(short, long)]
    pub status: Option<String>,

    /// Issue labels (comma-separated)
    #[arg(short, long)]
    pub labels: Option<String>,

    /// Parent issue title
    #[arg(long)]
    pub parent: Option<String>,

    /// Issue description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_defaults() {
        let cli = Cli::parse_from(["md2issues", "create"]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.folder, PathBuf::from("issues"));
        assert!(args.repo.owner.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_create_flags() {
        let cli = Cli::parse_from([
            "md2issues", "create", "-f", "docs/issues", "-o", "acme", "-r", "tools", "-p",
            "Roadmap", "-m", "Epic", "--dry-run",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.folder, PathBuf::from("docs/issues"));
        assert_eq!(args.repo.owner.as_deref(), Some("acme"));
        assert_eq!(args.repo.repo.as_deref(), Some("tools"));
        assert_eq!(args.project.as_deref(), Some("Roadmap"));
        assert_eq!(args.parent.as_deref(), Some("Epic"));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_log_level_flag() {
        let cli = Cli::parse_from(["md2issues", "--log-level", "debug", "version"]);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
    }
}
