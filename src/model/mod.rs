//! Data models for md2issues.
//!
//! - Issue (one markdown file)
//! - Phase (ordering tier)

pub mod issue;

pub use issue::{Issue, Phase, is_markdown, normalize_title, parse_labels};
