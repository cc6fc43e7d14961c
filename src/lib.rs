//! md2issues - markdown files to GitHub issues
//!
//! Reads a folder of markdown files with front matter, orders them so
//! parents come before children (epics last), and creates or updates the
//! matching GitHub issues. New issue numbers are written back into the
//! files, so running it again updates instead of duplicating.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - The `Issue` entity
//! - [`markdown`] - Front matter parsing and `id` write-back
//! - [`sync`] - Collection, dependency sorting, synchronization
//! - [`github`] - `IssueTracker` seam and the GraphQL client
//! - [`config`] - Token, endpoint and repository resolution
//! - [`scaffold`] - Example issue file generation
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod markdown;
pub mod model;
pub mod scaffold;
pub mod sync;

pub use error::{Error, Result};
