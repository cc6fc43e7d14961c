//! Markdown issue files.
//!
//! - [`front_matter`] - extract `key: value` records from a file
//! - [`write_back`] - persist the GitHub issue number into a file

pub mod front_matter;
pub mod write_back;

pub use front_matter::{FieldValue, FrontMatter, parse_front_matter, read_front_matter};
pub use write_back::{set_front_matter_id, write_issue_id};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::is_markdown;

/// List the non-directory entries of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns `Error::DirectoryUnreadable` if the directory cannot be listed.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source: std::io::Error| Error::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        // Follows symlinks, so a link to a file counts as a file.
        if entry.path().is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

/// List the `.md` files of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns `Error::DirectoryUnreadable` if the directory cannot be listed.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(|path| is_markdown(path))
        .collect())
}
