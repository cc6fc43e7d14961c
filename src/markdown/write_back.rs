//! Persisting GitHub issue numbers into source files.
//!
//! After GitHub creates an issue, its number is stored as an `id:` line in
//! the file's front matter so the next run updates instead of creating.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Record `number` as the `id` of the issue stored at `path`.
///
/// Symlinks are resolved first so the id lands in the file they point at
/// and the link itself survives.
///
/// # Errors
///
/// Returns an error if the file cannot be read or rewritten.
pub fn write_issue_id(path: &Path, number: u64) -> Result<()> {
    let target = fs::canonicalize(path)?;
    let content = fs::read_to_string(&target)?;
    let updated = set_front_matter_id(&content, number);
    atomic_write(&target, &updated)
}

/// Return `content` with its `id:` line set to `number`.
///
/// An existing `id:` line inside the front matter is replaced in place.
/// Otherwise the line is inserted just before the closing delimiter, or
/// appended when the file has no complete front matter block. CRLF files
/// keep CRLF on the new line.
pub fn set_front_matter_id(content: &str, number: u64) -> String {
    let id_line = if content.contains("\r\n") {
        format!("id: {number}\r")
    } else {
        format!("id: {number}")
    };
    let mut lines: Vec<&str> = content.split('\n').collect();

    let mut delimiters = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .map(|(idx, _)| idx);
    let block = match (delimiters.next(), delimiters.next()) {
        (Some(open), Some(close)) => Some((open, close)),
        _ => None,
    };

    let Some((open, close)) = block else {
        // A trailing newline leaves an empty last element; keep it last.
        if lines.last().is_some_and(|l| l.is_empty()) && lines.len() > 1 {
            let at = lines.len() - 1;
            lines.insert(at, id_line.as_str());
            return lines.join("\n");
        }
        let eol = if id_line.ends_with('\r') { "\r\n" } else { "\n" };
        return format!("{content}{eol}{}", id_line.trim_end_matches('\r'));
    };

    let existing = (open + 1..close).find(|&idx| lines[idx].trim_start().starts_with("id:"));
    match existing {
        Some(idx) => lines[idx] = id_line.as_str(),
        None => lines.insert(close, id_line.as_str()),
    }
    lines.join("\n")
}

/// Write content to a file via a temporary sibling and a rename.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_sibling(path);

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
