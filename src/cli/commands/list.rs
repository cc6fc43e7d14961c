//! List command implementation.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::markdown::{FieldValue, list_markdown_files, read_front_matter};

#[derive(Serialize)]
struct ListedFile {
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, FieldValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the list command.
///
/// A file that fails to parse is reported in place; the listing goes on.
///
/// # Errors
///
/// Returns an error if the folder cannot be listed.
pub fn execute(folder: &Path, json: bool) -> Result<()> {
    let listed: Vec<ListedFile> = list_markdown_files(folder)?
        .into_iter()
        .map(|file| match read_front_matter(&file) {
            Ok(fm) => {
                let mut fields = fm.fields;
                fields.remove("body");
                ListedFile {
                    file,
                    fields: Some(fields),
                    error: None,
                }
            }
            Err(e) => ListedFile {
                file,
                fields: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No markdown files in {}", folder.display());
        return Ok(());
    }

    for entry in &listed {
        println!("{}", entry.file.display().to_string().bold());
        if let Some(error) = &entry.error {
            println!("  {} {error}", "error:".red());
        }
        for (key, value) in entry.fields.iter().flatten() {
            println!("  {key}: {}", value.as_text());
        }
    }
    Ok(())
}
