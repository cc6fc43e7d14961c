//! Front matter extraction.
//!
//! A front matter block is the `---`-delimited run of `key: value` lines at
//! the top of a markdown file. Values are plain strings; `labels` may also
//! be written as an array `[a, b]`. Everything after the closing delimiter
//! is the body.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

const DELIMITER: &str = "---";

/// Keys whose `[a, b]` values are read as arrays. Other keys keep brackets.
const LIST_KEYS: &[&str] = &["labels"];

/// A single front matter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    fn parse(key: &str, raw: &str) -> Self {
        let raw = raw.trim();
        let inner = LIST_KEYS
            .contains(&key)
            .then(|| raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')))
            .flatten();
        if let Some(inner) = inner {
            let items = inner
                .split(',')
                .map(|item| unquote(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect();
            return Self::List(items);
        }
        Self::Text(unquote(raw).to_string())
    }

    /// The value as a single string; lists are joined with `", "`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

/// Parsed front matter plus the markdown body that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub fields: BTreeMap<String, FieldValue>,
    pub body: String,
}

impl FrontMatter {
    /// Look up a key as text. Missing keys yield an empty string.
    pub fn text(&self, key: &str) -> String {
        self.fields.get(key).map(FieldValue::as_text).unwrap_or_default()
    }

    /// Whether the block defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// Read and parse the front matter of a file.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read and `Error::FrontMatter`
/// if it has no well-formed front matter block.
pub fn read_front_matter(path: &Path) -> Result<FrontMatter> {
    let content = fs::read_to_string(path)?;
    parse_front_matter(&content).map_err(|reason| Error::FrontMatter {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse front matter from file content.
///
/// The opening delimiter must be the first non-blank line.
///
/// # Errors
///
/// Returns a description of the problem when either delimiter is missing.
pub fn parse_front_matter(content: &str) -> std::result::Result<FrontMatter, String> {
    let lines: Vec<&str> = content.lines().collect();

    let open = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .filter(|&idx| lines[idx].trim() == DELIMITER)
        .ok_or_else(|| "missing opening `---` delimiter".to_string())?;

    let close = lines[open + 1..]
        .iter()
        .position(|line| line.trim() == DELIMITER)
        .map(|offset| open + 1 + offset)
        .ok_or_else(|| "missing closing `---` delimiter".to_string())?;

    let mut fields = BTreeMap::new();
    for line in &lines[open + 1..close] {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), FieldValue::parse(key, value));
    }

    Ok(FrontMatter {
        fields,
        body: trim_blank_lines(&lines[close + 1..]),
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
