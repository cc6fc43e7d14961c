//! Repository inference from the local git checkout.
//!
//! Reads the `origin` remote from `.git/config` directly. Inference never
//! fails: anything unexpected yields `None` and the caller falls back.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::github::RepoRef;

/// Infer `owner/repo` from the `origin` remote of the checkout at `dir`.
///
/// Looks at `dir/.git/config` first, then at the git toplevel containing
/// `dir`.
#[must_use]
pub fn infer_repo(dir: &Path) -> Option<RepoRef> {
    let config_path = std::iter::once(dir.to_path_buf())
        .chain(git_toplevel(dir))
        .map(|root| root.join(".git").join("config"))
        .find(|path| path.is_file())?;

    let content = std::fs::read_to_string(&config_path).ok()?;
    let url = origin_url(&content)?;
    let (owner, name) = parse_remote_url(&url)?;
    debug!(remote = %url, owner = %owner, repo = %name, "Inferred repository from git remote");
    Some(RepoRef::new(owner, name))
}

/// Get the git repository root directory containing `dir`.
fn git_toplevel(dir: &Path) -> Option<PathBuf> {
    std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| PathBuf::from(String::from_utf8_lossy(&o.stdout).trim().to_string()))
}

/// The `url` of the `[remote "origin"]` section of a git config file.
#[must_use]
pub fn origin_url(config: &str) -> Option<String> {
    let mut in_origin = false;
    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line.replace(' ', "") == "[remote\"origin\"]";
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                let value = value.trim();
                return (!value.is_empty()).then(|| value.to_string());
            }
        }
    }
    None
}

/// Host a remote must point at to be inferred.
const GITHUB_HOST: &str = "github.com";

/// Split a GitHub remote URL into `(owner, repo)`.
///
/// Accepts SSH (`git@github.com:o/r.git`, `ssh://git@github.com/o/r`) and
/// HTTP(S) forms. Remotes on any other host yield `None`. The path must
/// have exactly two segments.
#[must_use]
pub fn parse_remote_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();
    let (host, path) = if let Some(rest) = url.strip_prefix("git@") {
        rest.split_once(':')?
    } else {
        let rest = ["ssh://", "https://", "http://", "git://"]
            .iter()
            .find_map(|scheme| url.strip_prefix(scheme))?;
        rest.split_once('/')?
    };

    // Drop `user@` and `:port` around the host.
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    let host = host.split_once(':').map_or(host, |(h, _)| h);
    if !host.eq_ignore_ascii_case(GITHUB_HOST) {
        return None;
    }

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}
