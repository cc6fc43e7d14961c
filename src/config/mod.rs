//! Configuration management.
//!
//! md2issues has no config file of its own. Everything comes from the
//! environment, the GitHub CLI's hosts file, and the local git checkout:
//!
//! - **Token**: `GITHUB_TOKEN`, else `oauth_token` in `<gh config>/hosts.yml`
//! - **Endpoint**: `GITHUB_GRAPHQL_URL`, else the public GraphQL API
//! - **Repository**: command-line flags, else the `origin` remote (see [`git`])

pub mod git;

pub use git::{infer_repo, parse_remote_url};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Error, Result};

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Host entry looked up in the gh hosts file.
const GITHUB_HOST: &str = "github.com";

/// Resolve the GitHub API token.
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `oauth_token` for github.com in the gh CLI hosts file
/// 3. **Error** - no anonymous access
pub fn resolve_token() -> Result<String> {
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        let token = token.trim();
        if !token.is_empty() {
            debug!("Using token from GITHUB_TOKEN");
            return Ok(token.to_string());
        }
    }

    let Some(hosts_path) = gh_config_dir().map(|dir| dir.join("hosts.yml")) else {
        return Err(Error::MissingToken);
    };

    // A missing hosts file is the common case, not an error.
    let Ok(content) = std::fs::read_to_string(&hosts_path) else {
        return Err(Error::MissingToken);
    };

    let token = parse_hosts_token(&content).map_err(|e| {
        Error::Config(format!("cannot read {}: {e}", hosts_path.display()))
    })?;
    match token {
        Some(token) => {
            debug!(path = %hosts_path.display(), "Using token from gh hosts file");
            Ok(token)
        }
        None => Err(Error::MissingToken),
    }
}

/// Directory holding the GitHub CLI configuration.
///
/// Priority:
/// 1. `GH_CONFIG_DIR` environment variable
/// 2. `~/.config/gh`
#[must_use]
pub fn gh_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("GH_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".config").join("gh"))
}

#[derive(Debug, Deserialize)]
struct HostEntry {
    oauth_token: Option<String>,
}

/// Extract the github.com `oauth_token` from a gh `hosts.yml` document.
///
/// # Errors
///
/// Returns `Error::Yaml` if the document is not a host map.
pub fn parse_hosts_token(content: &str) -> Result<Option<String>> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    let hosts: BTreeMap<String, Option<HostEntry>> = serde_yaml::from_str(content)?;
    Ok(hosts
        .get(GITHUB_HOST)
        .and_then(Option::as_ref)
        .and_then(|entry| entry.oauth_token.as_deref())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from))
}

/// GraphQL endpoint to talk to.
///
/// `GITHUB_GRAPHQL_URL` overrides the public API, e.g. for GitHub Enterprise.
#[must_use]
pub fn resolve_graphql_endpoint() -> String {
    std::env::var("GITHUB_GRAPHQL_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string())
}
