//! Version command implementation.

use serde::Serialize;

use crate::config::resolve_graphql_endpoint;
use crate::error::Result;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
    build: &'a str,
    graphql_endpoint: String,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        graphql_endpoint: resolve_graphql_endpoint(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{} version {} ({})", output.name, output.version, output.build);
    println!("GitHub endpoint: {}", output.graphql_endpoint);
    Ok(())
}
