//! Examples command implementation.

use serde_json::json;

use crate::cli::ExamplesArgs;
use crate::error::Result;
use crate::scaffold::{ExampleKind, ExampleOverrides, generate_all, generate_single};

/// Execute the examples command.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for an unknown `--type`, or an I/O
/// error if the files cannot be written.
pub fn execute(args: &ExamplesArgs, json: bool) -> Result<()> {
    let files = match &args.kind {
        Some(kind) => {
            let kind: ExampleKind = kind.parse()?;
            let overrides = ExampleOverrides {
                title: args.title.clone(),
                project: args.project.clone(),
                status: args.status.clone(),
                labels: args.labels.clone(),
                parent: args.parent.clone(),
                description: args.description.clone(),
            };
            vec![generate_single(&args.output, kind, &overrides)?]
        }
        None => generate_all(&args.output)?,
    };

    if json {
        let output = json!({
            "output_dir": args.output.display().to_string(),
            "files": files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{output}");
        return Ok(());
    }

    println!("Generated {} example file(s) in {}:", files.len(), args.output.display());
    for file in &files {
        println!("  - {}", file.display());
    }
    Ok(())
}
