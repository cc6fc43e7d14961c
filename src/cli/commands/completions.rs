//! Shell completions command implementation.

use clap::CommandFactory;
use clap_complete::{Shell as CompletionShell, generate};
use std::io;

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<&Shell> for CompletionShell {
    fn from(shell: &Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Write completions for `md2issues` to stdout.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(CompletionShell::from(shell), &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
