//! md2issues CLI entry point.

use clap::Parser;
use md2issues::cli::commands;
use md2issues::cli::{Cli, Commands, LogLevel, OutputFormat};
use md2issues::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Logging is set up once, before any command runs.
    init_tracing(cli.verbose, cli.quiet, cli.log_level, cli.log_json);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool, level: Option<LogLevel>, log_json: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // RUST_LOG wins, then --log-level, then the verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if let Some(level) = level {
        EnvFilter::new(level.as_directive())
    } else {
        EnvFilter::new(verbosity_directive(verbose))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time();

    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Filter for `-v` counts; per-issue progress logs at `info` by default.
const fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug,reqwest=info,hyper_util=info",
        _ => "trace",
    }
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    match &cli.command {
        Commands::Create(args) => commands::create::execute(args, cli.dry_run, json),
        Commands::List { folder } => commands::list::execute(folder, json),
        Commands::Info(args) => commands::info::execute(args, json),
        Commands::Examples(args) => commands::examples::execute(args, json),
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(json),
    }
}
