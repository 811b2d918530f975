//! sassguide CLI - Main entry point.
//!
//! Exit codes:
//! - 0: No error-severity violations
//! - 1: Error-severity violations found
//! - 2: Parse failure on at least one input
//! - 3: Configuration error, invalid invocation, or any other failure before
//!   a report exists

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sassguide_report::ExitCodes;

mod commands;

use commands::{Cli, Commands};

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "sassguide=debug,warn"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Help and version exit 0, every usage error exits with the configuration error code.
fn usage_exit(error: clap::Error) -> ExitCode {
    let _ = error.print();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::from(ExitCodes::SUCCESS),
        _ => ExitCode::from(ExitCodes::CONFIG_ERROR),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };
    init_logging(&cli);

    let result = match cli.command {
        Commands::Lint(args) => commands::lint::execute(args, cli.quiet).await,
        Commands::Fix(args) => commands::fix::execute(args, cli.quiet).await,
        Commands::Rules(args) => commands::rules::execute(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(ExitCodes::CONFIG_ERROR)
        }
    }
}
