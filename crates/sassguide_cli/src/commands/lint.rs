//! Lint command - report violations without touching files.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sassguide_core::Mode;

use super::{print_report, RunArgs};

#[derive(Args, Debug)]
pub struct LintArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub async fn execute(args: LintArgs, quiet: bool) -> Result<u8> {
    info!("Linting {:?}", args.run.paths);

    let pipeline = args.run.pipeline()?.with_mode(Mode::Check);
    let report = pipeline
        .run(&args.run.paths)
        .await
        .context("Failed to lint inputs")?;

    print_report(&report, args.run.format, quiet)?;
    Ok(report.exit_code())
}
