//! Fix command - apply fix patches and the formatter in place.
//!
//! Files are only written when their content changes. The report afterwards
//! lists what could not be fixed automatically.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sassguide_core::Mode;

use super::{print_report, OutputFormat, RunArgs};

#[derive(Args, Debug)]
pub struct FixArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Print the changes as a unified diff instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn execute(args: FixArgs, quiet: bool) -> Result<u8> {
    info!("Fixing {:?}", args.run.paths);

    let mode = if args.dry_run { Mode::DryRun } else { Mode::Fix };
    let pipeline = args.run.pipeline()?.with_mode(mode);
    let report = pipeline
        .run(&args.run.paths)
        .await
        .context("Failed to fix inputs")?;

    if args.dry_run && args.run.format == OutputFormat::Human {
        for diff in report.files.iter().filter_map(|f| f.pending_diff.as_deref()) {
            print!("{}", diff);
        }
    } else {
        info!("{} fix(es) applied", report.summary.fixes_applied);
    }

    print_report(&report, args.run.format, quiet)?;
    Ok(report.exit_code())
}
