//! Rules command - list the rule catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sassguide_lint::{LintConfig, Linter, Severity};
use sassguide_report::ExitCodes;

use super::{load_config, OutputFormat};

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Show severities as set by this configuration file
    #[arg(short, long, env = "SASSGUIDE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RuleRow {
    id: String,
    description: String,
    default_severity: Severity,
    /// `None` when the configuration disables the rule
    severity: Option<Severity>,
}

fn rows(config: LintConfig) -> Result<Vec<RuleRow>> {
    let linter = Linter::new(config).map_err(|e| sassguide_core::CoreError::Config(e.to_string()))?;
    Ok(linter
        .catalog()
        .into_iter()
        .map(|rule| RuleRow {
            severity: linter.config().severity_for(&rule.id, rule.default_severity),
            id: rule.id,
            description: rule.description,
            default_severity: rule.default_severity,
        })
        .collect())
}

pub async fn execute(args: RulesArgs) -> Result<u8> {
    let config = load_config(args.config.as_deref())?;
    let rows = rows(config)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Human => {
            let width = rows.iter().map(|r| r.id.len()).max().unwrap_or(0);
            for row in &rows {
                let severity = row.severity.map(|s| s.as_str()).unwrap_or("off");
                println!("{:<width$}  {:<7}  {}", row.id, severity, row.description, width = width);
            }
        }
    }
    Ok(ExitCodes::SUCCESS)
}
