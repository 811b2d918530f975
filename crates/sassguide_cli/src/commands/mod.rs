//! CLI command definitions.
//!
//! Each subcommand maps to one pipeline mode or to the rule catalog.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use sassguide_core::{CoreError, Pipeline};
use sassguide_lint::{LintConfig, Severity};
use sassguide_report::Report;

pub mod fix;
pub mod lint;
pub mod rules;

/// sassguide - linter and formatter for the SCSS style guide
#[derive(Parser)]
#[command(name = "sassguide")]
#[command(version, about = "sassguide - linter and formatter for the SCSS style guide")]
#[command(long_about = r#"
sassguide checks SCSS sources against the style guide's naming, formatting
and architecture rules, and rewrites them into canonical form.

COMMANDS:
  lint   → Report violations
  fix    → Apply automatic fixes and the formatter, then report what remains
  rules  → List the rule catalog

CONFIGURATION:
  .sassguide.yml in the working directory, or the file given with --config.

EXIT CODES:
  0 - No error-severity violations
  1 - Error-severity violations found
  2 - At least one input could not be parsed
  3 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check files and report violations
    Lint(lint::LintArgs),

    /// Fix what can be fixed automatically, in place
    Fix(fix::FixArgs),

    /// List every rule with its default severity
    Rules(rules::RulesArgs),
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Severity threshold accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SeverityArg {
    #[default]
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

/// Arguments shared by `lint` and `fix`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Files, directories or glob patterns to check
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Hide violations below this severity
    #[arg(long, value_enum, default_value_t = SeverityArg::Warning)]
    pub min_severity: SeverityArg,

    /// Configuration file (defaults to ./.sassguide.yml when present)
    #[arg(short, long, env = "SASSGUIDE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    pub fn pipeline(&self) -> Result<Pipeline, CoreError> {
        let config = load_config(self.config.as_deref())?;
        Ok(Pipeline::new(config)?.with_min_severity(self.min_severity.into()))
    }
}

/// Load the explicit configuration file, or `.sassguide.yml` from the working
/// directory, or the defaults. Every failure here is a configuration error.
pub fn load_config(explicit: Option<&Path>) -> Result<LintConfig, CoreError> {
    if let Some(path) = explicit {
        info!("Using configuration {:?}", path);
        return LintConfig::load(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)));
    }

    let cwd = std::env::current_dir()?;
    match LintConfig::discover(&cwd) {
        Ok(Some((config, path))) => {
            info!("Using configuration {:?}", path);
            Ok(config)
        }
        Ok(None) => {
            debug!("No configuration file found, using defaults");
            Ok(LintConfig::default())
        }
        Err(e) => Err(CoreError::Config(e.to_string())),
    }
}

/// Print the report in the requested format. The summary line is skipped in
/// quiet mode when there is nothing to report.
pub fn print_report(report: &Report, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", report.render_json()?),
        OutputFormat::Human => {
            if !(quiet && report.is_success()) {
                print!("{}", report.render_human());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lint_arguments() {
        let cli = Cli::try_parse_from([
            "sassguide",
            "lint",
            "src",
            "**/*.scss",
            "--format",
            "json",
            "--min-severity",
            "error",
        ])
        .unwrap();
        match cli.command {
            Commands::Lint(args) => {
                assert_eq!(args.run.paths, vec!["src", "**/*.scss"]);
                assert_eq!(args.run.format, OutputFormat::Json);
                assert_eq!(Severity::from(args.run.min_severity), Severity::Error);
            }
            _ => panic!("expected lint"),
        }
    }

    #[test]
    fn test_lint_requires_paths() {
        assert!(Cli::try_parse_from(["sassguide", "lint"]).is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["sassguide", "-v", "-q", "rules"]).is_err());
    }

    #[test]
    fn test_explicit_config_errors_are_config_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yml");
        assert!(load_config(Some(&missing)).unwrap_err().is_config());

        let invalid = dir.path().join("bad.yml");
        fs::write(&invalid, "max_nesting_depth: [1, 2]\n").unwrap();
        assert!(load_config(Some(&invalid)).unwrap_err().is_config());
    }
}
