//! The lint/fix pipeline.
//!
//! Each file is read, parsed, linted and diffed against formatter output on
//! its own blocking task. Results are merged into a [`Report`] once every task
//! has finished, so output order never depends on scheduling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use sassguide_format::{diff, format, unified_diff, FormatOptions};
use sassguide_lint::{
    apply_fixes, LintConfig, Linter, SelectorFacts, Severity, Violation, FORMATTING_RULE,
};
use sassguide_report::{FileReport, ParseFailure, Report};
use sassguide_syntax::{Location, ParseOptions, StyleSheet};

use crate::cache::ParseCache;
use crate::discover::{discover, is_indented_syntax, IgnoreSet};
use crate::error::{CoreError, CoreResult};

/// What the pipeline does with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Report violations, leave files alone
    #[default]
    Check,
    /// Apply fix patches and the formatter, write the result, report what remains
    Fix,
    /// Like `Fix`, but keep the files and attach a unified diff of the pending changes
    DryRun,
}

/// Per-file worker state shared by all tasks.
#[derive(Debug, Clone)]
struct Worker {
    linter: Linter,
    format_options: FormatOptions,
    parse_options: ParseOptions,
    cache: Option<ParseCache>,
    mode: Mode,
}

struct FileOutcome {
    report: FileReport,
    facts: Option<SelectorFacts>,
}

impl FileOutcome {
    fn failed(file: &str, failure: ParseFailure) -> Self {
        debug!("{}: {}", file, failure.reason);
        Self {
            report: FileReport::failed(file, failure),
            facts: None,
        }
    }
}

/// Runs the linter (and optionally the fixer) over a set of inputs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    worker: Arc<Worker>,
    ignore: IgnoreSet,
    min_severity: Severity,
}

impl Pipeline {
    /// Build a pipeline. Unknown rule ids and bad ignore patterns are configuration errors.
    pub fn new(config: LintConfig) -> CoreResult<Self> {
        let ignore = IgnoreSet::new(&config.ignore)?;
        let linter = Linter::new(config).map_err(|e| CoreError::Config(e.to_string()))?;
        Ok(Self {
            worker: Arc::new(Worker {
                linter,
                format_options: FormatOptions::default(),
                parse_options: ParseOptions::default(),
                cache: None,
                mode: Mode::Check,
            }),
            ignore,
            min_severity: Severity::Warning,
        })
    }

    fn worker_mut(&mut self) -> &mut Worker {
        Arc::make_mut(&mut self.worker)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.worker_mut().mode = mode;
        self
    }

    pub fn with_cache(mut self, cache: ParseCache) -> Self {
        self.worker_mut().cache = Some(cache);
        self
    }

    pub fn with_format_options(mut self, options: FormatOptions) -> Self {
        self.worker_mut().format_options = options;
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.worker_mut().parse_options = options;
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn linter(&self) -> &Linter {
        &self.worker.linter
    }

    pub fn mode(&self) -> Mode {
        self.worker.mode
    }

    /// Discover files from `inputs` and process them.
    pub async fn run(&self, inputs: &[String]) -> CoreResult<Report> {
        let files = discover(inputs, &self.ignore)?;
        self.run_files(files).await
    }

    /// Process the given files concurrently and return the finalized report.
    pub async fn run_files(&self, files: Vec<PathBuf>) -> CoreResult<Report> {
        info!("Processing {} file(s) in {:?} mode", files.len(), self.worker.mode);

        let mut tasks = JoinSet::new();
        for path in files {
            let worker = Arc::clone(&self.worker);
            tasks.spawn_blocking(move || worker.process(&path));
        }

        let mut report = Report::new().with_min_severity(self.min_severity);
        let mut facts = Vec::new();
        while let Some(outcome) = tasks.join_next().await {
            let outcome = outcome?;
            if let Some(f) = outcome.facts {
                facts.push(f);
            }
            report.add_file(outcome.report);
        }

        report.add_violations(self.worker.linter.check_project(&facts));
        report.finalize();
        info!(
            "Checked {} file(s): {} error(s), {} warning(s)",
            report.summary.files, report.summary.errors, report.summary.warnings
        );
        Ok(report)
    }
}

impl Worker {
    fn process(&self, path: &Path) -> FileOutcome {
        let file = path.display().to_string();

        if is_indented_syntax(path) {
            return FileOutcome::failed(&file, ParseFailure::new("indented syntax is not supported"));
        }

        let max = self.linter.config().max_file_size;
        match fs::metadata(path) {
            Ok(meta) if meta.len() > max => {
                return FileOutcome::failed(
                    &file,
                    ParseFailure::new(format!("file exceeds max_file_size of {} bytes", max)),
                );
            }
            Ok(_) => {}
            Err(e) => return FileOutcome::failed(&file, ParseFailure::new(format!("cannot read file: {}", e))),
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return FileOutcome::failed(&file, ParseFailure::new(format!("cannot read file: {}", e))),
        };

        let sheet = match self.parse(path, &source) {
            Ok(sheet) => sheet,
            Err(failure) => return FileOutcome::failed(&file, failure),
        };

        match self.mode {
            Mode::Check => self.check(&file, &source, &sheet),
            Mode::Fix | Mode::DryRun => self.fix(&file, path, &source, sheet),
        }
    }

    fn parse(&self, path: &Path, source: &str) -> Result<Arc<StyleSheet>, ParseFailure> {
        match &self.cache {
            Some(cache) => cache
                .get_or_parse(path, source, self.parse_options)
                .map_err(|e| ParseFailure::from(&e)),
            None => self.parse_uncached(source),
        }
    }

    fn parse_uncached(&self, source: &str) -> Result<Arc<StyleSheet>, ParseFailure> {
        sassguide_syntax::parse_with_options(source, self.parse_options)
            .map(Arc::new)
            .map_err(|e| ParseFailure::from(&e))
    }

    /// Lint findings plus one `formatting` violation per formatter diff hunk.
    fn check(&self, file: &str, source: &str, sheet: &StyleSheet) -> FileOutcome {
        let lint = self.linter.lint(file, sheet);
        let mut violations = lint.violations;

        if let Some(severity) = self.linter.formatting_severity() {
            let formatted = format(sheet, &self.format_options);
            violations.extend(diff(source, &formatted).into_iter().map(|hunk| {
                Violation::new(
                    FORMATTING_RULE,
                    severity,
                    file,
                    Location::new(hunk.line, 1),
                    hunk.summary(),
                )
            }));
        }

        FileOutcome {
            report: FileReport::new(file).with_violations(violations),
            facts: lint.facts,
        }
    }

    /// Apply fix patches, then the formatter, write the file if it changed,
    /// and report what is left. In dry-run mode nothing is written and the
    /// report carries the diff instead.
    fn fix(&self, file: &str, path: &Path, source: &str, sheet: Arc<StyleSheet>) -> FileOutcome {
        let original = Arc::clone(&sheet);
        let lint = self.linter.lint(file, &sheet);
        let (patched, patches) = apply_fixes(source, lint.violations.iter().filter_map(|v| v.fix.as_ref()));

        let (patched, sheet, patches) = if patches == 0 {
            (source.to_string(), sheet, 0)
        } else {
            match self.parse(path, &patched) {
                Ok(patched_sheet) => (patched, patched_sheet, patches),
                Err(failure) => {
                    warn!("{}: fixes produced unparsable text ({}), formatting original", file, failure.reason);
                    (source.to_string(), sheet, 0)
                }
            }
        };

        let formatted = format(&sheet, &self.format_options);
        let rewrites = diff(&patched, &formatted).len();

        // Formatter output must parse before it is shown or written.
        let reparsed = match self.mode {
            Mode::DryRun => self.parse_uncached(&formatted),
            _ => self.parse(path, &formatted),
        };
        let final_sheet = match reparsed {
            Ok(sheet) => sheet,
            Err(failure) => {
                warn!("{}: formatted output does not parse ({}), file left unchanged", file, failure.reason);
                return FileOutcome::failed(
                    file,
                    ParseFailure {
                        reason: format!("formatted output does not parse: {}", failure.reason),
                        ..failure
                    },
                );
            }
        };

        if self.mode == Mode::DryRun {
            let mut outcome = self.check(file, source, &original);
            if formatted != source {
                outcome.report.pending_diff = Some(unified_diff(source, &formatted, file));
            }
            return outcome;
        }

        if formatted != source {
            if let Err(e) = fs::write(path, &formatted) {
                return FileOutcome::failed(file, ParseFailure::new(format!("cannot write file: {}", e)));
            }
            debug!("{}: wrote {} patch(es) and {} formatting change(s)", file, patches, rewrites);
        }

        let mut outcome = self.check(file, &formatted, &final_sheet);
        outcome.report.fixes_applied = patches + rewrites;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_formatting_violations_in_check_mode() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.scss", ".a{color:red}\n");
        let report = Pipeline::new(LintConfig::default())
            .unwrap()
            .run_files(vec![path])
            .await
            .unwrap();
        assert!(report.violations().any(|v| v.rule_id == FORMATTING_RULE));
    }

    #[tokio::test]
    async fn test_formatting_check_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.scss", ".a{color:red}\n");
        let config = LintConfig {
            check_formatting: false,
            ..Default::default()
        };
        let report = Pipeline::new(config).unwrap().run_files(vec![path]).await.unwrap();
        assert!(report.violations().all(|v| v.rule_id != FORMATTING_RULE));
    }

    #[tokio::test]
    async fn test_oversized_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "big.scss", ".a {\n  color: red;\n}\n");
        let config = LintConfig {
            max_file_size: 4,
            ..Default::default()
        };
        let report = Pipeline::new(config).unwrap().run_files(vec![path]).await.unwrap();
        let failure = report.files[0].parse_error.as_ref().unwrap();
        assert!(failure.reason.contains("max_file_size"));
    }

    #[tokio::test]
    async fn test_cache_is_filled() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.scss", ".a {\n  color: red;\n}\n");
        let cache = ParseCache::new();
        let pipeline = Pipeline::new(LintConfig::default()).unwrap().with_cache(cache.clone());
        pipeline.run_files(vec![path.clone()]).await.unwrap();
        assert!(cache.contains(&path));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.scss", ".a{border:none}");
        let report = Pipeline::new(LintConfig::default())
            .unwrap()
            .with_mode(Mode::DryRun)
            .run_files(vec![path.clone()])
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ".a{border:none}");
        let pending = report.files[0].pending_diff.as_ref().unwrap();
        assert!(pending.contains("+  border: 0;"));
        assert!(report.violations().any(|v| v.rule_id == "prefer-zero-border"));
        assert_eq!(report.summary.fixes_applied, 0);
    }

    #[tokio::test]
    async fn test_fix_keeps_file_when_output_does_not_parse() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.scss", ".card{border:none}");
        // The source fits the size limit but the formatted text does not.
        let options = ParseOptions {
            max_len: 20,
            ..ParseOptions::default()
        };
        let report = Pipeline::new(LintConfig::default())
            .unwrap()
            .with_mode(Mode::Fix)
            .with_parse_options(options)
            .run_files(vec![path.clone()])
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), ".card{border:none}");
        let failure = report.files[0].parse_error.as_ref().unwrap();
        assert!(failure.reason.starts_with("formatted output does not parse"));
        assert!(report.has_parse_failures());
    }

    #[test]
    fn test_unknown_rule_is_config_error() {
        let yaml = "rules:\n  no-such-rule:\n    enabled: false\n";
        let config = LintConfig::from_yaml(yaml).unwrap();
        let err = Pipeline::new(config).unwrap_err();
        assert!(err.is_config());
    }
}
