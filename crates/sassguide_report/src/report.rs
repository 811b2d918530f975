//! Aggregated results of a run.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sassguide_lint::{Severity, Violation};
use sassguide_syntax::ParseError;

/// CI-friendly exit codes.
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR_VIOLATIONS: u8 = 1;
    pub const PARSE_FAILURE: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
}

/// Why a file could not be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

impl ParseFailure {
    /// A failure not tied to a position, e.g. an unreadable file.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            line: 1,
            column: 1,
            reason: reason.into(),
        }
    }
}

impl From<&ParseError> for ParseFailure {
    fn from(error: &ParseError) -> Self {
        Self {
            line: error.line,
            column: error.column,
            reason: error.reason.clone(),
        }
    }
}

/// Results for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<ParseFailure>,
    /// Number of fixes written back to the file
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fixes_applied: usize,
    /// Unified diff of changes a dry-run fix would make
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_diff: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FileReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.violations = violations;
        self
    }

    pub fn failed(path: impl Into<String>, failure: ParseFailure) -> Self {
        Self {
            path: path.into(),
            parse_error: Some(failure),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity.blocks())
    }
}

/// Summary statistics for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub parse_failures: usize,
    pub fixes_applied: usize,
}

/// Every file's results, ready for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub files: Vec<FileReport>,
    pub summary: ReportSummary,
    /// Violations below this severity are dropped by [`Report::finalize`]
    pub min_severity: Severity,
    pub generated_at: DateTime<Utc>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            summary: ReportSummary::default(),
            min_severity: Severity::Warning,
            generated_at: Utc::now(),
        }
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn add_file(&mut self, file: FileReport) {
        self.files.push(file);
    }

    /// Add violations that were found across files, each to its own file's entry.
    pub fn add_violations(&mut self, violations: Vec<Violation>) {
        for violation in violations {
            match self.files.iter_mut().find(|f| f.path == violation.file) {
                Some(file) => file.violations.push(violation),
                None => {
                    let path = violation.file.clone();
                    self.files.push(FileReport::new(path).with_violations(vec![violation]));
                }
            }
        }
    }

    /// Filter by severity, drop duplicates, sort, and compute the summary.
    ///
    /// Files are ordered by path. Violations within a file are ordered by
    /// line, column, then rule id.
    pub fn finalize(&mut self) {
        // Merge entries that share a path.
        let mut merged: BTreeMap<String, FileReport> = BTreeMap::new();
        for file in self.files.drain(..) {
            match merged.get_mut(&file.path) {
                Some(existing) => {
                    existing.violations.extend(file.violations);
                    existing.parse_error = existing.parse_error.take().or(file.parse_error);
                    existing.fixes_applied += file.fixes_applied;
                    existing.pending_diff = existing.pending_diff.take().or(file.pending_diff);
                }
                None => {
                    merged.insert(file.path.clone(), file);
                }
            }
        }

        let min = self.min_severity;
        let mut files: Vec<FileReport> = merged.into_values().collect();
        for file in &mut files {
            let mut seen = HashSet::new();
            file.violations.retain(|v| v.severity >= min && seen.insert(v.clone()));
            file.violations.sort_by(|a, b| {
                (a.line, a.column, &a.rule_id, &a.message).cmp(&(b.line, b.column, &b.rule_id, &b.message))
            });
        }
        self.files = files;

        let violations = self.files.iter().flat_map(|f| &f.violations);
        let errors = violations.clone().filter(|v| v.severity.blocks()).count();
        self.summary = ReportSummary {
            files: self.files.len(),
            errors,
            warnings: violations.count() - errors,
            parse_failures: self.files.iter().filter(|f| f.parse_error.is_some()).count(),
            fixes_applied: self.files.iter().map(|f| f.fixes_applied).sum(),
        };
        debug!(
            "Report finalized: {} error(s), {} warning(s), {} parse failure(s)",
            self.summary.errors, self.summary.warnings, self.summary.parse_failures
        );
    }

    /// All violations, in report order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.files.iter().flat_map(|f| f.violations.iter())
    }

    pub fn has_parse_failures(&self) -> bool {
        self.files.iter().any(|f| f.parse_error.is_some())
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(FileReport::has_errors)
    }

    /// 2 if any file failed to parse, else 1 if any error-severity violation, else 0.
    pub fn exit_code(&self) -> u8 {
        if self.has_parse_failures() {
            ExitCodes::PARSE_FAILURE
        } else if self.has_errors() {
            ExitCodes::ERROR_VIOLATIONS
        } else {
            ExitCodes::SUCCESS
        }
    }

    /// No violations and no parse failures at all.
    pub fn is_success(&self) -> bool {
        !self.has_parse_failures() && self.violations().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassguide_syntax::Location;

    fn violation(file: &str, line: usize, rule: &str, severity: Severity) -> Violation {
        Violation::new(rule, severity, file, Location::new(line, 1), "msg")
    }

    #[test]
    fn test_finalize_sorts_and_dedupes() {
        let mut report = Report::new();
        report.add_file(FileReport::new("b.scss").with_violations(vec![
            violation("b.scss", 3, "no-extend", Severity::Warning),
            violation("b.scss", 1, "space-after-colon", Severity::Warning),
            violation("b.scss", 1, "no-id-selector", Severity::Error),
            violation("b.scss", 1, "no-id-selector", Severity::Error),
        ]));
        report.add_file(FileReport::new("a.scss"));
        report.finalize();

        assert_eq!(report.files[0].path, "a.scss");
        let order: Vec<(usize, &str)> = report.files[1]
            .violations
            .iter()
            .map(|v| (v.line, v.rule_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(1, "no-id-selector"), (1, "space-after-colon"), (3, "no-extend")]
        );
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.warnings, 2);
    }

    #[test]
    fn test_min_severity_filter() {
        let mut report = Report::new().with_min_severity(Severity::Error);
        report.add_file(FileReport::new("a.scss").with_violations(vec![
            violation("a.scss", 1, "no-extend", Severity::Warning),
            violation("a.scss", 2, "no-id-selector", Severity::Error),
        ]));
        report.finalize();
        assert_eq!(report.violations().count(), 1);
        assert_eq!(report.summary.warnings, 0);
    }

    #[test]
    fn test_exit_codes() {
        let mut clean = Report::new();
        clean.add_file(FileReport::new("a.scss"));
        clean.finalize();
        assert_eq!(clean.exit_code(), ExitCodes::SUCCESS);
        assert!(clean.is_success());

        let mut warned = Report::new();
        warned.add_violations(vec![violation("a.scss", 1, "no-extend", Severity::Warning)]);
        warned.finalize();
        assert_eq!(warned.exit_code(), ExitCodes::SUCCESS);
        assert!(!warned.is_success());

        let mut errored = Report::new();
        errored.add_violations(vec![violation("a.scss", 1, "no-id-selector", Severity::Error)]);
        errored.finalize();
        assert_eq!(errored.exit_code(), ExitCodes::ERROR_VIOLATIONS);

        errored.add_file(FileReport::failed("b.sass", ParseFailure::new("indented syntax is not supported")));
        errored.finalize();
        assert_eq!(errored.exit_code(), ExitCodes::PARSE_FAILURE);
    }

    #[test]
    fn test_project_violations_join_their_file() {
        let mut report = Report::new();
        report.add_file(FileReport::new("a.scss"));
        report.add_violations(vec![violation("a.scss", 4, "media-query-locality", Severity::Warning)]);
        report.finalize();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].violations.len(), 1);
    }
}
