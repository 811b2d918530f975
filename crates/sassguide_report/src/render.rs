//! Human and JSON renderings of a finalized [`Report`].

use serde::Serialize;

use crate::report::Report;

/// A flat record for machine consumers, one per violation or parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub rule_id: &'a str,
    pub severity: &'a str,
    pub message: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    summary: &'a crate::report::ReportSummary,
    records: Vec<Record<'a>>,
}

/// Rule id used for records that describe a parse failure.
pub const PARSE_FAILURE_RULE: &str = "parse-error";

impl Report {
    /// Records in report order. A file's parse failure comes before its violations.
    pub fn records(&self) -> Vec<Record<'_>> {
        let mut records = Vec::new();
        for file in &self.files {
            if let Some(failure) = &file.parse_error {
                records.push(Record {
                    file: &file.path,
                    line: failure.line,
                    column: failure.column,
                    rule_id: PARSE_FAILURE_RULE,
                    severity: "error",
                    message: &failure.reason,
                });
            }
            records.extend(file.violations.iter().map(|v| Record {
                file: &file.path,
                line: v.line,
                column: v.column,
                rule_id: &v.rule_id,
                severity: v.severity.as_str(),
                message: &v.message,
            }));
        }
        records
    }

    /// Grouped by file, one line per finding, then a summary line.
    pub fn render_human(&self) -> String {
        let mut output = String::new();

        for file in &self.files {
            if file.parse_error.is_none() && file.violations.is_empty() {
                continue;
            }
            output.push_str(&file.path);
            output.push('\n');
            if let Some(failure) = &file.parse_error {
                output.push_str(&format!(
                    "  {:>4}:{:<3} error    {}  {}\n",
                    failure.line, failure.column, failure.reason, PARSE_FAILURE_RULE
                ));
            }
            for v in &file.violations {
                output.push_str(&format!(
                    "  {:>4}:{:<3} {:<8} {}  {}\n",
                    v.line,
                    v.column,
                    v.severity.as_str(),
                    v.message,
                    v.rule_id
                ));
            }
            output.push('\n');
        }

        let s = &self.summary;
        let mut line = format!(
            "{} file(s) checked: {} error(s), {} warning(s)",
            s.files, s.errors, s.warnings
        );
        if s.parse_failures > 0 {
            line.push_str(&format!(", {} file(s) could not be parsed", s.parse_failures));
        }
        if s.fixes_applied > 0 {
            line.push_str(&format!(", {} fix(es) applied", s.fixes_applied));
        }
        output.push_str(&line);
        output.push('\n');
        output
    }

    /// Pretty-printed JSON with the summary and the flat record list.
    pub fn render_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            generated_at: self.generated_at.to_rfc3339(),
            summary: &self.summary,
            records: self.records(),
        };
        serde_json::to_string_pretty(&report)
    }
}
