//! Violations and their severities.

use std::fmt;

use serde::{Deserialize, Serialize};

use sassguide_syntax::{Location, Span};

/// Violation severity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Whether this severity fails a run.
    pub fn blocks(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A byte-range replacement that resolves a violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    pub start: u32,
    pub end: u32,
    pub replacement: String,
}

impl Fix {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            file: file.into(),
            line: location.line,
            column: location.column,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

/// Apply non-overlapping fixes to `source`. Overlapping fixes after the
/// first are skipped. Returns the new text and how many fixes were applied.
pub fn apply_fixes<'a>(source: &str, fixes: impl IntoIterator<Item = &'a Fix>) -> (String, usize) {
    let mut fixes: Vec<&Fix> = fixes.into_iter().collect();
    fixes.sort_by_key(|f| (f.start, f.end));
    fixes.dedup();

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut applied = 0usize;
    for fix in fixes {
        let (start, end) = (fix.start as usize, fix.end as usize);
        if start < cursor || end > source.len() || start > end {
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&fix.replacement);
        cursor = end;
        applied += 1;
    }
    out.push_str(&source[cursor..]);
    (out, applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Error.blocks());
        assert!(!Severity::Warning.blocks());
    }

    #[test]
    fn test_apply_fixes_skips_overlaps() {
        let source = "border: none;";
        let fixes = vec![
            Fix::replace(Span::new(8, 12), "0"),
            Fix::replace(Span::new(9, 10), "x"),
            Fix::replace(Span::new(7, 8), " "),
        ];
        let (fixed, applied) = apply_fixes(source, &fixes);
        assert_eq!(fixed, "border: 0;");
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_violation_serializes_without_empty_fix() {
        let v = Violation::new("no-extend", Severity::Warning, "a.scss", Location::new(2, 3), "msg");
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(!json.contains("fix"));
    }
}
