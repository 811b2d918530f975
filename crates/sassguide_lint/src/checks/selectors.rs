//! Selector shape: ID usage, grouping layout and nesting depth.

use sassguide_syntax::{NodeKind, SelectorKind};

use crate::check::{Check, CheckContext};
use crate::error::LintResult;
use crate::violation::{Severity, Violation};

/// Every ID selector is reported, at any nesting level.
pub struct NoIdSelector;

impl Check for NoIdSelector {
    fn id(&self) -> &str {
        "no-id-selector"
    }

    fn description(&self) -> &str {
        "ID selectors are not allowed; use a class"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let NodeKind::Rule(rule) = &node.kind else {
                return;
            };
            for selector in &rule.selectors.selectors {
                for part in selector.simple_selectors() {
                    if part.kind == SelectorKind::Id {
                        violations.push(ctx.violation(
                            part.span.start,
                            format!("avoid ID selector `#{}`; use a class instead", part.name),
                        ));
                    }
                }
            }
        });
        Ok(violations)
    }
}

/// Each selector of a group goes on its own line.
pub struct SelectorPerLine;

impl Check for SelectorPerLine {
    fn id(&self) -> &str {
        "selector-per-line"
    }

    fn description(&self) -> &str {
        "Each selector in a comma-separated group is on its own line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let NodeKind::Rule(rule) = &node.kind else {
                return;
            };
            for selector in rule.selectors.sharing_lines(ctx.sheet.line_index()) {
                violations.push(ctx.violation(
                    selector.span.start,
                    format!("selector `{}` should start on its own line", selector.text),
                ));
            }
        });
        Ok(violations)
    }
}

/// Rule declarations nested deeper than the configured limit.
pub struct NestingDepth;

impl Check for NestingDepth {
    fn id(&self) -> &str {
        "nesting-depth"
    }

    fn description(&self) -> &str {
        "Rule declarations are nested at most `max_nesting_depth` levels deep"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let max = ctx.config.max_nesting_depth;
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, walk| {
            if let NodeKind::Rule(rule) = &node.kind {
                if walk.rule_depth > max {
                    violations.push(ctx.violation(
                        rule.span.start,
                        format!("nesting depth {} exceeds the maximum of {}", walk.rule_depth, max),
                    ));
                }
            }
        });
        Ok(violations)
    }
}
