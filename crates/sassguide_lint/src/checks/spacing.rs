//! Whitespace around braces and colons, and blank lines between rules.

use sassguide_syntax::{NodeKind, Property, Span};

use crate::check::{Check, CheckContext};
use crate::error::LintResult;
use crate::violation::{Fix, Severity, Violation};

/// Offset of the `:` separating a property's name from its value.
fn colon_offset(property: &Property) -> u32 {
    property.value_span.start - property.layout.gap_after_colon.len() as u32 - 1
}

/// Exactly one space between a block header and `{`.
pub struct SpaceBeforeBrace;

impl Check for SpaceBeforeBrace {
    fn id(&self) -> &str {
        "space-before-brace"
    }

    fn description(&self) -> &str {
        "One space between a selector or at-rule and its opening brace"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let Some(block) = node.block() else {
                return;
            };
            let gap = &block.layout.gap_before_open;
            if gap == " " {
                return;
            }
            let open = block.layout.open.start;
            let message = if gap.is_empty() {
                "expected a space before '{'"
            } else {
                "expected exactly one space before '{'"
            };
            violations.push(
                ctx.violation(open, message)
                    .with_fix(Fix::replace(Span::new(open - gap.len() as u32, open), " ")),
            );
        });
        Ok(violations)
    }
}

/// Exactly one space after a property's colon.
pub struct SpaceAfterColon;

impl Check for SpaceAfterColon {
    fn id(&self) -> &str {
        "space-after-colon"
    }

    fn description(&self) -> &str {
        "One space after the colon of a property declaration"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let NodeKind::Property(property) = &node.kind else {
                return;
            };
            let gap = &property.layout.gap_after_colon;
            if gap == " " {
                return;
            }
            let colon = colon_offset(property);
            let mut violation = ctx.violation(
                colon,
                format!("expected one space after ':' in `{}`", property.name),
            );
            if gap.chars().all(char::is_whitespace) {
                violation = violation.with_fix(Fix::replace(
                    Span::new(colon + 1, property.value_span.start),
                    " ",
                ));
            }
            violations.push(violation);
        });
        Ok(violations)
    }
}

/// No whitespace between a property name and its colon.
pub struct NoSpaceBeforeColon;

impl Check for NoSpaceBeforeColon {
    fn id(&self) -> &str {
        "no-space-before-colon"
    }

    fn description(&self) -> &str {
        "No space between a property name and its colon"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let NodeKind::Property(property) = &node.kind else {
                return;
            };
            if !property.layout.space_before_colon {
                return;
            }
            let end = property.name_span.end;
            violations.push(
                ctx.violation(end, format!("unexpected space before ':' in `{}`", property.name))
                    .with_fix(Fix::replace(Span::new(end, colon_offset(property)), "")),
            );
        });
        Ok(violations)
    }
}

/// Closing braces sit on their own line.
pub struct ClosingBraceOwnLine;

impl Check for ClosingBraceOwnLine {
    fn id(&self) -> &str {
        "closing-brace-own-line"
    }

    fn description(&self) -> &str {
        "A closing brace is on its own line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            let Some(block) = node.block() else {
                return;
            };
            if block.layout.close_on_own_line {
                return;
            }
            let close = block.layout.close.start;
            violations.push(
                ctx.violation(close, "closing brace '}' should be on its own line")
                    .with_fix(Fix::replace(Span::empty(close), "\n")),
            );
        });
        Ok(violations)
    }
}

/// Sibling rule declarations are separated by an empty line.
pub struct BlankLineBetweenRules;

impl Check for BlankLineBetweenRules {
    fn id(&self) -> &str {
        "blank-line-between-rules"
    }

    fn description(&self) -> &str {
        "An empty line separates sibling rule declarations"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        for nodes in super::sibling_lists(ctx.sheet) {
            let mut previous_is_rule = false;
            let mut blank_seen = false;
            for node in nodes {
                blank_seen |= node.blank_line_before;
                match &node.kind {
                    NodeKind::Comment(_) => continue,
                    NodeKind::Rule(rule) => {
                        if previous_is_rule && !blank_seen {
                            violations.push(ctx.violation(
                                rule.span.start,
                                "expected an empty line before this rule declaration",
                            ));
                        }
                        previous_is_rule = true;
                    }
                    _ => previous_is_rule = false,
                }
                blank_seen = false;
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::run;
    use crate::violation::apply_fixes;

    const AVATAR: &str = ".avatar{border-radius:50%;border:2px solid white; }";

    #[test]
    fn test_avatar_brace_spacing() {
        let violations = run(&SpaceBeforeBrace, AVATAR);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column, 8);

        let fixes: Vec<_> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
        let (fixed, _) = apply_fixes(AVATAR, fixes);
        assert!(fixed.starts_with(".avatar {"));
    }

    #[test]
    fn test_avatar_colon_spacing() {
        let violations = run(&SpaceAfterColon, AVATAR);
        let columns: Vec<usize> = violations.iter().map(|v| v.column).collect();
        assert_eq!(columns, vec![22, 33]);

        let fixes: Vec<_> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
        let (fixed, applied) = apply_fixes(AVATAR, fixes);
        assert_eq!(applied, 2);
        assert_eq!(fixed, ".avatar{border-radius: 50%;border: 2px solid white; }");
    }

    #[test]
    fn test_avatar_closing_brace() {
        let violations = run(&ClosingBraceOwnLine, AVATAR);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column, 51);
        assert!(run(&ClosingBraceOwnLine, ".a {\n  color: red;\n}\n").is_empty());
    }

    #[test]
    fn test_extra_spaces() {
        let source = ".a   {\n  color :  red;\n}\n";
        assert_eq!(run(&SpaceBeforeBrace, source).len(), 1);
        assert_eq!(run(&SpaceAfterColon, source).len(), 1);

        let violations = run(&NoSpaceBeforeColon, source);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (2, 8));
        let fixes: Vec<_> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
        let (fixed, _) = apply_fixes(source, fixes);
        assert_eq!(fixed, ".a   {\n  color:  red;\n}\n");
    }

    #[test]
    fn test_blank_line_between_rules() {
        let source = ".a {\n}\n.b {\n}\n\n.c {\n}\n// note\n.d {\n}\n\n// note\n.e {\n}\n";
        let violations = run(&BlankLineBetweenRules, source);
        let lines: Vec<usize> = violations.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![3, 9]);
    }

    #[test]
    fn test_rules_after_declarations_need_no_blank_line() {
        let source = ".a {\n  color: red;\n  .b {\n  }\n}\n";
        assert!(run(&BlankLineBetweenRules, source).is_empty());
    }
}
