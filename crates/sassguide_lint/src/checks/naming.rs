//! Naming conventions for selectors and variables.

use regex::Regex;

use sassguide_syntax::{NodeKind, SelectorKind};

use crate::check::{Check, CheckContext};
use crate::error::LintResult;
use crate::violation::{Severity, Violation};

/// Lowercase dash-case words, optionally joined by BEM `__element` and `--modifier` markers.
const CLASS_NAME_PATTERN: &str =
    r"^[a-z0-9]+(?:-[a-z0-9]+)*(?:__[a-z0-9]+(?:-[a-z0-9]+)*)*(?:--[a-z0-9]+(?:-[a-z0-9]+)*)*$";

/// Lowercase dash-case, with an optional leading underscore for file-local variables.
const VARIABLE_NAME_PATTERN: &str = r"^_?[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Class and placeholder names must be dash-case.
pub struct SelectorNaming;

impl Check for SelectorNaming {
    fn id(&self) -> &str {
        "selector-naming"
    }

    fn description(&self) -> &str {
        "Class and placeholder names are lowercase dash-case; underscores only as BEM markers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let pattern = Regex::new(CLASS_NAME_PATTERN)?;
        let mut violations = Vec::new();

        for (rule, has_parent) in super::scoped_rules(ctx.sheet) {
            for selector in &rule.selectors.selectors {
                if !has_parent && selector.references_parent() {
                    violations.push(ctx.unevaluable(
                        selector.span.start,
                        format!("`{}` references a parent selector outside any rule", selector.text),
                    ));
                    continue;
                }
                for part in selector.simple_selectors() {
                    if part.has_interpolation() {
                        continue;
                    }
                    let (what, candidate) = match part.kind {
                        SelectorKind::Class => ("class", part.name.clone()),
                        SelectorKind::Placeholder => ("placeholder", part.name.clone()),
                        SelectorKind::ParentSuffix => ("class", format!("x{}", part.name)),
                        _ => continue,
                    };
                    if !pattern.is_match(&candidate) {
                        violations.push(ctx.violation(
                            part.span.start,
                            format!(
                                "{} name `{}` should be lowercase dash-case (BEM `__element` and `--modifier` allowed)",
                                what, part.name
                            ),
                        ));
                    }
                }
            }
        }
        Ok(violations)
    }
}

/// Variable names must be dash-case.
pub struct VariableNaming;

impl Check for VariableNaming {
    fn id(&self) -> &str {
        "variable-naming"
    }

    fn description(&self) -> &str {
        "Variable names are lowercase dash-case, with a leading underscore for file-local ones"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let pattern = Regex::new(VARIABLE_NAME_PATTERN)?;
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            if let NodeKind::Variable(variable) = &node.kind {
                if !pattern.is_match(&variable.name) {
                    violations.push(ctx.violation(
                        variable.name_span.start,
                        format!("variable `${}` should be lowercase dash-case", variable.name),
                    ));
                }
            }
        });
        Ok(violations)
    }
}
