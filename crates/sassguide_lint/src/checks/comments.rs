//! Comment placement and documentation of color variables.

use regex::Regex;

use sassguide_syntax::{Comment, CommentKind, NodeKind};

use crate::check::{Check, CheckContext};
use crate::config::CommentStyle;
use crate::error::LintResult;
use crate::violation::{Severity, Violation};

const HEX_COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

/// Comments go on their own line, above the code they describe.
pub struct CommentPlacement;

impl CommentPlacement {
    fn style_violation(ctx: &CheckContext<'_>, comment: &Comment) -> Option<Violation> {
        (ctx.config.comment_style == CommentStyle::Line && comment.kind == CommentKind::Block)
            .then(|| ctx.violation(comment.span.start, "use `//` comments instead of `/* */`"))
    }
}

impl Check for CommentPlacement {
    fn id(&self) -> &str {
        "comment-placement"
    }

    fn description(&self) -> &str {
        "Comments sit on their own line; block comments only when comment_style allows them"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| match &node.kind {
            NodeKind::Comment(comment) => {
                if comment.trailing {
                    violations.push(ctx.violation(
                        comment.span.start,
                        "comment should be on its own line above the code it describes",
                    ));
                }
                violations.extend(Self::style_violation(ctx, comment));
            }
            NodeKind::Variable(variable) => {
                if let Some(comment) = &variable.comment {
                    violations.extend(Self::style_violation(ctx, comment));
                }
            }
            _ => {}
        });
        Ok(violations)
    }
}

/// Variables holding a hex color carry a comment naming the color.
pub struct UndocumentedColorVariable;

impl Check for UndocumentedColorVariable {
    fn id(&self) -> &str {
        "undocumented-color-variable"
    }

    fn description(&self) -> &str {
        "A variable holding a hex color has a trailing comment describing it"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let pattern = Regex::new(HEX_COLOR_PATTERN)?;
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            if let NodeKind::Variable(variable) = &node.kind {
                if variable.comment.is_none() && pattern.is_match(&variable.value) {
                    violations.push(ctx.violation(
                        variable.span.start,
                        format!(
                            "color variable `${}` should have a comment describing the color, e.g. `// Dark yellow`",
                            variable.name
                        ),
                    ));
                }
            }
        });
        Ok(violations)
    }
}
