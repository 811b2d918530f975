//! Declaration ordering, `@extend` and property value preferences.

use sassguide_syntax::{DeclarationClass, NodeKind};

use crate::check::{Check, CheckContext};
use crate::error::LintResult;
use crate::violation::{Fix, Severity, Violation};

const BORDER_PROPERTIES: &[&str] = &["border", "border-top", "border-right", "border-bottom", "border-left"];

/// Properties before includes, includes before nested blocks.
pub struct DeclarationOrder;

impl Check for DeclarationOrder {
    fn id(&self) -> &str {
        "declaration-order"
    }

    fn description(&self) -> &str {
        "Inside a block: @extend and variables, then properties, then @include, then nested rules"
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
            let mut furthest: Option<DeclarationClass> = None;
            for item in &block.nodes {
                let Some(class) = item.declaration_class() else {
                    continue;
                };
                match (&item.kind, furthest) {
                    (NodeKind::Property(property), Some(seen)) if seen >= DeclarationClass::Include => {
                        violations.push(ctx.violation(
                            property.span.start,
                            format!(
                                "property `{}` should come before @include and nested rules",
                                property.name
                            ),
                        ));
                    }
                    (NodeKind::Include(include), Some(DeclarationClass::Nested)) => {
                        violations.push(ctx.violation(
                            include.span.start,
                            format!("@include {} should come before nested rules", include.name),
                        ));
                    }
                    _ => {}
                }
                furthest = furthest.max(Some(class));
            }
        });
        Ok(violations)
    }
}

/// `@extend` is discouraged in favour of mixins.
pub struct NoExtend;

impl Check for NoExtend {
    fn id(&self) -> &str {
        "no-extend"
    }

    fn description(&self) -> &str {
        "Avoid @extend; share styles with a mixin"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext<'_>) -> LintResult<Vec<Violation>> {
        let mut violations = Vec::new();
        ctx.sheet.walk(&mut |node, _| {
            if let NodeKind::Extend(extend) = &node.kind {
                violations.push(ctx.violation(
                    extend.span.start,
                    format!("avoid `@extend {}`; use a mixin instead", extend.target),
                ));
            }
        });
        Ok(violations)
    }
}

/// `border: 0` rather than `border: none`.
pub struct PreferZeroBorder;

impl Check for PreferZeroBorder {
    fn id(&self) -> &str {
        "prefer-zero-border"
    }

    fn description(&self) -> &str {
        "Use `border: 0` instead of `border: none`"
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
            let name = property.name.to_ascii_lowercase();
            if BORDER_PROPERTIES.contains(&name.as_str()) && property.value.eq_ignore_ascii_case("none") {
                violations.push(
                    ctx.violation(
                        property.value_span.start,
                        format!("use `{}: 0` instead of `{}: none`", property.name, property.name),
                    )
                    .with_fix(Fix::replace(property.value_span, "0")),
                );
            }
        });
        Ok(violations)
    }
}
