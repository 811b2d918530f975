//! Built-in style checks.

mod comments;
mod directives;
mod naming;
mod selectors;
mod spacing;

use std::sync::Arc;

use sassguide_syntax::{Node, NodeKind, RuleDeclaration, StyleSheet};

use crate::check::Check;

pub use comments::{CommentPlacement, UndocumentedColorVariable};
pub use directives::{DeclarationOrder, NoExtend, PreferZeroBorder};
pub use naming::{SelectorNaming, VariableNaming};
pub use selectors::{NestingDepth, NoIdSelector, SelectorPerLine};
pub use spacing::{BlankLineBetweenRules, ClosingBraceOwnLine, NoSpaceBeforeColon, SpaceAfterColon, SpaceBeforeBrace};

/// Every per-file check shipped with sassguide.
pub fn builtin() -> Vec<Arc<dyn Check>> {
    vec![
        Arc::new(SelectorNaming),
        Arc::new(NoIdSelector),
        Arc::new(SelectorPerLine),
        Arc::new(SpaceBeforeBrace),
        Arc::new(SpaceAfterColon),
        Arc::new(NoSpaceBeforeColon),
        Arc::new(ClosingBraceOwnLine),
        Arc::new(BlankLineBetweenRules),
        Arc::new(CommentPlacement),
        Arc::new(DeclarationOrder),
        Arc::new(NestingDepth),
        Arc::new(NoExtend),
        Arc::new(PreferZeroBorder),
        Arc::new(VariableNaming),
        Arc::new(UndocumentedColorVariable),
    ]
}

/// The top-level node list followed by the node list of every block.
pub(crate) fn sibling_lists(sheet: &StyleSheet) -> Vec<&[Node]> {
    let mut lists: Vec<&[Node]> = vec![&sheet.nodes];
    sheet.walk(&mut |node, _| {
        if let Some(block) = node.block() {
            lists.push(&block.nodes);
        }
    });
    lists
}

/// Every rule declaration, paired with whether an enclosing rule or mixin
/// can supply the `&` parent.
pub(crate) fn scoped_rules(sheet: &StyleSheet) -> Vec<(&RuleDeclaration, bool)> {
    fn visit<'a>(nodes: &'a [Node], has_parent: bool, out: &mut Vec<(&'a RuleDeclaration, bool)>) {
        for node in nodes {
            match &node.kind {
                NodeKind::Rule(rule) => {
                    out.push((rule, has_parent));
                    visit(&rule.block.nodes, true, out);
                }
                NodeKind::AtRule(at_rule) => {
                    if let Some(block) = &at_rule.block {
                        visit(&block.nodes, has_parent || at_rule.name == "mixin", out);
                    }
                }
                NodeKind::Include(include) => {
                    if let Some(block) = &include.block {
                        visit(&block.nodes, true, out);
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = Vec::new();
    visit(&sheet.nodes, false, &mut out);
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use sassguide_syntax::parse;

    use crate::check::{Check, CheckContext};
    use crate::config::LintConfig;
    use crate::error::LintResult;
    use crate::violation::Violation;

    pub fn run_with(check: &dyn Check, source: &str, config: &LintConfig) -> LintResult<Vec<Violation>> {
        let sheet = parse(source).unwrap();
        let ctx = CheckContext {
            file: "test.scss",
            sheet: &sheet,
            config,
            rule_id: check.id(),
            severity: check.default_severity(),
        };
        check.check(&ctx)
    }

    pub fn run(check: &dyn Check, source: &str) -> Vec<Violation> {
        run_with(check, source, &LintConfig::default()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassguide_syntax::parse;

    #[test]
    fn test_builtin_ids_are_unique() {
        let checks = builtin();
        let mut ids: Vec<&str> = checks.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), checks.len());
    }

    #[test]
    fn test_sibling_lists() {
        let sheet = parse(".a {\n  .b {\n  }\n}\n@media print {\n}\n").unwrap();
        let sizes: Vec<usize> = sibling_lists(&sheet).iter().map(|l| l.len()).collect();
        assert_eq!(sizes, vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_scoped_rules() {
        let sheet = parse("@mixin m {\n  &__x {\n  }\n}\n.a {\n  &__y {\n  }\n}\n&__z {\n}\n").unwrap();
        let scopes: Vec<(String, bool)> = scoped_rules(&sheet)
            .into_iter()
            .map(|(r, p)| (r.selectors.selectors[0].text.clone(), p))
            .collect();
        assert_eq!(
            scopes,
            vec![
                ("&__x".to_string(), true),
                (".a".to_string(), false),
                ("&__y".to_string(), true),
                ("&__z".to_string(), false),
            ]
        );
    }
}
