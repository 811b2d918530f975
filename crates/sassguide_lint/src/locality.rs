//! Cross-file check that media queries live next to the rules they adjust.
//!
//! Each file contributes [`SelectorFacts`]: the selectors it styles outside
//! `@media`, and the selectors it styles inside `@media` blocks. Nested
//! selectors are resolved against their parents first, so `.card { &__title {} }`
//! counts as `.card__title`. A media reference to a selector that another
//! file declares, and this file does not, is reported.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sassguide_syntax::{Location, Node, NodeKind, Selector, StyleSheet};

use crate::error::LintError;
use crate::violation::{Severity, Violation};

pub const MEDIA_QUERY_LOCALITY: &str = "media-query-locality";

/// A selector styled inside a `@media` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub selector: String,
    pub query: String,
    pub location: Location,
}

/// Selectors one file declares and styles from media queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorFacts {
    pub file: String,
    pub base_selectors: Vec<String>,
    pub media_references: Vec<MediaReference>,
}

impl SelectorFacts {
    /// Collect facts from a parsed file, plus one error per selector whose
    /// `&` cannot be resolved. Those selectors are left out of the facts.
    pub fn collect(file: &str, sheet: &StyleSheet) -> (Self, Vec<LintError>) {
        let mut collector = Collector {
            sheet,
            facts: SelectorFacts {
                file: file.to_string(),
                ..Default::default()
            },
            errors: Vec::new(),
        };
        collector.visit(&sheet.nodes, &[], None);
        (collector.facts, collector.errors)
    }

    pub fn declares(&self, selector: &str) -> bool {
        self.base_selectors.iter().any(|s| s == selector)
    }
}

struct Collector<'a> {
    sheet: &'a StyleSheet,
    facts: SelectorFacts,
    errors: Vec<LintError>,
}

impl Collector<'_> {
    fn visit(&mut self, nodes: &[Node], parents: &[String], query: Option<&str>) {
        for node in nodes {
            match &node.kind {
                NodeKind::Rule(rule) => {
                    let mut resolved = Vec::new();
                    for selector in &rule.selectors.selectors {
                        match resolve(selector, parents) {
                            Ok(texts) => {
                                for text in texts {
                                    self.record(&text, selector, query);
                                    resolved.push(text);
                                }
                            }
                            Err(e) => self.errors.push(e),
                        }
                    }
                    if !resolved.is_empty() {
                        self.visit(&rule.block.nodes, &resolved, query);
                    }
                }
                NodeKind::AtRule(at_rule) => {
                    // Mixin bodies and keyframe stops have no fixed parent.
                    if at_rule.name == "mixin" || at_rule.is_keyframes() {
                        continue;
                    }
                    let Some(block) = &at_rule.block else {
                        continue;
                    };
                    if at_rule.is_media() {
                        self.visit(&block.nodes, parents, Some(&at_rule.prelude));
                    } else {
                        self.visit(&block.nodes, parents, query);
                    }
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, text: &str, selector: &Selector, query: Option<&str>) {
        match query {
            Some(query) => self.facts.media_references.push(MediaReference {
                selector: text.to_string(),
                query: query.to_string(),
                location: self.sheet.location(selector.span.start),
            }),
            None => {
                if !self.facts.declares(text) {
                    self.facts.base_selectors.push(text.to_string());
                }
            }
        }
    }
}

/// Full selector texts for `selector` under each of its parents.
fn resolve(selector: &Selector, parents: &[String]) -> Result<Vec<String>, LintError> {
    if parents.is_empty() {
        if selector.references_parent() {
            return Err(LintError::unevaluable(
                selector.span.start,
                format!("`{}` references a parent selector outside any rule", selector.text),
            ));
        }
        return Ok(vec![selector.text.clone()]);
    }
    Ok(parents
        .iter()
        .map(|parent| {
            if selector.references_parent() {
                selector.text.replace('&', parent)
            } else {
                format!("{} {}", parent, selector.text)
            }
        })
        .collect())
}

/// First file declaring each base selector.
#[derive(Debug, Default)]
pub struct SelectorIndex {
    owners: HashMap<String, String>,
}

impl SelectorIndex {
    /// Build the index. Facts are visited in path order.
    pub fn build(facts: &[SelectorFacts]) -> Self {
        let mut sorted: Vec<&SelectorFacts> = facts.iter().collect();
        sorted.sort_by(|a, b| a.file.cmp(&b.file));

        let mut owners = HashMap::new();
        for file in sorted {
            for selector in &file.base_selectors {
                owners
                    .entry(selector.clone())
                    .or_insert_with(|| file.file.clone());
            }
        }
        debug!("Indexed {} base selectors", owners.len());
        Self { owners }
    }

    pub fn owner(&self, selector: &str) -> Option<&str> {
        self.owners.get(selector).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// The `media-query-locality` rule.
#[derive(Debug, Clone, Copy)]
pub struct MediaQueryLocality {
    pub severity: Severity,
}

impl Default for MediaQueryLocality {
    fn default() -> Self {
        Self {
            severity: Self::DEFAULT_SEVERITY,
        }
    }
}

impl MediaQueryLocality {
    pub const DEFAULT_SEVERITY: Severity = Severity::Warning;
    pub const DESCRIPTION: &'static str =
        "Media queries sit in the same file as the base rule they adjust";

    /// Report media references whose base rule lives only in another file.
    pub fn check(&self, facts: &[SelectorFacts]) -> Vec<Violation> {
        let index = SelectorIndex::build(facts);
        let mut violations = Vec::new();
        for file in facts {
            for reference in &file.media_references {
                if file.declares(&reference.selector) {
                    continue;
                }
                let Some(owner) = index.owner(&reference.selector) else {
                    continue;
                };
                if owner == file.file {
                    continue;
                }
                violations.push(Violation::new(
                    MEDIA_QUERY_LOCALITY,
                    self.severity,
                    file.file.as_str(),
                    reference.location,
                    format!(
                        "`@media {}` styles `{}`, which is declared in {}; keep media queries next to the base rule",
                        reference.query, reference.selector, owner
                    ),
                ));
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassguide_syntax::parse;

    fn facts(file: &str, source: &str) -> SelectorFacts {
        let (facts, errors) = SelectorFacts::collect(file, &parse(source).unwrap());
        assert!(errors.is_empty(), "{:?}", errors);
        facts
    }

    #[test]
    fn test_collect() {
        let f = facts(
            "a.scss",
            ".card {\n  .title {\n  }\n}\n\n@media print {\n  .card,\n  .nav {\n  }\n}\n",
        );
        assert_eq!(f.base_selectors, vec![".card".to_string(), ".card .title".to_string()]);
        let refs: Vec<_> = f.media_references.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(refs, vec![".card", ".nav"]);
        assert_eq!(f.media_references[1].location, Location::new(8, 3));
        assert_eq!(f.media_references[0].query, "print");
    }

    #[test]
    fn test_flags_media_far_from_base() {
        let all = vec![
            facts("b.scss", "@media (min-width: 40em) {\n  .card {\n  }\n}\n"),
            facts("a.scss", ".card {\n}\n"),
        ];
        let violations = MediaQueryLocality::default().check(&all);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "b.scss");
        assert_eq!(violations[0].line, 2);
        assert!(violations[0].message.contains("a.scss"));
    }

    #[test]
    fn test_local_media_is_fine() {
        let all = vec![
            facts("a.scss", ".card {\n}\n\n@media print {\n  .card {\n  }\n}\n"),
            facts("b.scss", ".card {\n}\n\n@media print {\n  .card {\n  }\n}\n"),
            facts("c.scss", "@media print {\n  .unknown {\n  }\n}\n"),
        ];
        assert!(MediaQueryLocality::default().check(&all).is_empty());
    }

    #[test]
    fn test_first_declaring_file_wins() {
        let all = vec![facts("z.scss", ".x {\n}\n"), facts("m.scss", ".x {\n}\n")];
        let index = SelectorIndex::build(&all);
        assert_eq!(index.owner(".x"), Some("m.scss"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_parent_reference_in_media_is_unevaluable() {
        let sheet = parse("@media print {\n  &__x {\n  }\n  .y {\n  }\n}\n").unwrap();
        let (facts, errors) = SelectorFacts::collect("a.scss", &sheet);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LintError::Unevaluable { offset: 17, .. }));
        let refs: Vec<_> = facts.media_references.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(refs, vec![".y"]);
    }

    #[test]
    fn test_nested_selectors_are_resolved() {
        let f = facts(
            "a.scss",
            ".card {\n  &__title {\n  }\n\n  &:hover,\n  .icon {\n  }\n\n  @media print {\n    &--wide {\n    }\n  }\n}\n",
        );
        assert_eq!(
            f.base_selectors,
            vec![".card", ".card__title", ".card:hover", ".card .icon"]
        );
        assert_eq!(f.media_references.len(), 1);
        assert_eq!(f.media_references[0].selector, ".card--wide");
        assert_eq!(f.media_references[0].query, "print");
        assert_eq!(f.media_references[0].location, Location::new(10, 5));
    }

    #[test]
    fn test_flags_nested_selector_styled_elsewhere() {
        let all = vec![
            facts("a.scss", ".card {\n  &__title {\n  }\n}\n"),
            facts("b.scss", "@media print {\n  .card__title {\n  }\n}\n"),
        ];
        let violations = MediaQueryLocality::default().check(&all);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "b.scss");
        assert!(violations[0].message.contains(".card__title"));
    }
}
