//! Canonical printer from a [`StyleSheet`] back to SCSS text.
//!
//! Output rules:
//! - one space before `{`, none before `:`, one after it
//! - every declaration ends in `;` and every `}` sits on its own line
//! - one selector per line
//! - an empty line around every item that owns a block; other empty lines
//!   are kept, collapsed to one
//! - block items ordered by [`DeclarationClass`], stably
//!
//! Comments travel with the item they precede, or with the item they trail.

use std::mem;

use tracing::trace;

use sassguide_syntax::{
    parse, tokenize, Block, Comment, DeclarationClass, Node, NodeKind, ParseResult, Span,
    StyleSheet, TokenKind,
};

use crate::options::FormatOptions;

/// Format a parsed stylesheet.
pub fn format(sheet: &StyleSheet, options: &FormatOptions) -> String {
    let mut printer = Printer {
        source: sheet.source(),
        options,
        out: String::with_capacity(sheet.source().len()),
    };
    let (_, units) = group(&sheet.nodes, false);
    printer.units(units, 0, false);

    let body = printer.out.trim_end_matches('\n');
    if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    }
}

/// Parse and format source text.
pub fn format_source(source: &str, options: &FormatOptions) -> ParseResult<String> {
    let sheet = parse(source)?;
    Ok(format(&sheet, options))
}

/// An item plus the comments that move with it.
#[derive(Default)]
struct Unit<'a> {
    /// Comments above the item, each with whether an empty line precedes it.
    leading: Vec<(&'a Comment, bool)>,
    item: Option<&'a Node>,
    trailing: Option<&'a Comment>,
    blank_before: bool,
    /// An empty line separates the last leading comment from the item.
    blank_before_item: bool,
}

impl<'a> Unit<'a> {
    fn push_leading(&mut self, node: &'a Node, comment: &'a Comment) {
        if self.leading.is_empty() {
            self.blank_before = node.blank_line_before;
        }
        self.leading.push((comment, node.blank_line_before));
    }

    fn accepts_trailing(&self) -> bool {
        match self.item.map(|n| &n.kind) {
            Some(NodeKind::Variable(variable)) => self.trailing.is_none() && variable.comment.is_none(),
            Some(_) => self.trailing.is_none(),
            None => false,
        }
    }

    fn owns_block(&self) -> bool {
        self.item.is_some_and(|n| n.block().is_some())
    }

    /// Sort key. Comment-only units stay last.
    fn rank(&self) -> u8 {
        match self.item.and_then(Node::declaration_class) {
            Some(DeclarationClass::Leading) => 0,
            Some(DeclarationClass::Property) => 1,
            Some(DeclarationClass::Include) => 2,
            Some(DeclarationClass::Nested) => 3,
            None => 4,
        }
    }
}

/// Split a node list into units. Inside a block, a trailing comment before
/// any item belongs to the `{` line and is returned separately.
fn group(nodes: &[Node], in_block: bool) -> (Option<&Comment>, Vec<Unit<'_>>) {
    let mut header = None;
    let mut units: Vec<Unit<'_>> = Vec::new();
    let mut pending = Unit::default();

    for (i, node) in nodes.iter().enumerate() {
        match &node.kind {
            NodeKind::Comment(comment) if comment.trailing => {
                if in_block && i == 0 {
                    header = Some(comment);
                    continue;
                }
                if pending.leading.is_empty() {
                    if let Some(last) = units.last_mut() {
                        if last.accepts_trailing() {
                            last.trailing = Some(comment);
                            continue;
                        }
                    }
                }
                pending.push_leading(node, comment);
            }
            NodeKind::Comment(comment) => pending.push_leading(node, comment),
            _ => {
                if pending.leading.is_empty() {
                    pending.blank_before = node.blank_line_before;
                } else {
                    pending.blank_before_item = node.blank_line_before;
                }
                pending.item = Some(node);
                units.push(mem::take(&mut pending));
            }
        }
    }
    if !pending.leading.is_empty() {
        units.push(pending);
    }
    (header, units)
}

/// Whether `raw` holds a `//` comment, which collapsing onto one line would break.
fn has_line_comment(raw: &str) -> bool {
    tokenize(raw).map_or(true, |tokens| {
        tokens.iter().any(|t| t.kind == TokenKind::LineComment)
    })
}

fn ends_with_line_comment(raw: &str) -> bool {
    tokenize(raw).map_or(false, |tokens| {
        tokens
            .iter()
            .rev()
            .find(|t| !matches!(t.kind, TokenKind::Eof | TokenKind::Whitespace))
            .is_some_and(|t| t.kind == TokenKind::LineComment)
    })
}

struct Printer<'a> {
    source: &'a str,
    options: &'a FormatOptions,
    out: String,
}

impl<'a> Printer<'a> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(self.options.indent);
        }
    }

    fn units(&mut self, mut units: Vec<Unit<'_>>, depth: usize, in_block: bool) {
        if in_block && self.options.sort_declarations {
            units.sort_by_key(Unit::rank);
        }

        let mut previous_owns_block: Option<bool> = None;
        for unit in &units {
            if let Some(previous) = previous_owns_block {
                if previous || unit.owns_block() || unit.blank_before {
                    self.out.push('\n');
                }
            }
            for (i, (comment, blank)) in unit.leading.iter().enumerate() {
                if i > 0 && *blank {
                    self.out.push('\n');
                }
                self.indent(depth);
                self.out.push_str(&comment.text);
                self.out.push('\n');
            }
            if let Some(node) = unit.item {
                if unit.blank_before_item {
                    self.out.push('\n');
                }
                self.indent(depth);
                self.node(node, depth);
                if let Some(comment) = unit.trailing {
                    self.out.push(' ');
                    self.out.push_str(&comment.text);
                }
                self.out.push('\n');
            }
            previous_owns_block = Some(unit.owns_block());
        }
    }

    fn block(&mut self, block: &Block, depth: usize) {
        self.out.push_str(" {");
        let (header, units) = group(&block.nodes, true);
        if let Some(comment) = header {
            self.out.push(' ');
            self.out.push_str(&comment.text);
        }
        self.out.push('\n');
        self.units(units, depth + 1, true);
        self.indent(depth);
        self.out.push('}');
    }

    /// Raw source of a value that cannot be collapsed onto one line.
    fn verbatim(&self, span: Span) -> Option<&'a str> {
        let raw = span.slice(self.source);
        if raw.contains('\n') && has_line_comment(raw) {
            trace!("Keeping multi-line value verbatim");
            return Some(raw);
        }
        None
    }

    /// Print an at-rule or include header as written when it holds a `//`
    /// comment. A comment at its very end gets its own line ahead of `{`/`;`.
    fn raw_header(&mut self, span: Span, depth: usize) -> bool {
        let raw = span.slice(self.source).trim();
        if !has_line_comment(raw) {
            return false;
        }
        trace!("Keeping header with line comment verbatim");
        self.out.push_str(raw);
        if ends_with_line_comment(raw) {
            self.out.push('\n');
            self.indent(depth);
        }
        true
    }

    fn node(&mut self, node: &Node, depth: usize) {
        match &node.kind {
            NodeKind::Rule(rule) => {
                for (i, selector) in rule.selectors.selectors.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(",\n");
                        self.indent(depth);
                    }
                    self.out.push_str(&selector.text);
                }
                self.block(&rule.block, depth);
            }
            NodeKind::AtRule(at_rule) => {
                self.out.push('@');
                self.out.push_str(&at_rule.name);
                if !at_rule.prelude.is_empty() {
                    self.out.push(' ');
                    if !self.raw_header(at_rule.prelude_span, depth) {
                        self.out.push_str(&at_rule.prelude);
                    }
                }
                match &at_rule.block {
                    Some(block) => self.block(block, depth),
                    None => self.out.push(';'),
                }
            }
            NodeKind::Include(include) => {
                self.out.push_str("@include ");
                if !self.raw_header(include.prelude_span, depth) {
                    self.out.push_str(&include.name);
                    if let Some(args) = &include.args {
                        self.out.push('(');
                        self.out.push_str(args);
                        self.out.push(')');
                    }
                }
                match &include.block {
                    Some(block) => self.block(block, depth),
                    None => self.out.push(';'),
                }
            }
            NodeKind::Extend(extend) => {
                self.out.push_str("@extend ");
                self.out.push_str(&extend.target);
                if extend.optional {
                    self.out.push_str(" !optional");
                }
                self.out.push(';');
            }
            NodeKind::Variable(variable) => {
                self.out.push('$');
                self.out.push_str(&variable.name);
                self.out.push_str(": ");
                if let Some(raw) = self.verbatim(variable.value_span) {
                    self.out.push_str(raw);
                } else {
                    self.out.push_str(&variable.value);
                    for flag in &variable.flags {
                        self.out.push(' ');
                        self.out.push_str(flag);
                    }
                }
                self.out.push(';');
                if let Some(comment) = &variable.comment {
                    self.out.push(' ');
                    self.out.push_str(&comment.text);
                }
            }
            NodeKind::Property(property) => {
                self.out.push_str(&property.name);
                self.out.push_str(": ");
                let value = match self.verbatim(property.value_span) {
                    Some(raw) => raw,
                    None => property.value.as_str(),
                };
                self.out.push_str(value);
                self.out.push(';');
            }
            NodeKind::Comment(comment) => self.out.push_str(&comment.text),
        }
    }
}
