//! Syntax tree types.
//!
//! A [`StyleSheet`] owns every node parsed from one source file. Top-level
//! items and block items share the [`Node`] type; which kinds are legal where
//! is left to the lint checks rather than the parser.

use crate::selector::SelectorList;
use crate::span::{LineIndex, Location, Span};

/// A parsed stylesheet.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub nodes: Vec<Node>,
    line_index: LineIndex,
}

impl StyleSheet {
    pub fn new(nodes: Vec<Node>, line_index: LineIndex) -> Self {
        Self { nodes, line_index }
    }

    /// Resolve a byte offset in the source to a line/column pair.
    pub fn location(&self, offset: u32) -> Location {
        self.line_index.location(offset)
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// The source text the tree was parsed from.
    pub fn source(&self) -> &str {
        self.line_index.source()
    }

    /// Visit every node depth-first, in source order.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a Node, WalkContext)) {
        walk_nodes(&self.nodes, WalkContext::default(), visitor);
    }
}

/// Where a node sits while walking the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkContext {
    /// Number of rule declarations enclosing the node.
    pub rule_depth: usize,
    /// Inside an `@media` block, at any level.
    pub in_media: bool,
    /// Inside an `@keyframes` block.
    pub in_keyframes: bool,
}

fn walk_nodes<'a>(nodes: &'a [Node], ctx: WalkContext, visitor: &mut impl FnMut(&'a Node, WalkContext)) {
    for node in nodes {
        visitor(node, ctx);
        match &node.kind {
            NodeKind::Rule(rule) => {
                let inner = WalkContext {
                    rule_depth: ctx.rule_depth + 1,
                    ..ctx
                };
                walk_nodes(&rule.block.nodes, inner, visitor);
            }
            NodeKind::AtRule(at_rule) => {
                if let Some(block) = &at_rule.block {
                    let inner = WalkContext {
                        in_media: ctx.in_media || at_rule.is_media(),
                        in_keyframes: ctx.in_keyframes || at_rule.is_keyframes(),
                        ..ctx
                    };
                    walk_nodes(&block.nodes, inner, visitor);
                }
            }
            NodeKind::Include(include) => {
                if let Some(block) = &include.block {
                    walk_nodes(&block.nodes, ctx, visitor);
                }
            }
            _ => {}
        }
    }
}

/// A top-level or block item.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// At least one empty line separates this node from what precedes it.
    pub blank_line_before: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            blank_line_before: false,
        }
    }

    pub fn span(&self) -> Span {
        match &self.kind {
            NodeKind::Rule(r) => r.span,
            NodeKind::AtRule(a) => a.span,
            NodeKind::Comment(c) => c.span,
            NodeKind::Property(p) => p.span,
            NodeKind::Include(i) => i.span,
            NodeKind::Extend(e) => e.span,
            NodeKind::Variable(v) => v.span,
        }
    }

    /// The block this node owns, if any.
    pub fn block(&self) -> Option<&Block> {
        match &self.kind {
            NodeKind::Rule(r) => Some(&r.block),
            NodeKind::AtRule(a) => a.block.as_ref(),
            NodeKind::Include(i) => i.block.as_ref(),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match &self.kind {
            NodeKind::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// Ordering class of this node inside a block. Comments have none.
    pub fn declaration_class(&self) -> Option<DeclarationClass> {
        match &self.kind {
            NodeKind::Comment(_) => None,
            NodeKind::Extend(_) | NodeKind::Variable(_) => Some(DeclarationClass::Leading),
            NodeKind::Property(_) => Some(DeclarationClass::Property),
            NodeKind::Include(_) => Some(DeclarationClass::Include),
            NodeKind::Rule(_) => Some(DeclarationClass::Nested),
            NodeKind::AtRule(a) if a.block.is_some() => Some(DeclarationClass::Nested),
            NodeKind::AtRule(_) => Some(DeclarationClass::Leading),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Rule(RuleDeclaration),
    AtRule(AtRule),
    Comment(Comment),
    Property(Property),
    Include(Include),
    Extend(Extend),
    Variable(Variable),
}

/// Canonical order of declarations inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclarationClass {
    /// `@extend`, local variables and statement at-rules.
    Leading,
    Property,
    Include,
    /// Nested rule declarations and block at-rules.
    Nested,
}

/// A `{ ... }` block and the layout of its braces.
#[derive(Debug, Clone)]
pub struct Block {
    pub nodes: Vec<Node>,
    pub layout: BlockLayout,
}

#[derive(Debug, Clone, Default)]
pub struct BlockLayout {
    pub open: Span,
    pub close: Span,
    /// Raw text between the header and `{`.
    pub gap_before_open: String,
    /// Only whitespace (with a newline) precedes `}` on its line.
    pub close_on_own_line: bool,
}

/// A selector group and its declarations.
#[derive(Debug, Clone)]
pub struct RuleDeclaration {
    pub selectors: SelectorList,
    pub block: Block,
    pub span: Span,
}

/// Any `@`-rule other than `@include` and `@extend`.
#[derive(Debug, Clone)]
pub struct AtRule {
    /// Lowercased name without the `@`.
    pub name: String,
    /// Whitespace-normalized text between the name and `{`/`;`.
    pub prelude: String,
    /// Source span of the prelude before normalization.
    pub prelude_span: Span,
    pub block: Option<Block>,
    pub span: Span,
}

impl AtRule {
    pub fn is_media(&self) -> bool {
        self.name == "media"
    }

    pub fn is_keyframes(&self) -> bool {
        self.name == "keyframes" || self.name.ends_with("-keyframes")
    }
}

/// `name: value;`
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub span: Span,
    pub name_span: Span,
    pub value_span: Span,
    /// Position among the block's nodes.
    pub order: usize,
    pub layout: PropertyLayout,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyLayout {
    pub space_before_colon: bool,
    /// Raw text between `:` and the value.
    pub gap_after_colon: String,
}

/// `@include name(args);` or `@include name(args) { ... }`
#[derive(Debug, Clone)]
pub struct Include {
    pub name: String,
    /// Text between the argument parentheses, if there were any, with one
    /// space after each comma.
    pub args: Option<String>,
    /// Source span of everything between `@include` and `{`/`;`.
    pub prelude_span: Span,
    pub block: Option<Block>,
    pub span: Span,
}

/// `@extend target;`
#[derive(Debug, Clone)]
pub struct Extend {
    pub target: String,
    pub optional: bool,
    pub span: Span,
}

/// `$name: value;`
#[derive(Debug, Clone)]
pub struct Variable {
    /// Name without the `$`.
    pub name: String,
    pub value: String,
    /// `!default`, `!global`
    pub flags: Vec<String>,
    /// Comment on the same line, after the declaration.
    pub comment: Option<Comment>,
    pub span: Span,
    pub name_span: Span,
    pub value_span: Span,
}

impl Variable {
    pub fn visibility(&self) -> Visibility {
        if self.name.starts_with('_') {
            Visibility::FileLocal
        } else {
            Visibility::Global
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Underscore-prefixed; not meant for use outside its file.
    FileLocal,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub kind: CommentKind,
    /// Raw text including delimiters.
    pub text: String,
    pub span: Span,
    /// Code precedes the comment on its line.
    pub trailing: bool,
}
