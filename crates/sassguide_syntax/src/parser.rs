//! Recursive-descent parser from tokens to a [`StyleSheet`].
//!
//! A statement that reaches `{` before any `;` or `}` at parenthesis depth
//! zero is a rule declaration; anything else is a declaration. Comments and
//! blank lines are kept so layout checks can see them.

use tracing::{debug, trace};

use crate::ast::{
    AtRule, Block, BlockLayout, Comment, CommentKind, Extend, Include, Node, NodeKind, Property,
    PropertyLayout, RuleDeclaration, StyleSheet, Variable,
};
use crate::error::{ParseError, ParseResult};
use crate::selector::{collapse_whitespace, normalize_commas, parse_selector_list};
use crate::span::{LineIndex, Location, Span};
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Guards against pathological input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed block nesting.
    pub max_depth: usize,
    /// Largest accepted input, in bytes.
    pub max_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_len: 16 * 1024 * 1024,
        }
    }
}

/// Parse SCSS source with default options.
pub fn parse(source: &str) -> ParseResult<StyleSheet> {
    parse_with_options(source, ParseOptions::default())
}

/// Parse SCSS source.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult<StyleSheet> {
    if source.len() > options.max_len {
        return Err(ParseError::new(
            Location::new(1, 1),
            format!("input exceeds maximum size of {} bytes", options.max_len),
        ));
    }

    let tokens = tokenize(source)?;
    debug!("Parsing {} tokens", tokens.len());

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
        options,
        line_index: LineIndex::new(source),
    };
    let nodes = parser.nodes(false)?;
    Ok(StyleSheet::new(nodes, parser.line_index))
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    pos: usize,
    depth: usize,
    options: ParseOptions,
    line_index: LineIndex,
}

impl<'src> Parser<'src> {
    #[inline]
    fn peek(&self) -> Token<'src> {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, offset: u32, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.line_index.location(offset), reason)
    }

    fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }

    /// Parse items until `}` (inside a block) or end of input.
    fn nodes(&mut self, in_block: bool) -> ParseResult<Vec<Node>> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut blank = false;
        // Nothing but whitespace precedes the cursor on its line.
        let mut line_start = !in_block;

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Whitespace => {
                    let newlines = token.newlines();
                    if newlines >= 1 {
                        line_start = true;
                    }
                    if newlines >= 2 {
                        blank = true;
                    }
                    self.bump();
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.bump();
                    let comment = Comment {
                        kind: if token.kind == TokenKind::LineComment {
                            CommentKind::Line
                        } else {
                            CommentKind::Block
                        },
                        text: token.text.trim_end().to_string(),
                        span: token.span,
                        trailing: !line_start,
                    };
                    line_start = false;

                    if comment.trailing {
                        if let Some(NodeKind::Variable(variable)) = nodes.last_mut().map(|n| &mut n.kind) {
                            if variable.comment.is_none() {
                                trace!("Attaching comment to ${}", variable.name);
                                variable.comment = Some(comment);
                                continue;
                            }
                        }
                    }

                    let mut node = Node::new(NodeKind::Comment(comment));
                    node.blank_line_before = blank;
                    nodes.push(node);
                    blank = false;
                }
                TokenKind::RBrace if in_block => return Ok(nodes),
                TokenKind::RBrace => return Err(self.error(token.span.start, "unexpected '}'")),
                TokenKind::Eof => return Ok(nodes),
                TokenKind::Semicolon => {
                    self.bump();
                    line_start = false;
                }
                _ => {
                    let kind = self.statement(nodes.len())?;
                    let mut node = Node::new(kind);
                    node.blank_line_before = blank;
                    nodes.push(node);
                    blank = false;
                    line_start = false;
                }
            }
        }
    }

    fn statement(&mut self, order: usize) -> ParseResult<NodeKind> {
        let token = self.peek();
        match token.kind {
            TokenKind::AtKeyword => {
                let name = token.text[1..].to_ascii_lowercase();
                match name.as_str() {
                    "include" => self.include(),
                    "extend" => self.extend(),
                    _ => self.at_rule(name),
                }
            }
            TokenKind::Variable if self.next_significant(self.pos + 1).kind == TokenKind::Colon => {
                self.variable()
            }
            _ => {
                let end = self.statement_end(self.pos);
                if self.tokens[end].kind == TokenKind::LBrace {
                    self.rule(end)
                } else {
                    self.property(end, order)
                }
            }
        }
    }

    fn next_significant(&self, mut index: usize) -> Token<'src> {
        while index < self.tokens.len() - 1 && self.tokens[index].kind == TokenKind::Whitespace {
            index += 1;
        }
        self.tokens[index.min(self.tokens.len() - 1)]
    }

    /// Index of the first `{`, `;`, `}` or end of input at depth zero.
    fn statement_end(&self, from: usize) -> usize {
        let mut depth = 0usize;
        let mut index = from;
        loop {
            let token = &self.tokens[index];
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace if depth == 0 => {
                    return index;
                }
                TokenKind::Eof => return index,
                _ => {}
            }
            index += 1;
        }
    }

    /// First and last non-trivia token indices in `from..to`.
    fn content_range(&self, from: usize, to: usize) -> Option<(usize, usize)> {
        let first = (from..to).find(|&i| !self.tokens[i].kind.is_trivia())?;
        let last = (from..to).rev().find(|&i| !self.tokens[i].kind.is_trivia())?;
        Some((first, last))
    }

    fn block(&mut self, header_start: u32) -> ParseResult<Block> {
        let open = self.bump();
        debug_assert_eq!(open.kind, TokenKind::LBrace);

        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error(
                open.span.start,
                format!("nesting exceeds maximum depth of {}", self.options.max_depth),
            ));
        }

        let nodes = self.nodes(true)?;
        let close = self.peek();
        if close.kind != TokenKind::RBrace {
            return Err(self.error(open.span.start, "unclosed block: expected '}'"));
        }
        let close_on_own_line = self.pos > 0 && {
            let prev = self.tokens[self.pos - 1];
            prev.kind == TokenKind::Whitespace && prev.text.contains('\n')
        };
        self.bump();
        self.depth -= 1;

        let header = self.slice(header_start, open.span.start);
        Ok(Block {
            nodes,
            layout: BlockLayout {
                open: open.span,
                close: close.span,
                gap_before_open: header[header.trim_end().len()..].to_string(),
                close_on_own_line,
            },
        })
    }

    fn rule(&mut self, brace: usize) -> ParseResult<NodeKind> {
        let start = self.peek().span.start;
        let raw = self.slice(start, self.tokens[brace].span.start);
        let selectors = parse_selector_list(raw, start).map_err(|e| {
            self.error(e.offset, format!("invalid selector: {}", e.reason))
        })?;
        trace!("Rule {:?}", raw.trim());

        self.pos = brace;
        let block = self.block(start)?;
        let span = Span::new(start, block.layout.close.end);
        Ok(NodeKind::Rule(RuleDeclaration {
            selectors,
            block,
            span,
        }))
    }

    fn property(&mut self, end: usize, order: usize) -> ParseResult<NodeKind> {
        let start = self.peek().span.start;

        let mut depth = 0usize;
        let colon = (self.pos..end).find(|&i| {
            match self.tokens[i].kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::Colon if depth == 0 => return true,
                _ => {}
            }
            false
        });
        let Some(colon) = colon else {
            return Err(self.error(start, "expected ':' in declaration"));
        };
        let colon_span = self.tokens[colon].span;

        let name_raw = self.slice(start, colon_span.start);
        let name = collapse_whitespace(name_raw);
        if name.is_empty() {
            return Err(self.error(start, "expected property name before ':'"));
        }

        let Some((first, last)) = self.content_range(colon + 1, end) else {
            return Err(self.error(colon_span.end, "missing value in declaration"));
        };
        let value_span = Span::new(self.tokens[first].span.start, self.tokens[last].span.end);
        let value = collapse_whitespace(value_span.slice(self.source));

        self.pos = last + 1;
        let span_end = self.finish_statement(value_span.end);

        Ok(NodeKind::Property(Property {
            name,
            value,
            span: Span::new(start, span_end),
            name_span: Span::new(start, start + name_raw.trim_end().len() as u32),
            value_span,
            order,
            layout: PropertyLayout {
                space_before_colon: name_raw.ends_with(char::is_whitespace),
                gap_after_colon: self.slice(colon_span.end, value_span.start).to_string(),
            },
        }))
    }

    /// Consume a `;` that follows (after whitespace only). Returns the statement end offset.
    fn finish_statement(&mut self, content_end: u32) -> u32 {
        let mut index = self.pos;
        while self.tokens[index].kind == TokenKind::Whitespace {
            index += 1;
        }
        if self.tokens[index].kind == TokenKind::Semicolon {
            self.pos = index + 1;
            return self.tokens[index].span.end;
        }
        content_end
    }

    fn variable(&mut self) -> ParseResult<NodeKind> {
        let name_token = self.bump();
        let start = name_token.span.start;
        while self.peek().kind == TokenKind::Whitespace {
            self.bump();
        }
        let colon = self.bump();
        debug_assert_eq!(colon.kind, TokenKind::Colon);

        let end = self.statement_end(self.pos);
        if self.tokens[end].kind == TokenKind::LBrace {
            return Err(self.error(
                self.tokens[end].span.start,
                "unexpected '{' in variable declaration",
            ));
        }
        let Some((first, last)) = self.content_range(self.pos, end) else {
            return Err(self.error(colon.span.end, "missing value in variable declaration"));
        };
        let value_span = Span::new(self.tokens[first].span.start, self.tokens[last].span.end);
        let (value, flags) = split_flags(&collapse_whitespace(value_span.slice(self.source)));

        self.pos = last + 1;
        let span_end = self.finish_statement(value_span.end);

        Ok(NodeKind::Variable(Variable {
            name: name_token.text[1..].to_string(),
            value,
            flags,
            comment: None,
            span: Span::new(start, span_end),
            name_span: name_token.span,
            value_span,
        }))
    }

    /// Text between an at-keyword and the end of its header, its raw span,
    /// plus the end index.
    fn prelude(&self) -> (String, Span, usize) {
        let keyword = self.peek();
        let end = self.statement_end(self.pos + 1);
        let raw_span = Span::new(keyword.span.end, self.tokens[end].span.start);
        (collapse_whitespace(raw_span.slice(self.source)), raw_span, end)
    }

    fn include(&mut self) -> ParseResult<NodeKind> {
        let start = self.peek().span.start;
        let (prelude, prelude_span, end) = self.prelude();
        if prelude.is_empty() {
            return Err(self.error(start, "expected mixin name after @include"));
        }
        let (name, args) = split_include(&prelude);

        self.pos = end;
        let (block, span_end) = match self.tokens[end].kind {
            TokenKind::LBrace => {
                let block = self.block(start)?;
                let close = block.layout.close.end;
                (Some(block), close)
            }
            TokenKind::Semicolon => (None, self.bump().span.end),
            _ => (None, self.tokens[end].span.start),
        };

        Ok(NodeKind::Include(Include {
            name,
            args,
            prelude_span,
            block,
            span: Span::new(start, span_end),
        }))
    }

    fn extend(&mut self) -> ParseResult<NodeKind> {
        let start = self.peek().span.start;
        let (prelude, _, end) = self.prelude();
        if self.tokens[end].kind == TokenKind::LBrace {
            return Err(self.error(self.tokens[end].span.start, "unexpected '{' after @extend"));
        }
        let (target, optional) = match prelude.strip_suffix("!optional") {
            Some(rest) => (rest.trim_end().to_string(), true),
            None => (prelude, false),
        };
        if target.is_empty() {
            return Err(self.error(start, "expected selector after @extend"));
        }

        self.pos = end;
        let span_end = if self.tokens[end].kind == TokenKind::Semicolon {
            self.bump().span.end
        } else {
            self.tokens[end].span.start
        };

        Ok(NodeKind::Extend(Extend {
            target,
            optional,
            span: Span::new(start, span_end),
        }))
    }

    fn at_rule(&mut self, name: String) -> ParseResult<NodeKind> {
        let start = self.peek().span.start;
        let (prelude, prelude_span, end) = self.prelude();

        self.pos = end;
        let (block, span_end) = match self.tokens[end].kind {
            TokenKind::LBrace => {
                let block = self.block(start)?;
                let close = block.layout.close.end;
                (Some(block), close)
            }
            TokenKind::Semicolon => (None, self.bump().span.end),
            _ => (None, self.tokens[end].span.start),
        };

        Ok(NodeKind::AtRule(AtRule {
            name,
            prelude,
            prelude_span,
            block,
            span: Span::new(start, span_end),
        }))
    }
}

/// Split trailing `!default` / `!global` flags off a variable value.
fn split_flags(value: &str) -> (String, Vec<String>) {
    let mut value = value.to_string();
    let mut flags = Vec::new();
    while let Some(index) = value.rfind(' ') {
        let last = value[index + 1..].to_ascii_lowercase();
        if last == "!default" || last == "!global" {
            flags.insert(0, last);
            value.truncate(index);
            value.truncate(value.trim_end().len());
        } else {
            break;
        }
    }
    (value, flags)
}

/// `name(args)` → (`name`, `Some(args)`); anything irregular keeps the whole text as the name.
fn split_include(prelude: &str) -> (String, Option<String>) {
    let Some(open) = prelude.find('(') else {
        return (prelude.to_string(), None);
    };
    let name = prelude[..open].trim_end();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return (prelude.to_string(), None);
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in prelude[open..].char_indices() {
        let at = open + i;
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if at == prelude.len() - 1 {
                        let args = normalize_commas(prelude[open + 1..at].trim());
                        return (name.to_string(), Some(args));
                    }
                    break;
                }
            }
            _ => {}
        }
    }
    (prelude.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_flags() {
        assert_eq!(
            split_flags("10px !default !global"),
            ("10px".to_string(), vec!["!default".to_string(), "!global".to_string()])
        );
        assert_eq!(split_flags("red"), ("red".to_string(), vec![]));
    }

    #[test]
    fn test_split_include() {
        assert_eq!(
            split_include("button(red, $size: 2)"),
            ("button".to_string(), Some("red, $size: 2".to_string()))
        );
        assert_eq!(split_include("clearfix"), ("clearfix".to_string(), None));
        assert_eq!(split_include("reset()"), ("reset".to_string(), Some(String::new())));
        assert_eq!(
            split_include("slides(3) using ($n)"),
            ("slides(3) using ($n)".to_string(), None)
        );
    }
}
