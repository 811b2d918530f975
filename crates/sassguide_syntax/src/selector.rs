//! Selector parsing, classification and specificity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::{LineIndex, Span};

/// What a simple selector matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    Class,
    Id,
    Attribute,
    Element,
    Pseudo,
    PseudoElement,
    Universal,
    /// `%name`
    Placeholder,
    /// `&`
    Parent,
    /// `&__element`, `&--modifier`
    ParentSuffix,
    /// `#{...}`
    Interpolation,
}

impl SelectorKind {
    fn rank(self) -> u8 {
        match self {
            SelectorKind::Id => 3,
            SelectorKind::Class
            | SelectorKind::Placeholder
            | SelectorKind::ParentSuffix
            | SelectorKind::Attribute
            | SelectorKind::Pseudo => 2,
            SelectorKind::Element | SelectorKind::PseudoElement => 1,
            SelectorKind::Universal | SelectorKind::Parent | SelectorKind::Interpolation => 0,
        }
    }
}

/// CSS specificity as `(ids, classes, types)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// One simple selector inside a complex selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    pub kind: SelectorKind,
    /// Name without its sigil (`.`, `#`, `:`, `%`, `&`).
    pub name: String,
    pub span: Span,
    /// Index of the compound selector this belongs to.
    pub compound: usize,
    /// Parsed arguments of `:not()`, `:is()`, `:where()`, `:has()`.
    pub arguments: Vec<Selector>,
}

impl SimpleSelector {
    pub fn has_interpolation(&self) -> bool {
        self.name.contains("#{")
    }

    fn specificity(&self) -> Specificity {
        match self.kind {
            SelectorKind::Id => Specificity(1, 0, 0),
            SelectorKind::Class
            | SelectorKind::Attribute
            | SelectorKind::Placeholder
            | SelectorKind::ParentSuffix => Specificity(0, 1, 0),
            SelectorKind::Pseudo => match self.name.to_ascii_lowercase().as_str() {
                "where" => Specificity::default(),
                "is" | "not" | "has" | "matches" | "-moz-any" | "-webkit-any" => self
                    .arguments
                    .iter()
                    .map(|s| s.specificity)
                    .max()
                    .unwrap_or_default(),
                _ => Specificity(0, 1, 0),
            },
            SelectorKind::Element | SelectorKind::PseudoElement => Specificity(0, 0, 1),
            SelectorKind::Universal | SelectorKind::Parent | SelectorKind::Interpolation => {
                Specificity::default()
            }
        }
    }
}

/// A complex selector such as `.nav > li a:hover`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Whitespace-normalized text with comments removed.
    pub text: String,
    pub span: Span,
    pub parts: Vec<SimpleSelector>,
    pub specificity: Specificity,
}

impl Selector {
    /// Kind of the key (rightmost) compound's most significant simple selector.
    pub fn kind(&self) -> SelectorKind {
        let last = self.parts.last().map_or(0, |p| p.compound);
        self.parts
            .iter()
            .filter(|p| p.compound == last)
            .fold(None::<&SimpleSelector>, |best, p| match best {
                Some(b) if b.kind.rank() > p.kind.rank() => Some(b),
                _ => Some(p),
            })
            .map_or(SelectorKind::Universal, |p| p.kind)
    }

    /// Every simple selector, including those nested in pseudo-class arguments.
    pub fn simple_selectors(&self) -> Vec<&SimpleSelector> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.push(part);
            for arg in &part.arguments {
                out.extend(arg.simple_selectors());
            }
        }
        out
    }

    /// Whether the selector references its parent with `&`.
    pub fn references_parent(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p.kind, SelectorKind::Parent | SelectorKind::ParentSuffix))
    }
}

/// Comma-separated selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
    pub span: Span,
}

impl SelectorList {
    /// Selectors that start on the line where the previous one ends.
    pub fn sharing_lines<'a>(&'a self, index: &'a LineIndex) -> impl Iterator<Item = &'a Selector> + 'a {
        self.selectors.windows(2).filter_map(move |pair| {
            let previous_line = index.location(pair[0].span.end).line;
            (index.location(pair[1].span.start).line == previous_line).then_some(&pair[1])
        })
    }

    /// Whether every selector of the group was written on its own line.
    pub fn one_per_line(&self, index: &LineIndex) -> bool {
        self.sharing_lines(index).next().is_none()
    }
}

/// Why a selector could not be parsed, with an absolute byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub offset: u32,
    pub reason: String,
}

/// Parse a selector group. `base` is the absolute offset of `raw` in the file.
pub fn parse_selector_list(raw: &str, base: u32) -> Result<SelectorList, SelectorError> {
    let mut selectors = Vec::new();
    let pieces = split_top_level(raw, base)?;
    if pieces.iter().all(|(text, _)| strip_comments(text).trim().is_empty()) {
        return Err(SelectorError {
            offset: base,
            reason: "missing selector".to_string(),
        });
    }
    for (piece, offset) in pieces {
        let lead = piece.len() - piece.trim_start().len();
        let start = offset + lead as u32;
        let trimmed = piece.trim();
        if strip_comments(trimmed).trim().is_empty() {
            return Err(SelectorError {
                offset: start,
                reason: "empty selector in selector list".to_string(),
            });
        }
        selectors.push(parse_selector(trimmed, start)?);
    }
    let trimmed_len = raw.trim_end().len() as u32;
    let lead = (raw.len() - raw.trim_start().len()) as u32;
    Ok(SelectorList {
        selectors,
        span: Span::new(base + lead, base + trimmed_len.max(lead)),
    })
}

/// Split on commas outside brackets, parentheses, strings and interpolation.
fn split_top_level(raw: &str, base: u32) -> Result<Vec<(&str, u32)>, SelectorError> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    let bytes = raw.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if let Some(q) = quote {
            if c == '\\' {
                i += 1;
            } else if c == q {
                quote = None;
            }
        } else {
            match c {
                '"' | '\'' => quote = Some(c),
                '/' if bytes.get(i + 1) == Some(&b'*') => {
                    if let Some(end) = raw[i + 2..].find("*/") {
                        i += end + 3;
                    } else {
                        i = bytes.len();
                    }
                }
                '/' if bytes.get(i + 1) == Some(&b'/') => {
                    i = raw[i..].find('\n').map_or(bytes.len(), |end| i + end);
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(SelectorError {
                            offset: base + i as u32,
                            reason: format!("unbalanced '{}' in selector", c),
                        });
                    }
                }
                ',' if depth == 0 => {
                    pieces.push((&raw[start..i], base + start as u32));
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    if depth > 0 {
        return Err(SelectorError {
            offset: base + raw.len() as u32,
            reason: "unclosed bracket in selector".to_string(),
        });
    }
    pieces.push((&raw[start..], base + start as u32));
    Ok(pieces)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Collapse whitespace runs to one space, outside strings.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    let mut escaped = false;
    for c in text.trim().chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Collapse whitespace and put exactly one space after each comma, none
/// before it, outside strings.
pub fn normalize_commas(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let mut out = String::with_capacity(collapsed.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut after_comma = false;
    for c in collapsed.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            ',' => {
                if out.ends_with(' ') {
                    out.pop();
                }
                out.push(',');
                after_comma = true;
                continue;
            }
            ' ' if after_comma => continue,
            _ => {}
        }
        if after_comma && c != ')' {
            out.push(' ');
        }
        after_comma = false;
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

fn parse_selector(raw: &str, base: u32) -> Result<Selector, SelectorError> {
    let mut scanner = Scanner {
        raw,
        chars: raw.char_indices().collect(),
        i: 0,
        base,
    };
    let parts = scanner.complex_selector()?;
    let specificity = parts
        .iter()
        .map(SimpleSelector::specificity)
        .fold(Specificity::default(), |acc, s| acc + s);
    Ok(Selector {
        text: collapse_whitespace(&strip_comments(raw)),
        span: Span::new(base, base + raw.len() as u32),
        parts,
        specificity,
    })
}

struct Scanner<'a> {
    raw: &'a str,
    chars: Vec<(usize, char)>,
    i: usize,
    base: u32,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).map(|&(_, c)| c)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.i).map_or(self.raw.len(), |&(o, _)| o)
    }

    fn error(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError {
            offset: self.base + self.offset() as u32,
            reason: reason.into(),
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.base + start as u32, self.base + self.offset() as u32)
    }

    fn complex_selector(&mut self) -> Result<Vec<SimpleSelector>, SelectorError> {
        let mut parts = Vec::new();
        let mut compound = 0usize;
        let mut in_compound = false;
        let mut gap = false;

        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    gap = true;
                    self.i += 1;
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.skip_block_comment();
                    gap = true;
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.i += 1;
                    }
                    gap = true;
                }
                '>' | '+' | '~' => {
                    self.i += 1;
                    if in_compound {
                        compound += 1;
                        in_compound = false;
                    }
                    gap = false;
                }
                _ => {
                    if gap && in_compound {
                        compound += 1;
                    }
                    gap = false;
                    in_compound = true;
                    let mut part = self.simple_selector()?;
                    part.compound = compound;
                    parts.push(part);
                }
            }
        }

        if parts.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(parts)
    }

    fn skip_block_comment(&mut self) {
        self.i += 2;
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_nth(1) == Some('/') {
                self.i += 2;
                return;
            }
            self.i += 1;
        }
    }

    fn simple_selector(&mut self) -> Result<SimpleSelector, SelectorError> {
        let start = self.offset();
        let c = self.peek().unwrap_or(' ');
        let (kind, name, arguments) = match c {
            '.' => {
                self.i += 1;
                (SelectorKind::Class, self.required_ident("class name")?, Vec::new())
            }
            '#' if self.peek_nth(1) == Some('{') => (SelectorKind::Interpolation, self.ident(), Vec::new()),
            '#' => {
                self.i += 1;
                (SelectorKind::Id, self.required_ident("id name")?, Vec::new())
            }
            '%' => {
                self.i += 1;
                (SelectorKind::Placeholder, self.required_ident("placeholder name")?, Vec::new())
            }
            '*' => {
                self.i += 1;
                (SelectorKind::Universal, "*".to_string(), Vec::new())
            }
            '&' => {
                self.i += 1;
                let suffix = self.ident();
                if suffix.is_empty() {
                    (SelectorKind::Parent, String::new(), Vec::new())
                } else {
                    (SelectorKind::ParentSuffix, suffix, Vec::new())
                }
            }
            '[' => (SelectorKind::Attribute, self.attribute()?, Vec::new()),
            ':' => return self.pseudo(start),
            c if is_ident_start(c) => {
                let mut name = self.ident();
                if self.peek() == Some('%') {
                    self.i += 1;
                    name.push('%');
                }
                (SelectorKind::Element, name, Vec::new())
            }
            ')' | ']' => return Err(self.error(format!("unbalanced '{}' in selector", c))),
            c => return Err(self.error(format!("unexpected character '{}' in selector", c))),
        };

        Ok(SimpleSelector {
            kind,
            name,
            span: self.span_from(start),
            compound: 0,
            arguments,
        })
    }

    fn pseudo(&mut self, start: usize) -> Result<SimpleSelector, SelectorError> {
        self.i += 1;
        let double = self.peek() == Some(':');
        if double {
            self.i += 1;
        }
        let name = self.required_ident("pseudo-class name")?;
        let mut arguments = Vec::new();
        if self.peek() == Some('(') {
            let inner_start = self.offset() + 1;
            let inner = self.balanced('(', ')')?;
            let lower = name.to_ascii_lowercase();
            if matches!(
                lower.as_str(),
                "not" | "is" | "where" | "has" | "matches" | "-moz-any" | "-webkit-any"
            ) {
                arguments = parse_selector_list(inner, self.base + inner_start as u32)?.selectors;
            }
        }
        let legacy = matches!(
            name.to_ascii_lowercase().as_str(),
            "before" | "after" | "first-line" | "first-letter"
        );
        let kind = if double || legacy {
            SelectorKind::PseudoElement
        } else {
            SelectorKind::Pseudo
        };
        Ok(SimpleSelector {
            kind,
            name,
            span: self.span_from(start),
            compound: 0,
            arguments,
        })
    }

    fn attribute(&mut self) -> Result<String, SelectorError> {
        let inner = self.balanced('[', ']')?;
        Ok(inner.trim().to_string())
    }

    /// Consume `open ... close` and return the text between them.
    fn balanced(&mut self, open: char, close: char) -> Result<&'a str, SelectorError> {
        let open_at = self.offset();
        self.i += 1;
        let inner_start = self.offset();
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        while let Some(c) = self.peek() {
            if let Some(q) = quote {
                if c == '\\' {
                    self.i += 1;
                } else if c == q {
                    quote = None;
                }
            } else if c == '"' || c == '\'' {
                quote = Some(c);
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    let inner_end = self.offset();
                    self.i += 1;
                    return Ok(&self.raw[inner_start..inner_end]);
                }
            }
            self.i += 1;
        }
        Err(SelectorError {
            offset: self.base + open_at as u32,
            reason: format!("unclosed '{}' in selector", open),
        })
    }

    fn required_ident(&mut self, what: &str) -> Result<String, SelectorError> {
        let name = self.ident();
        if name.is_empty() {
            return Err(self.error(format!("expected {}", what)));
        }
        Ok(name)
    }

    fn ident(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
                name.push(c);
                self.i += 1;
            } else if c == '\\' {
                name.push(c);
                self.i += 1;
                if let Some(next) = self.peek() {
                    name.push(next);
                    self.i += 1;
                }
            } else if c == '#' && self.peek_nth(1) == Some('{') {
                let start = self.offset();
                let mut depth = 0usize;
                while let Some(c) = self.peek() {
                    self.i += 1;
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                name.push_str(&self.raw[start..self.offset()]);
            } else {
                break;
            }
        }
        name
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()
}
