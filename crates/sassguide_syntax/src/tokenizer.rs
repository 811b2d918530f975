//! Tokenizer for SCSS source text.

use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::span::{LineIndex, Span};
use crate::token::{Token, TokenKind};

/// A tokenizer that produces tokens from SCSS source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    fn error(&self, offset: u32, reason: impl Into<String>) -> ParseError {
        ParseError::new(LineIndex::new(self.source).location(offset), reason)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> ParseResult<Token<'src>> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        let kind = match c {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                TokenKind::Whitespace
            }
            '/' if self.starts_with("//") => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                // keep "\r\n" line endings out of the comment text
                if self.source[start as usize..self.pos as usize].ends_with('\r') {
                    self.pos -= 1;
                    self.remaining = &self.source[self.pos as usize..];
                }
                TokenKind::LineComment
            }
            '/' if self.starts_with("/*") => {
                self.advance();
                self.advance();
                loop {
                    if self.starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.advance().is_none() {
                        return Err(self.error(start, "unterminated block comment"));
                    }
                }
                TokenKind::BlockComment
            }
            '"' | '\'' => {
                self.scan_string(c)
                    .map_err(|_| self.error(start, "unterminated string"))?;
                TokenKind::String
            }
            '#' if self.peek_nth(1) == Some('{') => {
                self.scan_interpolation()
                    .map_err(|_| self.error(start, "unterminated interpolation"))?;
                TokenKind::Interpolation
            }
            '@' => {
                self.advance();
                self.scan_name();
                TokenKind::AtKeyword
            }
            '$' => {
                self.advance();
                self.scan_name();
                TokenKind::Variable
            }
            _ => {
                self.scan_word();
                TokenKind::Word
            }
        };

        Ok(self.token(kind, start))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn scan_name(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
        {
            self.advance();
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<(), ()> {
        self.advance();
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => return Ok(()),
                Some('\n') | None => return Err(()),
                Some(_) => {}
            }
        }
    }

    fn scan_interpolation(&mut self) -> Result<(), ()> {
        // '#' and '{'
        self.advance();
        self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(q @ ('"' | '\'')) => {
                    self.scan_string(q)?;
                    continue;
                }
                Some(_) => {}
                None => return Err(()),
            }
            self.advance();
        }
        Ok(())
    }

    fn scan_word(&mut self) {
        let word_start = self.pos as usize;
        while let Some(c) = self.peek() {
            let stop = c.is_whitespace()
                || matches!(c, '{' | '}' | '(' | ')' | '[' | ']' | ';' | ':' | ',' | '"' | '\'' | '@' | '$')
                || (c == '/' && (self.starts_with("//") || self.starts_with("/*")))
                || (c == '#' && self.peek_nth(1) == Some('{'));
            if stop && self.pos as usize > word_start {
                break;
            }
            if stop {
                // a lone stop character that no other rule claimed
                self.advance();
                break;
            }
            self.advance();
        }

        // `url(...)` bodies may hold `//` and are taken verbatim
        let word = &self.source[word_start..self.pos as usize];
        if word.to_ascii_lowercase().ends_with("url") && self.peek() == Some('(') {
            let after = &self.remaining[1..];
            let quoted = after.trim_start().starts_with(['"', '\'']);
            if !quoted {
                if let Some(close) = after.find(')') {
                    let len = 1 + close + 1;
                    self.pos += len as u32;
                    self.remaining = &self.remaining[len..];
                }
            }
        }
    }
}

/// Tokenize the whole source, ending with an `Eof` token.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token<'_>>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if eof {
            break;
        }
    }
    Ok(tokens)
}
