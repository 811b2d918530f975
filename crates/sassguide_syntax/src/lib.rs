//! # sassguide_syntax
//!
//! Tokenizer, parser and syntax tree for SCSS sources.
//!
//! The parser is a pure function of its input. It keeps comments (line and
//! block style), blank lines and brace/colon spacing in the tree, because the
//! lint checks need them as much as the formatter needs the structure.
//!
//! ## Example
//!
//! ```rust
//! use sassguide_syntax::{parse, NodeKind};
//!
//! let sheet = parse(".avatar {\n  border-radius: 50%;\n}\n").unwrap();
//! assert!(matches!(sheet.nodes[0].kind, NodeKind::Rule(_)));
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod selector;
pub mod span;
pub mod token;
pub mod tokenizer;

pub use ast::{
    AtRule, Block, BlockLayout, Comment, CommentKind, DeclarationClass, Extend, Include, Node,
    NodeKind, Property, PropertyLayout, RuleDeclaration, StyleSheet, Variable, Visibility,
    WalkContext,
};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_with_options, ParseOptions};
pub use selector::{
    collapse_whitespace, normalize_commas, parse_selector_list, Selector, SelectorKind, SelectorList, SimpleSelector,
    Specificity,
};
pub use span::{LineIndex, Location, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, Tokenizer};
