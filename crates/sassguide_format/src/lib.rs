//! # sassguide_format
//!
//! Canonical formatter for SCSS.
//!
//! `format` is idempotent: formatting its own output changes nothing, and text
//! already in canonical form comes back byte-for-byte.
//!
//! ## Example
//!
//! ```rust
//! use sassguide_format::{format_source, FormatOptions};
//!
//! let formatted = format_source(".avatar{border-radius:50%;border:2px solid white; }", &FormatOptions::default()).unwrap();
//! assert_eq!(formatted, ".avatar {\n  border-radius: 50%;\n  border: 2px solid white;\n}\n");
//! ```

pub mod diff;
pub mod options;
pub mod printer;

pub use diff::{diff, unified_diff, Hunk};
pub use options::FormatOptions;
pub use printer::{format, format_source};
