//! # sassguide_lint
//!
//! Style-guide checks for parsed SCSS.
//!
//! This crate provides:
//! - **Checks**: one [`Check`] implementation per style rule, held in a [`CheckRegistry`]
//! - **Configuration**: per-rule enablement and severity from `.sassguide.yml`
//! - **Engine**: the [`Linter`], which runs checks and turns failures into `unevaluable` violations
//! - **Locality**: the cross-file `media-query-locality` rule
//! - **Fixes**: byte-range patches attached to violations, applied with [`apply_fixes`]
//!
//! ## Example
//!
//! ```rust
//! use sassguide_lint::{LintConfig, Linter, Severity};
//!
//! let linter = Linter::new(LintConfig::default()).unwrap();
//! let sheet = sassguide_syntax::parse("#lol-no {\n  color: red;\n}\n").unwrap();
//! let result = linter.lint("main.scss", &sheet);
//!
//! assert_eq!(result.violations.len(), 1);
//! assert_eq!(result.violations[0].rule_id, "no-id-selector");
//! assert_eq!(result.violations[0].severity, Severity::Error);
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod locality;
pub mod violation;

pub use check::{Check, CheckContext, CheckRegistry};
pub use config::{CommentStyle, LintConfig, RuleOverride, CONFIG_FILE_NAME};
pub use engine::{catalog, FileLint, Linter, RuleInfo, FORMATTING_RULE};
pub use error::{LintError, LintResult};
pub use locality::{MediaQueryLocality, MediaReference, SelectorFacts, SelectorIndex, MEDIA_QUERY_LOCALITY};
pub use violation::{apply_fixes, Fix, Severity, Violation};
