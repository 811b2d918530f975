//! # sassguide_report
//!
//! Collects per-file results into a [`Report`], orders them deterministically,
//! and renders them for people or for tools.
//!
//! ```rust
//! use sassguide_lint::{Severity, Violation};
//! use sassguide_report::{ExitCodes, FileReport, Report};
//! use sassguide_syntax::Location;
//!
//! let mut report = Report::new();
//! report.add_file(FileReport::new("a.scss").with_violations(vec![Violation::new(
//!     "no-id-selector",
//!     Severity::Error,
//!     "a.scss",
//!     Location::new(1, 1),
//!     "ID selectors are not allowed",
//! )]));
//! report.finalize();
//! assert_eq!(report.exit_code(), ExitCodes::ERROR_VIOLATIONS);
//! ```

pub mod render;
pub mod report;

pub use render::{Record, PARSE_FAILURE_RULE};
pub use report::{ExitCodes, FileReport, ParseFailure, Report, ReportSummary};
