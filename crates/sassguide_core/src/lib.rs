//! # sassguide_core
//!
//! Runs the linter and formatter over files on disk.
//!
//! # Architecture
//!
//! - **Discovery**: expands paths, directories and glob patterns, minus `ignore` globs
//! - **Pipeline**: one blocking task per file, joined into a [`Report`](sassguide_report::Report)
//! - **Cache**: parsed trees keyed by path and content hash, shared across runs
//!
//! # Example
//!
//! ```rust,no_run
//! use sassguide_core::{Mode, Pipeline};
//! use sassguide_lint::LintConfig;
//!
//! # async fn run() -> sassguide_core::CoreResult<()> {
//! let pipeline = Pipeline::new(LintConfig::default())?.with_mode(Mode::Check);
//! let report = pipeline.run(&["src/styles".to_string()]).await?;
//! println!("{}", report.render_human());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod discover;
pub mod error;
pub mod pipeline;

pub use cache::ParseCache;
pub use discover::{discover, is_indented_syntax, IgnoreSet, STYLESHEET_EXTENSIONS};
pub use error::{CoreError, CoreResult};
pub use pipeline::{Mode, Pipeline};
