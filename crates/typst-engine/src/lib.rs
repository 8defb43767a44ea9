//! Typst rendering for acoustic study reports
//!
//! This crate turns a computed study into a two-page report:
//! - Report data preparation (display precision, optional rows)
//! - Embedded report template
//! - In-memory compilation to PDF or SVG (sync, and async with timeout)
//!
//! # Feature Flags
//!
//! - `server` (default): Enables async `render_report` with timeout (requires tokio)

pub mod compiler;
pub mod report;
pub mod templates;
pub mod world;

pub use compiler::{render_report_sync, OutputFormat, RenderError, RenderResponse, RenderStatus};
pub use report::{report_file_name, StudyReport};

#[cfg(feature = "server")]
pub use compiler::render_report;
