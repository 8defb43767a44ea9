//! Acoustic study command-line tool
//!
//! Interactive input, console display, study files and PDF reports around
//! `acoustic-engine` and `typst-engine`.

pub mod commands;
pub mod display;
pub mod prompt;
pub mod study_file;

pub use commands::{ReportSettings, ReportTarget};
pub use prompt::Prompter;
