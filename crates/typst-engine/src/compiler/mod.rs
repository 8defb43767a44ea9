//! Typst compilation of study reports

pub mod errors;
pub mod output;
pub mod render;

pub use errors::{CompileError, ErrorSeverity, RenderError, RenderStatus};
pub use output::OutputFormat;
pub use render::{render_report_sync, validate_syntax};

#[cfg(feature = "server")]
pub use render::render_report;

/// Result of rendering a report
#[derive(Debug, Clone)]
pub struct RenderResponse {
    pub status: RenderStatus,
    pub artifact: Option<RenderArtifact>,
    pub errors: Vec<CompileError>,
    pub warnings: Vec<CompileError>,
}

impl RenderResponse {
    /// The artifact of a successful render, or the compile errors
    pub fn into_artifact(self) -> Result<RenderArtifact, RenderError> {
        match (self.status, self.artifact) {
            (RenderStatus::Success, Some(artifact)) => Ok(artifact),
            _ => Err(RenderError::CompileError(self.errors)),
        }
    }
}

/// Rendered document bytes
#[derive(Debug, Clone)]
pub struct RenderArtifact {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub page_count: usize,
}
