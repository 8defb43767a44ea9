//! Core rendering logic
//!
//! Compiles the embedded report template against a study's inputs, with an
//! async variant that runs the compiler on a blocking thread under a timeout.

use chrono::Utc;
use typst::diag::{Severity, SourceDiagnostic};
use typst::model::Document;

use super::errors::{CompileError, RenderError, RenderStatus};
use super::output::OutputFormat;
use super::{RenderArtifact, RenderResponse};
use crate::report::StudyReport;
use crate::templates::{self, REPORT_TEMPLATE};
use crate::world::VirtualWorld;

/// Compile the study report on the current thread
pub fn render_report_sync(
    report: &StudyReport,
    format: OutputFormat,
) -> Result<RenderResponse, RenderError> {
    let source = templates::get_template_source(REPORT_TEMPLATE)?;
    let world = VirtualWorld::new(source.to_string(), report.to_inputs(), Utc::now())?;

    tracing::debug!(
        project = %report.project.nom_projet,
        %format,
        "compiling acoustic report"
    );

    let warned = typst::compile(&world);
    let compilation_warnings = warned.warnings.clone();

    match warned.output {
        Ok(document) => {
            let artifact = export_document(&document, format)?;
            let (_, warnings) = categorize_diagnostics(&compilation_warnings);
            tracing::info!(
                project = %report.project.nom_projet,
                pages = artifact.page_count,
                bytes = artifact.data.len(),
                "report rendered"
            );
            Ok(RenderResponse {
                status: RenderStatus::Success,
                artifact: Some(artifact),
                errors: vec![],
                warnings,
            })
        }
        Err(diagnostics) => {
            let (errors, warnings) = categorize_diagnostics(&diagnostics);
            if errors.is_empty() {
                return Err(RenderError::CompileError(vec![CompileError::new(
                    "Compilation failed with unknown error",
                )]));
            }
            tracing::warn!(count = errors.len(), "report compilation failed");
            Ok(RenderResponse {
                status: RenderStatus::Error,
                artifact: None,
                errors,
                warnings,
            })
        }
    }
}

/// Compile the study report on a blocking thread, giving up after `timeout_ms`
#[cfg(feature = "server")]
pub async fn render_report(
    report: StudyReport,
    format: OutputFormat,
    timeout_ms: u64,
) -> Result<RenderResponse, RenderError> {
    use std::time::Duration;

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || render_report_sync(&report, format)),
    )
    .await;

    match result {
        Ok(Ok(response)) => response,
        Ok(Err(join_error)) => Err(RenderError::Task(join_error.to_string())),
        Err(_elapsed) => Err(RenderError::Timeout(timeout_ms)),
    }
}

/// Parse a Typst source and report syntax errors without compiling
pub fn validate_syntax(source: &str) -> Vec<CompileError> {
    typst::syntax::parse(source)
        .errors()
        .into_iter()
        .map(|error| CompileError::new(error.message.to_string()))
        .collect()
}

fn export_document(document: &Document, format: OutputFormat) -> Result<RenderArtifact, RenderError> {
    let page_count = document.pages.len();
    let data = match format {
        OutputFormat::Pdf => typst_pdf::pdf(document, &typst_pdf::PdfOptions::default())
            .map_err(|e| RenderError::Export(format!("PDF export failed: {:?}", e)))?,
        OutputFormat::Svg => {
            let page = document
                .pages
                .first()
                .ok_or_else(|| RenderError::Export("Document has no pages".to_string()))?;
            typst_svg::svg(page).into_bytes()
        }
    };

    Ok(RenderArtifact {
        data,
        format,
        page_count,
    })
}

fn categorize_diagnostics(
    diagnostics: &[SourceDiagnostic],
) -> (Vec<CompileError>, Vec<CompileError>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for diag in diagnostics {
        let mut compile_error = CompileError::new(diag.message.to_string());
        if !diag.hints.is_empty() {
            let hint = diag
                .hints
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            compile_error = compile_error.with_hint(hint);
        }

        match diag.severity {
            Severity::Error => errors.push(compile_error),
            Severity::Warning => warnings.push(compile_error.as_warning()),
        }
    }

    (errors, warnings)
}
