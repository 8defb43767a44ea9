//! Template registry and metadata

use super::embedded;
use crate::compiler::errors::RenderError;

/// Name of the study report template
pub const REPORT_TEMPLATE: &str = "acoustic_report";

pub fn get_template_source(name: &str) -> Result<&'static str, RenderError> {
    let name = parse_template_uri(name).unwrap_or(name);
    embedded::get_embedded_template(name)
        .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
}

pub fn parse_template_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("typst://templates/")
}
