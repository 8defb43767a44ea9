//! Embedded template loader

/// Two-page acoustic study report - loaded from templates/acoustic_report.typ
const ACOUSTIC_REPORT_TEMPLATE: &str = include_str!("../../templates/acoustic_report.typ");

pub fn get_embedded_template(name: &str) -> Option<&'static str> {
    match name {
        "acoustic_report" => Some(ACOUSTIC_REPORT_TEMPLATE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_template_sections() {
        let template = get_embedded_template("acoustic_report").unwrap();
        assert!(template.contains("ETUDE ACOUSTIQUE ENVIRONNEMENTALE"));
        assert!(template.contains("FACTEURS DE CORRECTION"));
        assert!(template.contains("REFERENCES REGLEMENTAIRES"));
        assert!(template.contains("pagebreak"));
    }

    #[test]
    fn test_unknown_template() {
        assert!(get_embedded_template("rapport_inconnu").is_none());
    }
}
