//! Report data preparation
//!
//! A [`StudyReport`] is flattened into the `sys.inputs` dictionary read by the
//! `acoustic_report` template. Numbers are preformatted here so the PDF shows
//! the same precision as the console.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde_json::{json, Map, Value};
use shared_types::{format, slugify};
use shared_types::{
    AcousticParameters, CalculationResult, CorrectionFactors, LimitSource, Period, ProjectInfo,
    StudyStatus,
};

use crate::compiler::OutputFormat;

/// Everything the report template needs for one study
#[derive(Debug, Clone, PartialEq)]
pub struct StudyReport {
    pub project: ProjectInfo,
    pub params: AcousticParameters,
    pub factors: CorrectionFactors,
    pub result: CalculationResult,
    pub date_etude: NaiveDate,
}

impl StudyReport {
    /// Report dated today (local time)
    pub fn new(
        project: ProjectInfo,
        params: AcousticParameters,
        factors: CorrectionFactors,
        result: CalculationResult,
    ) -> Self {
        Self {
            project,
            params,
            factors,
            result,
            date_etude: Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date_etude: NaiveDate) -> Self {
        self.date_etude = date_etude;
        self
    }

    /// `sys.inputs` for the report template
    pub fn to_inputs(&self) -> Map<String, Value> {
        let zone = self.result.zone();
        let periods: Vec<Value> = Period::both()
            .iter()
            .map(|&period| {
                json!({
                    "label": period.label(),
                    "lr": format::level(self.result.lr(period)),
                    "limit": format::whole(self.result.limits.limit(period)),
                    "overridden": self.result.limits.source(period) == LimitSource::Override,
                    "conforme": self.result.conforme(period),
                    "k1": format::whole(self.factors.k1(period)),
                })
            })
            .collect();

        let inputs = json!({
            "date_etude": self.date_etude.format("%d/%m/%Y").to_string(),
            "project": {
                "nom_projet": self.project.nom_projet,
                "localisation": self.project.localisation,
                "equipement": self.project.equipement,
            },
            "zone": {
                "code": zone.code(),
                "label": zone.label(),
            },
            "params": {
                "lp1": format::level(self.params.lp1),
                "distance_ref": self.params.distance_ref.to_string(),
                "distance_cible": self.params.distance_cible.to_string(),
                "puissance_sonore": self.params.puissance_sonore.map(format::level),
                "puissance_frigorifique": self.params.puissance_frigorifique.map(|p| p.to_string()),
            },
            "factors": {
                "k1_jour": format::whole(self.factors.k1_jour),
                "k1_nuit": format::whole(self.factors.k1_nuit),
                "k2": format::whole(self.factors.k2),
                "k3": format::whole(self.factors.k3),
                "reflexion": format::whole(self.factors.reflexion),
            },
            "calculs": {
                "attenuation": format::precise(self.result.attenuation),
                "lpx": format::precise(self.result.lpx),
                "lpx_short": format::level(self.result.lpx),
            },
            "periods": periods,
            "conforme": self.result.status() == StudyStatus::Conforme,
        });

        match inputs {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// `rapport_acoustique_<project slug>_<YYYYmmdd_HHMM>.<ext>`
    pub fn file_name(&self, format: OutputFormat, at: NaiveDateTime) -> String {
        report_file_name(&self.project.slug(), format, at)
    }
}

/// `rapport_acoustique_<label>_<YYYYmmdd_HHMM>.<ext>`, label slugified
pub fn report_file_name(label: &str, format: OutputFormat, at: NaiveDateTime) -> String {
    format!(
        "rapport_acoustique_{}_{}.{}",
        slugify(label),
        at.format("%Y%m%d_%H%M"),
        format.extension()
    )
}
