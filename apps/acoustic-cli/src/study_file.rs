//! Study files: flat `key = value` records saved after an interactive session
//! and loaded by `run` / `batch`.
//!
//! ```text
//! # Configuration Calculateur Acoustique
//! # Créée le 14/03/2025
//!
//! nom_projet = "Hôtel L'Uciole"
//! zone_sensibilite = "DS II"
//! limite_jour = 50.0
//! lp1 = 31.0
//! distance_ref = 10.0
//! distance_cible = 18.0
//! ```
//!
//! Correction factors and project fields fall back to their defaults when
//! missing. Source level and distances are required.

use std::fs;
use std::path::Path;

use acoustic_engine::{AcousticError, Study};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{
    AcousticParameters, CorrectionFactors, LimitOverrides, ProjectInfo, SensitivityZone,
    DEFAULT_K1_JOUR, DEFAULT_K1_NUIT, DEFAULT_K2, DEFAULT_K3, DEFAULT_REFLEXION,
};

const HEADER: &str = "# Configuration Calculateur Acoustique";

/// On-disk shape of a study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyFile {
    #[serde(default = "default_nom_projet")]
    pub nom_projet: String,
    #[serde(default = "default_localisation")]
    pub localisation: String,
    #[serde(default = "default_equipement")]
    pub equipement: String,
    pub zone_sensibilite: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limite_jour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limite_nuit: Option<f64>,
    pub lp1: f64,
    pub distance_ref: f64,
    pub distance_cible: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puissance_sonore: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puissance_frigorifique: Option<f64>,
    #[serde(default = "default_k1_jour")]
    pub k1_jour: f64,
    #[serde(default = "default_k1_nuit")]
    pub k1_nuit: f64,
    #[serde(default = "default_k2")]
    pub k2: f64,
    #[serde(default = "default_k3")]
    pub k3: f64,
    #[serde(default = "default_reflexion")]
    pub reflexion: f64,
}

fn default_nom_projet() -> String {
    ProjectInfo::default().nom_projet
}

fn default_localisation() -> String {
    ProjectInfo::default().localisation
}

fn default_equipement() -> String {
    ProjectInfo::default().equipement
}

fn default_k1_jour() -> f64 {
    DEFAULT_K1_JOUR
}

fn default_k1_nuit() -> f64 {
    DEFAULT_K1_NUIT
}

fn default_k2() -> f64 {
    DEFAULT_K2
}

fn default_k3() -> f64 {
    DEFAULT_K3
}

fn default_reflexion() -> f64 {
    DEFAULT_REFLEXION
}

impl StudyFile {
    pub fn from_study(study: &Study) -> Self {
        Self {
            nom_projet: study.project.nom_projet.clone(),
            localisation: study.project.localisation.clone(),
            equipement: study.project.equipement.clone(),
            zone_sensibilite: study.zone.code().to_string(),
            limite_jour: study.overrides.limite_jour,
            limite_nuit: study.overrides.limite_nuit,
            lp1: study.params.lp1,
            distance_ref: study.params.distance_ref,
            distance_cible: study.params.distance_cible,
            puissance_sonore: study.params.puissance_sonore,
            puissance_frigorifique: study.params.puissance_frigorifique,
            k1_jour: study.factors.k1_jour,
            k1_nuit: study.factors.k1_nuit,
            k2: study.factors.k2,
            k3: study.factors.k3,
            reflexion: study.factors.reflexion,
        }
    }

    /// Fails on an unknown zone identifier
    pub fn into_study(self) -> Result<Study, AcousticError> {
        let zone: SensitivityZone = self.zone_sensibilite.parse()?;
        Ok(Study {
            project: ProjectInfo::new(self.nom_projet, self.localisation, self.equipement),
            params: AcousticParameters {
                lp1: self.lp1,
                distance_ref: self.distance_ref,
                distance_cible: self.distance_cible,
                puissance_sonore: self.puissance_sonore,
                puissance_frigorifique: self.puissance_frigorifique,
            },
            factors: CorrectionFactors {
                k1_jour: self.k1_jour,
                k1_nuit: self.k1_nuit,
                k2: self.k2,
                k3: self.k3,
                reflexion: self.reflexion,
            },
            zone,
            overrides: LimitOverrides {
                limite_jour: self.limite_jour,
                limite_nuit: self.limite_nuit,
            },
        })
    }

    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse study file")
    }

    /// Serialized record preceded by the header comments
    pub fn render(&self, created: NaiveDate) -> anyhow::Result<String> {
        let body = toml::to_string(self).context("Failed to serialize study")?;
        Ok(format!(
            "{}\n# Créée le {}\n\n{}",
            HEADER,
            created.format("%d/%m/%Y"),
            body
        ))
    }
}

/// `config_<project slug>.txt`
pub fn default_file_name(project: &ProjectInfo) -> String {
    format!("config_{}.txt", project.slug())
}

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Study> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read study file: {}", path.display()))?;
    let study = StudyFile::from_str(&content)
        .with_context(|| format!("Invalid study file: {}", path.display()))?
        .into_study()
        .with_context(|| format!("Invalid study file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), project = %study.project.nom_projet, "study loaded");
    Ok(study)
}

pub fn save<P: AsRef<Path>>(study: &Study, path: P, created: NaiveDate) -> anyhow::Result<()> {
    let path = path.as_ref();
    let content = StudyFile::from_study(study).render(created)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write study file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "study saved");
    Ok(())
}
