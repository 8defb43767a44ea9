use crate::zone::SensitivityZone;

/// Default K1 correction for the day period, dB(A)
pub const DEFAULT_K1_JOUR: f64 = 5.0;
/// Default K1 correction for the night period, dB(A)
pub const DEFAULT_K1_NUIT: f64 = 10.0;
/// Default tonal component correction, dB(A)
pub const DEFAULT_K2: f64 = 4.0;
/// Default impulsive component correction, dB(A)
pub const DEFAULT_K3: f64 = 0.0;
/// Default reflection correction (one reflecting surface), dB(A)
pub const DEFAULT_REFLEXION: f64 = 1.0;

/// Evaluation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Jour,
    Nuit,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Jour => "Jour (07h-22h)",
            Period::Nuit => "Nuit (22h-07h)",
        }
    }

    pub fn both() -> [Period; 2] {
        [Period::Jour, Period::Nuit]
    }
}

/// Descriptive project data, carried through to display and reports
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectInfo {
    pub nom_projet: String,
    pub localisation: String,
    pub equipement: String,
}

impl ProjectInfo {
    pub fn new(
        nom_projet: impl Into<String>,
        localisation: impl Into<String>,
        equipement: impl Into<String>,
    ) -> Self {
        Self {
            nom_projet: nom_projet.into(),
            localisation: localisation.into(),
            equipement: equipement.into(),
        }
    }

    /// Project name usable in file names, see [`slugify`]
    pub fn slug(&self) -> String {
        slugify(&self.nom_projet)
    }
}

/// Lowercased single path component: whitespace and path separators become `_`
pub fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self::new(
            "Projet Acoustique",
            "Non spécifié",
            "Équipement non spécifié",
        )
    }
}

/// Measured source data and receiver geometry
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AcousticParameters {
    /// Sound pressure level at `distance_ref`, dB(A)
    pub lp1: f64,
    /// Distance of the Lp1 measurement, m
    pub distance_ref: f64,
    /// Distance to the sensitive receiver (window), m
    pub distance_cible: f64,
    /// Sound power level, dB(A). Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puissance_sonore: Option<f64>,
    /// Refrigeration capacity, kW. Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puissance_frigorifique: Option<f64>,
}

impl AcousticParameters {
    pub fn new(lp1: f64, distance_ref: f64, distance_cible: f64) -> Self {
        Self {
            lp1,
            distance_ref,
            distance_cible,
            puissance_sonore: None,
            puissance_frigorifique: None,
        }
    }

    pub fn with_sound_power(mut self, puissance_sonore: f64) -> Self {
        self.puissance_sonore = Some(puissance_sonore);
        self
    }

    pub fn with_cooling_capacity(mut self, puissance_frigorifique: f64) -> Self {
        self.puissance_frigorifique = Some(puissance_frigorifique);
        self
    }
}

/// Correction factors applied on top of Lpx, all in dB(A)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CorrectionFactors {
    /// Temporal correction, day
    pub k1_jour: f64,
    /// Temporal correction, night
    pub k1_nuit: f64,
    /// Tonal component (0 none, 4 audible, 6 strong)
    pub k2: f64,
    /// Impulsive component (0 none, 5 audible)
    pub k3: f64,
    /// Reflection (0 free field, 1 one surface, 3 building corner)
    pub reflexion: f64,
}

impl CorrectionFactors {
    pub fn k1(&self, period: Period) -> f64 {
        match period {
            Period::Jour => self.k1_jour,
            Period::Nuit => self.k1_nuit,
        }
    }
}

impl Default for CorrectionFactors {
    fn default() -> Self {
        Self {
            k1_jour: DEFAULT_K1_JOUR,
            k1_nuit: DEFAULT_K1_NUIT,
            k2: DEFAULT_K2,
            k3: DEFAULT_K3,
            reflexion: DEFAULT_REFLEXION,
        }
    }
}

/// Explicit limits supplied by the user; each replaces only its own period
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LimitOverrides {
    pub limite_jour: Option<f64>,
    pub limite_nuit: Option<f64>,
}

impl LimitOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn day(mut self, limite: f64) -> Self {
        self.limite_jour = Some(limite);
        self
    }

    pub fn night(mut self, limite: f64) -> Self {
        self.limite_nuit = Some(limite);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.limite_jour.is_none() && self.limite_nuit.is_none()
    }
}

/// Where an effective limit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSource {
    Table,
    Override,
}

/// Effective limits for one study
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedLimits {
    pub zone: SensitivityZone,
    pub limite_jour: f64,
    pub limite_nuit: f64,
    pub source_jour: LimitSource,
    pub source_nuit: LimitSource,
}

impl ResolvedLimits {
    pub fn limit(&self, period: Period) -> f64 {
        match period {
            Period::Jour => self.limite_jour,
            Period::Nuit => self.limite_nuit,
        }
    }

    pub fn source(&self, period: Period) -> LimitSource {
        match period {
            Period::Jour => self.source_jour,
            Period::Nuit => self.source_nuit,
        }
    }
}

/// Overall verdict, always derived from the two period booleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyStatus {
    Conforme,
    MesuresNecessaires,
}

impl StudyStatus {
    pub fn from_periods(conforme_jour: bool, conforme_nuit: bool) -> Self {
        if conforme_jour && conforme_nuit {
            StudyStatus::Conforme
        } else {
            StudyStatus::MesuresNecessaires
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudyStatus::Conforme => "Installation conforme aux normes OPB",
            StudyStatus::MesuresNecessaires => "Mesures d'atténuation nécessaires",
        }
    }
}

/// Output of one study. Full precision; formatting happens in the consumers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalculationResult {
    pub attenuation: f64,
    pub lpx: f64,
    pub lr_jour: f64,
    pub lr_nuit: f64,
    pub limits: ResolvedLimits,
    pub conforme_jour: bool,
    pub conforme_nuit: bool,
}

impl CalculationResult {
    pub fn zone(&self) -> SensitivityZone {
        self.limits.zone
    }

    pub fn limite_jour(&self) -> f64 {
        self.limits.limite_jour
    }

    pub fn limite_nuit(&self) -> f64 {
        self.limits.limite_nuit
    }

    pub fn lr(&self, period: Period) -> f64 {
        match period {
            Period::Jour => self.lr_jour,
            Period::Nuit => self.lr_nuit,
        }
    }

    pub fn conforme(&self, period: Period) -> bool {
        match period {
            Period::Jour => self.conforme_jour,
            Period::Nuit => self.conforme_nuit,
        }
    }

    pub fn status(&self) -> StudyStatus {
        StudyStatus::from_periods(self.conforme_jour, self.conforme_nuit)
    }

    /// True when at least one period limit was supplied by the user
    pub fn has_override(&self) -> bool {
        Period::both()
            .iter()
            .any(|&p| self.limits.source(p) == LimitSource::Override)
    }
}
