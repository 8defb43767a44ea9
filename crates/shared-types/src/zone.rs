//! Noise sensitivity zones (degrés de sensibilité)
//!
//! Each zone carries its default immission limits in dB(A):
//! - DS I: silence zones (hospitals, schools)
//! - DS II: residential
//! - DS III: mixed residential / light industry
//! - DS IV: industrial

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sensitivity zone selected once per study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityZone {
    #[serde(rename = "DS I")]
    DsI,
    #[serde(rename = "DS II")]
    DsII,
    #[serde(rename = "DS III")]
    DsIII,
    #[serde(rename = "DS IV")]
    DsIV,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sensitivity zone: '{0}'")]
pub struct ParseZoneError(pub String);

impl SensitivityZone {
    /// Short regulatory code, e.g. "DS II"
    pub fn code(&self) -> &'static str {
        match self {
            SensitivityZone::DsI => "DS I",
            SensitivityZone::DsII => "DS II",
            SensitivityZone::DsIII => "DS III",
            SensitivityZone::DsIV => "DS IV",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensitivityZone::DsI => "Zone de silence (hôpitaux, écoles)",
            SensitivityZone::DsII => "Zone d'habitation",
            SensitivityZone::DsIII => "Zone mixte (habitation et artisanat)",
            SensitivityZone::DsIV => "Zone industrielle",
        }
    }

    /// Default day limit (07h-22h) in dB(A)
    pub fn default_day_limit(&self) -> f64 {
        match self {
            SensitivityZone::DsI => 45.0,
            SensitivityZone::DsII => 55.0,
            SensitivityZone::DsIII => 60.0,
            SensitivityZone::DsIV => 65.0,
        }
    }

    /// Default night limit (22h-07h) in dB(A)
    pub fn default_night_limit(&self) -> f64 {
        match self {
            SensitivityZone::DsI => 35.0,
            SensitivityZone::DsII => 45.0,
            SensitivityZone::DsIII => 50.0,
            SensitivityZone::DsIV => 55.0,
        }
    }

    /// Position in the selection menu (1-4)
    pub fn menu_index(&self) -> u8 {
        match self {
            SensitivityZone::DsI => 1,
            SensitivityZone::DsII => 2,
            SensitivityZone::DsIII => 3,
            SensitivityZone::DsIV => 4,
        }
    }

    /// Parse from menu number, roman numeral, code or keyword (case-insensitive)
    pub fn parse_code(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        let compact = normalized.replace(' ', "");
        match compact.as_str() {
            "1" | "I" | "DSI" | "SILENCE" => Some(SensitivityZone::DsI),
            "2" | "II" | "DSII" | "HABITATION" => Some(SensitivityZone::DsII),
            "3" | "III" | "DSIII" | "MIXTE" => Some(SensitivityZone::DsIII),
            "4" | "IV" | "DSIV" | "INDUSTRIELLE" => Some(SensitivityZone::DsIV),
            _ => None,
        }
    }

    pub fn all() -> [Self; 4] {
        [
            SensitivityZone::DsI,
            SensitivityZone::DsII,
            SensitivityZone::DsIII,
            SensitivityZone::DsIV,
        ]
    }
}

impl std::fmt::Display for SensitivityZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}

impl std::str::FromStr for SensitivityZone {
    type Err = ParseZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_code(s).ok_or_else(|| ParseZoneError(s.to_string()))
    }
}
