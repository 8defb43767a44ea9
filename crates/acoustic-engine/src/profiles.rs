//! Canned studies for fixed projects

use shared_types::{
    AcousticParameters, CorrectionFactors, LimitOverrides, ProjectInfo, SensitivityZone,
};

use crate::study::Study;

/// Hôtel L'Uciole (Crans-Montana): LU-VE LMC6S-3526 H EC condenser, window at 18 m.
///
/// The project uses a corrected day limit of 50 dB(A) instead of the DS II table value.
pub fn uciole() -> Study {
    Study {
        project: ProjectInfo::new(
            "Hôtel L'Uciole (ancien Mirabeau)",
            "Crans-Montana, Valais, Suisse",
            "Condenseur LU-VE LMC6S-3526 H EC (1X2)",
        ),
        params: AcousticParameters::new(31.0, 10.0, 18.0)
            .with_sound_power(63.0)
            .with_cooling_capacity(21.0),
        factors: CorrectionFactors {
            k1_jour: 5.0,
            k1_nuit: 10.0,
            k2: 4.0,
            k3: 0.0,
            reflexion: 1.0,
        },
        zone: SensitivityZone::DsII,
        overrides: LimitOverrides::none().day(50.0),
    }
}

/// Names accepted by `by_name`
pub fn list() -> Vec<&'static str> {
    vec!["uciole"]
}

pub fn by_name(name: &str) -> Option<Study> {
    match name.trim().to_lowercase().as_str() {
        "uciole" => Some(uciole()),
        _ => None,
    }
}
