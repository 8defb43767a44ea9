//! Acoustic immission compliance engine
//!
//! Point-source free-field propagation, OPB-style correction factors and
//! day/night compliance against sensitivity-zone limits. Pure functions over
//! the value types of `shared-types`; no I/O.

pub mod compliance;
pub mod error;
pub mod evaluation;
pub mod limits;
pub mod profiles;
pub mod propagation;
pub mod study;
pub mod validation;

pub use compliance::ComplianceVerdict;
pub use error::{AcousticError, AcousticResult};
pub use limits::{resolve_for_zone, resolve_limits};
pub use study::{compute_for_zone, compute_study, Study};

use shared_types::CalculationResult;

/// AcousticEngine entry point
pub struct AcousticEngine;

impl AcousticEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, study: &Study) -> AcousticResult<CalculationResult> {
        tracing::debug!(project = %study.project.nom_projet, zone = study.zone.code(), "running study");
        study.compute()
    }

    /// Run several independent studies; each result is independent of the others
    pub fn run_all<'a>(
        &self,
        studies: impl IntoIterator<Item = &'a Study>,
    ) -> Vec<AcousticResult<CalculationResult>> {
        studies.into_iter().map(|study| self.run(study)).collect()
    }
}

impl Default for AcousticEngine {
    fn default() -> Self {
        Self::new()
    }
}
