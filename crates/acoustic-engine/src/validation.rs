//! Input checks run before the pipeline.

use shared_types::{AcousticParameters, CorrectionFactors};

use crate::error::{AcousticError, AcousticResult};

/// Plausible range for a measured source level, dB(A)
pub const LP1_RANGE: std::ops::RangeInclusive<f64> = 0.0..=120.0;

pub fn validate_parameters(params: &AcousticParameters) -> AcousticResult<()> {
    finite("lp1", params.lp1)?;
    finite("distance_ref", params.distance_ref)?;
    finite("distance_cible", params.distance_cible)?;
    if let Some(value) = params.puissance_sonore {
        finite("puissance_sonore", value)?;
    }
    if let Some(value) = params.puissance_frigorifique {
        finite("puissance_frigorifique", value)?;
    }

    if !LP1_RANGE.contains(&params.lp1) {
        return Err(AcousticError::SourceLevelOutOfRange(params.lp1));
    }
    positive("distance_ref", params.distance_ref)?;
    positive("distance_cible", params.distance_cible)?;

    Ok(())
}

pub fn validate_factors(factors: &CorrectionFactors) -> AcousticResult<()> {
    finite("k1_jour", factors.k1_jour)?;
    finite("k1_nuit", factors.k1_nuit)?;
    finite("k2", factors.k2)?;
    finite("k3", factors.k3)?;
    finite("reflexion", factors.reflexion)
}

fn finite(field: &'static str, value: f64) -> AcousticResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AcousticError::NonFiniteInput { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> AcousticResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(AcousticError::InvalidGeometry { field, value })
    }
}
