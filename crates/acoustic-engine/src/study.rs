//! One-shot study pipeline: validation -> limits -> propagation -> evaluation -> compliance

use serde::{Deserialize, Serialize};
use shared_types::{
    AcousticParameters, CalculationResult, CorrectionFactors, LimitOverrides, Period, ProjectInfo,
    ResolvedLimits, SensitivityZone,
};

use crate::compliance;
use crate::error::{AcousticError, AcousticResult};
use crate::evaluation;
use crate::limits;
use crate::propagation;
use crate::validation::{validate_factors, validate_parameters};

/// Everything needed to run and report one study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub project: ProjectInfo,
    pub params: AcousticParameters,
    pub factors: CorrectionFactors,
    pub zone: SensitivityZone,
    #[serde(default)]
    pub overrides: LimitOverrides,
}

impl Study {
    pub fn compute(&self) -> AcousticResult<CalculationResult> {
        compute_for_zone(&self.params, &self.factors, self.zone, self.overrides)
    }
}

/// Run a study for a raw zone identifier.
///
/// Fails with `UnknownZone` for identifiers outside DS I-IV; no partial result
/// is produced on any error.
pub fn compute_study(
    params: &AcousticParameters,
    factors: &CorrectionFactors,
    zone_id: &str,
    overrides: LimitOverrides,
) -> AcousticResult<CalculationResult> {
    validate_parameters(params)?;
    validate_factors(factors)?;
    let limits = limits::resolve_limits(zone_id, overrides)?;
    run_pipeline(params, factors, limits)
}

/// Run a study for an already parsed zone
pub fn compute_for_zone(
    params: &AcousticParameters,
    factors: &CorrectionFactors,
    zone: SensitivityZone,
    overrides: LimitOverrides,
) -> AcousticResult<CalculationResult> {
    validate_parameters(params)?;
    validate_factors(factors)?;
    let limits = limits::resolve_for_zone(zone, overrides)?;
    run_pipeline(params, factors, limits)
}

fn run_pipeline(
    params: &AcousticParameters,
    factors: &CorrectionFactors,
    limits: ResolvedLimits,
) -> AcousticResult<CalculationResult> {
    let attenuation = propagation::attenuation(params.distance_ref, params.distance_cible);
    derived("attenuation", attenuation)?;
    let lpx = propagation::lpx(params.lp1, attenuation);
    tracing::debug!(attenuation, lpx, "propagation");

    let lr_jour = evaluation::lr_for(lpx, factors, Period::Jour);
    let lr_nuit = evaluation::lr_for(lpx, factors, Period::Nuit);
    derived("lr_jour", lr_jour)?;
    derived("lr_nuit", lr_nuit)?;
    tracing::debug!(lr_jour, lr_nuit, "evaluation levels");

    let verdict = compliance::evaluate(lr_jour, lr_nuit, limits.limite_jour, limits.limite_nuit);
    tracing::debug!(
        zone = limits.zone.code(),
        conforme_jour = verdict.conforme_jour,
        conforme_nuit = verdict.conforme_nuit,
        "compliance"
    );

    Ok(CalculationResult {
        attenuation,
        lpx,
        lr_jour,
        lr_nuit,
        limits,
        conforme_jour: verdict.conforme_jour,
        conforme_nuit: verdict.conforme_nuit,
    })
}

/// A verdict compared against an infinite level is meaningless
fn derived(field: &'static str, value: f64) -> AcousticResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        tracing::warn!(field, value, "derived level is not finite");
        Err(AcousticError::NonFiniteResult { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{LimitSource, StudyStatus};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_reference_study_conforms() {
        let params = AcousticParameters::new(31.0, 10.0, 18.0);
        let result = compute_study(
            &params,
            &CorrectionFactors::default(),
            "DS II",
            LimitOverrides::none().day(50.0),
        )
        .unwrap();

        assert!(close(result.attenuation, -5.105));
        assert!(close(result.lpx, 25.895));
        assert!(close(result.lr_jour, 35.895));
        assert!(close(result.lr_nuit, 40.895));
        assert_eq!(result.limite_jour(), 50.0);
        assert_eq!(result.limite_nuit(), 45.0);
        assert!(result.conforme_jour);
        assert!(result.conforme_nuit);
        assert_eq!(result.status(), StudyStatus::Conforme);
        assert_eq!(result.limits.source_jour, LimitSource::Override);
        assert_eq!(result.limits.source_nuit, LimitSource::Table);
    }

    #[test]
    fn test_close_target_does_not_conform() {
        let params = AcousticParameters::new(31.0, 10.0, 1.0);
        let result = compute_study(
            &params,
            &CorrectionFactors::default(),
            "DS II",
            LimitOverrides::none().day(50.0),
        )
        .unwrap();

        assert!(close(result.attenuation, 20.0));
        assert!(close(result.lpx, 51.0));
        assert!(close(result.lr_jour, 61.0));
        assert!(close(result.lr_nuit, 66.0));
        assert!(!result.conforme_jour);
        assert!(!result.conforme_nuit);
        assert_eq!(result.status(), StudyStatus::MesuresNecessaires);
    }

    #[test]
    fn test_invalid_geometry_rejected_before_propagation() {
        let params = AcousticParameters::new(31.0, 10.0, 0.0);
        let err = compute_study(
            &params,
            &CorrectionFactors::default(),
            "DS II",
            LimitOverrides::none(),
        )
        .unwrap_err();
        assert!(matches!(err, AcousticError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_extreme_distance_ratio_has_no_verdict() {
        for (distance_ref, distance_cible) in [(1e-300, 1e300), (1e300, 1e-300)] {
            let params = AcousticParameters::new(31.0, distance_ref, distance_cible);
            let err = compute_study(
                &params,
                &CorrectionFactors::default(),
                "DS II",
                LimitOverrides::none(),
            )
            .unwrap_err();
            assert!(
                matches!(err, AcousticError::NonFiniteResult { field: "attenuation", .. }),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn test_unknown_zone() {
        let params = AcousticParameters::new(31.0, 10.0, 18.0);
        let err = compute_study(
            &params,
            &CorrectionFactors::default(),
            "DS VII",
            LimitOverrides::none(),
        )
        .unwrap_err();
        assert_eq!(err, AcousticError::UnknownZone("DS VII".to_string()));
    }

    #[test]
    fn test_study_compute_matches_free_function() {
        let study = Study {
            project: ProjectInfo::default(),
            params: AcousticParameters::new(55.0, 1.0, 25.0),
            factors: CorrectionFactors::default(),
            zone: SensitivityZone::DsIII,
            overrides: LimitOverrides::none(),
        };
        let via_study = study.compute().unwrap();
        let via_fn = compute_study(&study.params, &study.factors, "DS III", study.overrides).unwrap();
        assert_eq!(via_study, via_fn);
    }
}
