//! Zone limit resolution
//!
//! The zone table provides the default day/night limits; an explicit override
//! replaces only the period it is given for, and its use is recorded in the
//! returned `ResolvedLimits`.

use shared_types::{LimitOverrides, LimitSource, ResolvedLimits, SensitivityZone};

use crate::error::{AcousticError, AcousticResult};

/// Parse a zone identifier. Unknown identifiers are an error, never a default.
pub fn parse_zone(zone_id: &str) -> AcousticResult<SensitivityZone> {
    SensitivityZone::parse_code(zone_id)
        .ok_or_else(|| AcousticError::UnknownZone(zone_id.to_string()))
}

/// Resolve the effective limits for a zone identifier
pub fn resolve_limits(zone_id: &str, overrides: LimitOverrides) -> AcousticResult<ResolvedLimits> {
    let zone = parse_zone(zone_id)?;
    resolve_for_zone(zone, overrides)
}

/// Resolve the effective limits for an already parsed zone
pub fn resolve_for_zone(
    zone: SensitivityZone,
    overrides: LimitOverrides,
) -> AcousticResult<ResolvedLimits> {
    let (limite_jour, source_jour) = pick(
        "limite_jour",
        overrides.limite_jour,
        zone.default_day_limit(),
    )?;
    let (limite_nuit, source_nuit) = pick(
        "limite_nuit",
        overrides.limite_nuit,
        zone.default_night_limit(),
    )?;

    Ok(ResolvedLimits {
        zone,
        limite_jour,
        limite_nuit,
        source_jour,
        source_nuit,
    })
}

fn pick(
    field: &'static str,
    explicit: Option<f64>,
    table: f64,
) -> AcousticResult<(f64, LimitSource)> {
    match explicit {
        Some(value) if !value.is_finite() => Err(AcousticError::NonFiniteInput { field, value }),
        Some(value) => {
            tracing::warn!(field, value, table, "limit overridden by user");
            Ok((value, LimitSource::Override))
        }
        None => Ok((table, LimitSource::Table)),
    }
}
