//! Point-source free-field propagation.
//!
//! Both distances must be strictly positive; `validation` rejects anything
//! else before these functions are reached.

/// Level change between the reference distance and the target distance, dB.
///
/// Negative when the target is farther than the reference point, positive when
/// it is closer, zero when both distances are equal. The sign is meaningful and
/// must not be clamped.
pub fn attenuation(distance_ref: f64, distance_cible: f64) -> f64 {
    20.0 * (distance_ref / distance_cible).log10()
}

/// Sound pressure level at the target distance
pub fn lpx(lp1: f64, attenuation: f64) -> f64 {
    lp1 + attenuation
}
