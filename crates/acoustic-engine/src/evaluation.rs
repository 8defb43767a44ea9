//! Evaluation level Lr = Lpx + K1 + K2 + K3 + reflection.

use shared_types::{CorrectionFactors, Period};

/// Evaluation level for one period. NaN and infinities propagate unchanged.
pub fn lr(lpx: f64, k1: f64, k2: f64, k3: f64, reflexion: f64) -> f64 {
    lpx + k1 + k2 + k3 + reflexion
}

/// Evaluation level for `period`, picking the matching K1
pub fn lr_for(lpx: f64, factors: &CorrectionFactors, period: Period) -> f64 {
    lr(
        lpx,
        factors.k1(period),
        factors.k2,
        factors.k3,
        factors.reflexion,
    )
}
