//! Errors raised before or during a study computation.
//!
//! Every variant is a precondition violation; none is transient.

use shared_types::ParseZoneError;
use thiserror::Error;

pub type AcousticResult<T> = Result<T, AcousticError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcousticError {
    #[error("Invalid geometry: {field} must be strictly positive (got {value} m)")]
    InvalidGeometry { field: &'static str, value: f64 },

    #[error("Unknown sensitivity zone: '{0}' (expected DS I, DS II, DS III or DS IV)")]
    UnknownZone(String),

    #[error("Non-finite input: {field} = {value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("Non-finite result: {field} = {value} (distances outside the computable range)")]
    NonFiniteResult { field: &'static str, value: f64 },

    #[error("Source level Lp1 = {0} dB(A) is outside the plausible range [0, 120]")]
    SourceLevelOutOfRange(f64),
}

impl From<ParseZoneError> for AcousticError {
    fn from(err: ParseZoneError) -> Self {
        AcousticError::UnknownZone(err.0)
    }
}
