pub mod format;
pub mod types;
pub mod zone;

pub use types::{
    AcousticParameters, CalculationResult, CorrectionFactors, LimitOverrides, LimitSource,
    Period, ProjectInfo, ResolvedLimits, StudyStatus, DEFAULT_K1_JOUR, DEFAULT_K1_NUIT,
    DEFAULT_K2, DEFAULT_K3, DEFAULT_REFLEXION, slugify,
};
pub use zone::{ParseZoneError, SensitivityZone};
