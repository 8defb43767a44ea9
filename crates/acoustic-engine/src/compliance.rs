//! Compliance verdict against the effective limits.
//!
//! The comparison is non-strict: a level equal to its limit complies.

use serde::{Deserialize, Serialize};
use shared_types::StudyStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub conforme_jour: bool,
    pub conforme_nuit: bool,
}

impl ComplianceVerdict {
    pub fn status(&self) -> StudyStatus {
        StudyStatus::from_periods(self.conforme_jour, self.conforme_nuit)
    }
}

pub fn evaluate(lr_jour: f64, lr_nuit: f64, limite_jour: f64, limite_nuit: f64) -> ComplianceVerdict {
    ComplianceVerdict {
        conforme_jour: lr_jour <= limite_jour,
        conforme_nuit: lr_nuit <= limite_nuit,
    }
}
