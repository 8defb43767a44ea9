//! Display precision used by the console and the PDF report.
//!
//! Levels are shown with 1 decimal, limits and correction factors with none,
//! attenuation (and Lpx in formula lines) with 2.

pub fn level(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn whole(value: f64) -> String {
    format!("{:.0}", value)
}

pub fn precise(value: f64) -> String {
    format!("{:.2}", value)
}

/// "31.0 dB(A)" style
pub fn level_dba(value: f64) -> String {
    format!("{} dB(A)", level(value))
}

/// "50 dB(A)" style
pub fn whole_dba(value: f64) -> String {
    format!("{} dB(A)", whole(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precisions() {
        assert_eq!(level(35.8951), "35.9");
        assert_eq!(whole(50.0), "50");
        assert_eq!(precise(-5.10545), "-5.11");
        assert_eq!(level_dba(31.0), "31.0 dB(A)");
        assert_eq!(whole_dba(45.0), "45 dB(A)");
    }
}
