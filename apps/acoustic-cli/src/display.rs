//! Console output for studies and results
//!
//! Everything is written into a `String` so the same text can go to stdout or
//! be asserted on in tests.

use std::fmt::Write;
use std::path::Path;

use acoustic_engine::Study;
use anyhow::Result;
use shared_types::format::{level, level_dba, precise, whole, whole_dba};
use shared_types::{CalculationResult, LimitSource, Period, SensitivityZone, StudyStatus};

const RULE: &str = "======================================================================";

fn period_name(period: Period) -> &'static str {
    match period {
        Period::Jour => "Jour",
        Period::Nuit => "Nuit",
    }
}

fn verdict(conforme: bool) -> &'static str {
    if conforme {
        "✓ CONFORME"
    } else {
        "✗ NON CONFORME"
    }
}

/// Recap shown before the confirmation prompt
pub fn format_summary(study: &Study) -> Result<String> {
    let mut output = String::new();
    let zone = study.zone;
    let limite_jour = study.overrides.limite_jour.unwrap_or(zone.default_day_limit());
    let limite_nuit = study.overrides.limite_nuit.unwrap_or(zone.default_night_limit());

    writeln!(output)?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "RESUME DES DONNEES SAISIES")?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "Projet : {}", study.project.nom_projet)?;
    writeln!(output, "Localisation : {}", study.project.localisation)?;
    writeln!(output, "Équipement : {}", study.project.equipement)?;
    writeln!(output, "Zone de sensibilité : {}", zone)?;
    writeln!(
        output,
        "Limites : Jour {} / Nuit {}",
        whole_dba(limite_jour),
        whole_dba(limite_nuit)
    )?;

    writeln!(output)?;
    writeln!(output, "Paramètres techniques :")?;
    writeln!(
        output,
        "   • Lp1 : {} à {}m",
        level_dba(study.params.lp1),
        study.params.distance_ref
    )?;
    writeln!(output, "   • Distance fenêtre : {}m", study.params.distance_cible)?;
    if let Some(puissance) = study.params.puissance_sonore {
        writeln!(output, "   • Puissance sonore : {}", level_dba(puissance))?;
    }
    if let Some(puissance) = study.params.puissance_frigorifique {
        writeln!(output, "   • Puissance frigorifique : {} kW", level(puissance))?;
    }

    writeln!(output)?;
    writeln!(output, "Facteurs de correction :")?;
    writeln!(output, "   • K1 jour : {}", whole_dba(study.factors.k1_jour))?;
    writeln!(output, "   • K1 nuit : {}", whole_dba(study.factors.k1_nuit))?;
    writeln!(output, "   • K2 (tonale) : {}", whole_dba(study.factors.k2))?;
    writeln!(output, "   • K3 (impulsive) : {}", whole_dba(study.factors.k3))?;
    writeln!(output, "   • Réflexion : {}", whole_dba(study.factors.reflexion))?;
    writeln!(output, "{}", RULE)?;

    Ok(output)
}

/// Full result block, verdicts recomputed from the period booleans
pub fn format_results(study: &Study, result: &CalculationResult) -> Result<String> {
    let mut output = String::new();

    writeln!(output)?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "RESULTATS DE L'ETUDE ACOUSTIQUE")?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "Projet : {}", study.project.nom_projet)?;
    writeln!(output, "Localisation : {}", study.project.localisation)?;
    writeln!(output, "Équipement : {}", study.project.equipement)?;

    writeln!(output)?;
    writeln!(output, "CALCULS ACOUSTIQUES :")?;
    writeln!(
        output,
        "   • Atténuation due à la distance : {} dB(A)",
        precise(result.attenuation)
    )?;
    writeln!(
        output,
        "   • Niveau de pression à {}m : {} dB(A)",
        study.params.distance_cible,
        precise(result.lpx)
    )?;

    writeln!(output)?;
    writeln!(output, "NIVEAUX D'EVALUATION (Lr) :")?;
    for period in Period::both() {
        writeln!(
            output,
            "   • Période {} : {}",
            period.label().to_lowercase(),
            level_dba(result.lr(period))
        )?;
    }

    writeln!(output)?;
    writeln!(output, "CONFORMITE {} :", result.zone())?;
    for period in Period::both() {
        let marker = match result.limits.source(period) {
            LimitSource::Override => " (dérogation)",
            LimitSource::Table => "",
        };
        writeln!(
            output,
            "   • {} : {} / {}{} → {}",
            period_name(period),
            level_dba(result.lr(period)),
            whole_dba(result.limits.limit(period)),
            marker,
            verdict(result.conforme(period))
        )?;
    }

    writeln!(output)?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "CONCLUSION : {}", result.status().label())?;
    writeln!(output, "{}", RULE)?;

    Ok(output)
}

/// Zone table for the `zones` command
pub fn format_zones() -> Result<String> {
    let mut output = String::new();
    writeln!(output, "{:<8}{:<40}{:>8}{:>8}", "Zone", "Libellé", "Jour", "Nuit")?;
    for zone in SensitivityZone::all() {
        writeln!(
            output,
            "{:<8}{:<40}{:>8}{:>8}",
            zone.code(),
            zone.label(),
            whole(zone.default_day_limit()),
            whole(zone.default_night_limit())
        )?;
    }
    Ok(output)
}

/// One line per study in a batch run
pub fn format_batch_line(path: &Path, outcome: &Result<CalculationResult>) -> String {
    match outcome {
        Ok(result) => {
            let status = match result.status() {
                StudyStatus::Conforme => "CONFORME",
                StudyStatus::MesuresNecessaires => "MESURES NECESSAIRES",
            };
            format!(
                "✓ {}  {}  jour {}/{}  nuit {}/{}  {}",
                path.display(),
                result.zone().code(),
                level(result.lr_jour),
                whole(result.limite_jour()),
                level(result.lr_nuit),
                whole(result.limite_nuit()),
                status
            )
        }
        Err(err) => format!("✗ {}  error: {:#}", path.display(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acoustic_engine::{profiles, AcousticError};

    #[test]
    fn test_results_for_profile() {
        let study = profiles::uciole();
        let result = study.compute().unwrap();
        let output = format_results(&study, &result).unwrap();

        assert!(output.contains("Atténuation due à la distance : -5.11 dB(A)"));
        assert!(output.contains("Niveau de pression à 18m : 25.89 dB(A)"));
        assert!(output.contains("Période jour (07h-22h) : 35.9 dB(A)"));
        assert!(output.contains("Période nuit (22h-07h) : 40.9 dB(A)"));
        assert!(output.contains("Jour : 35.9 dB(A) / 50 dB(A) (dérogation) → ✓ CONFORME"));
        assert!(output.contains("Nuit : 40.9 dB(A) / 45 dB(A) → ✓ CONFORME"));
        assert!(output.contains("CONCLUSION : Installation conforme aux normes OPB"));
    }

    #[test]
    fn test_results_non_compliant_night() {
        let mut study = profiles::uciole();
        study.params.distance_cible = 5.0;
        let result = study.compute().unwrap();
        let output = format_results(&study, &result).unwrap();

        assert!(output.contains("Nuit : 52.0 dB(A) / 45 dB(A) → ✗ NON CONFORME"));
        assert!(output.contains("CONCLUSION : Mesures d'atténuation nécessaires"));
    }

    #[test]
    fn test_summary_lists_optional_powers_only_when_present() {
        let mut study = profiles::uciole();
        let output = format_summary(&study).unwrap();
        assert!(output.contains("Limites : Jour 50 dB(A) / Nuit 45 dB(A)"));
        assert!(output.contains("Puissance sonore : 63.0 dB(A)"));
        assert!(output.contains("Puissance frigorifique : 21.0 kW"));

        study.params.puissance_sonore = None;
        study.params.puissance_frigorifique = None;
        let output = format_summary(&study).unwrap();
        assert!(!output.contains("Puissance"));
    }

    #[test]
    fn test_zone_table() {
        let output = format_zones().unwrap();
        assert_eq!(output.lines().count(), 5);
        assert!(output.lines().nth(2).unwrap().starts_with("DS II"));
        assert!(output.contains("55"));
    }

    #[test]
    fn test_batch_lines() {
        let result = profiles::uciole().compute().unwrap();
        let line = format_batch_line(Path::new("uciole.txt"), &Ok(result));
        assert_eq!(line, "✓ uciole.txt  DS II  jour 35.9/50  nuit 40.9/45  CONFORME");

        let line = format_batch_line(
            Path::new("bad.txt"),
            &Err(AcousticError::UnknownZone("DS V".to_string()).into()),
        );
        assert!(line.starts_with("✗ bad.txt  error: Unknown sensitivity zone"));
    }
}
