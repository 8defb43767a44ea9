//! Guided interactive input
//!
//! Generic over the reader and writer so sessions can be scripted in tests.
//! An empty answer selects the documented default; a malformed one is asked
//! again. End of input aborts the session.

use std::io::{BufRead, Write};

use acoustic_engine::validation::LP1_RANGE;
use acoustic_engine::Study;
use anyhow::{bail, Context, Result};
use shared_types::format::whole_dba;
use shared_types::{
    AcousticParameters, CorrectionFactors, LimitOverrides, ProjectInfo, SensitivityZone,
    DEFAULT_K1_JOUR, DEFAULT_K1_NUIT, DEFAULT_K2, DEFAULT_K3, DEFAULT_REFLEXION,
};

use crate::display;

const INVALID_NUMBER: &str = "Veuillez entrer une valeur numérique valide.";

/// Answer to the summary confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accept,
    Restart,
    Modify,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// `o`, `oui`, `y`, `yes` (any case)
pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "o" | "oui" | "y" | "yes"
    )
}

/// Decimal comma accepted; infinities and NaN rejected
fn parse_number(answer: &str) -> Option<f64> {
    answer
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Print the question and read one trimmed line
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            bail!("input closed before the study was complete");
        }
        Ok(line.trim().to_string())
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        Ok(is_yes(&self.ask(question)?))
    }

    fn ask_text_or(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn ask_number(
        &mut self,
        question: &str,
        accept: impl Fn(f64) -> bool,
        rejected: &str,
    ) -> Result<f64> {
        loop {
            let answer = self.ask(question)?;
            match parse_number(&answer) {
                Some(value) if accept(value) => return Ok(value),
                Some(_) => self.say(rejected)?,
                None => self.say(INVALID_NUMBER)?,
            }
        }
    }

    fn ask_optional_number(&mut self, question: &str) -> Result<Option<f64>> {
        loop {
            let answer = self.ask(question)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match parse_number(&answer) {
                Some(value) => return Ok(Some(value)),
                None => self.say(INVALID_NUMBER)?,
            }
        }
    }

    fn ask_number_or(&mut self, question: &str, default: f64) -> Result<f64> {
        Ok(self.ask_optional_number(question)?.unwrap_or(default))
    }

    pub fn project_info(&mut self) -> Result<ProjectInfo> {
        self.say("\nINFORMATIONS GENERALES DU PROJET")?;
        self.say("-".repeat(50))?;

        let defaults = ProjectInfo::default();
        let nom_projet = self.ask_text_or("Nom du projet : ", &defaults.nom_projet)?;
        let localisation = self.ask_text_or(
            "Localisation (ville, canton, pays) : ",
            &defaults.localisation,
        )?;
        let equipement = self.ask_text_or(
            "Équipement étudié (modèle complet) : ",
            &defaults.equipement,
        )?;

        Ok(ProjectInfo::new(nom_projet, localisation, equipement))
    }

    pub fn zone(&mut self) -> Result<SensitivityZone> {
        self.say("\nZONE DE SENSIBILITE")?;
        self.say("-".repeat(30))?;
        self.say("Zones disponibles :")?;
        for zone in SensitivityZone::all() {
            self.say(format!("{}. {} - {}", zone.menu_index(), zone.code(), zone.label()))?;
        }

        loop {
            let answer = self.ask("\nChoisissez le degré de sensibilité (1-4) : ")?;
            match SensitivityZone::parse_code(&answer) {
                Some(zone) => {
                    self.say(format!("Zone sélectionnée : {}", zone))?;
                    self.say(format!(
                        "   Limites : Jour {} / Nuit {}",
                        whole_dba(zone.default_day_limit()),
                        whole_dba(zone.default_night_limit())
                    ))?;
                    return Ok(zone);
                }
                None => self.say("Choix invalide. Veuillez entrer 1, 2, 3 ou 4.")?,
            }
        }
    }

    /// Optional per-period limits replacing the zone table values
    pub fn limit_overrides(&mut self, zone: SensitivityZone) -> Result<LimitOverrides> {
        if !self.ask_yes_no("\nSouhaitez-vous personnaliser les limites réglementaires ? (o/n) : ")? {
            return Ok(LimitOverrides::none());
        }

        let limite_jour = self.ask_optional_number(&format!(
            "Limite jour (actuellement {}, Entrée pour conserver) : ",
            whole_dba(zone.default_day_limit())
        ))?;
        let limite_nuit = self.ask_optional_number(&format!(
            "Limite nuit (actuellement {}, Entrée pour conserver) : ",
            whole_dba(zone.default_night_limit())
        ))?;

        self.say(format!(
            "Nouvelles limites : Jour {} / Nuit {}",
            whole_dba(limite_jour.unwrap_or(zone.default_day_limit())),
            whole_dba(limite_nuit.unwrap_or(zone.default_night_limit()))
        ))?;

        Ok(LimitOverrides {
            limite_jour,
            limite_nuit,
        })
    }

    pub fn technical_parameters(&mut self) -> Result<AcousticParameters> {
        self.say("\nPARAMETRES TECHNIQUES DE L'EQUIPEMENT")?;
        self.say("-".repeat(50))?;

        let lp1 = self.ask_number(
            "Niveau de pression sonore Lp1 (dB(A)) : ",
            |v| LP1_RANGE.contains(&v),
            "Valeur invalide. Le niveau sonore doit être entre 0 et 120 dB(A).",
        )?;
        let distance_ref = self.ask_number(
            "Distance de référence pour Lp1 (mètres) : ",
            |v| v > 0.0,
            "La distance doit être positive.",
        )?;
        let distance_cible = self.ask_number(
            "Distance à la fenêtre la plus proche (mètres) : ",
            |v| v > 0.0,
            "La distance doit être positive.",
        )?;

        let mut params = AcousticParameters::new(lp1, distance_ref, distance_cible);
        params.puissance_sonore = self.ask_optional_number(
            "Niveau de puissance sonore (dB(A)) [Optionnel, Entrée pour ignorer] : ",
        )?;
        params.puissance_frigorifique = self.ask_optional_number(
            "Puissance frigorifique (kW) [Optionnel, Entrée pour ignorer] : ",
        )?;

        Ok(params)
    }

    pub fn correction_factors(&mut self) -> Result<CorrectionFactors> {
        self.say("\nFACTEURS DE CORRECTION SELON L'OPB")?;
        self.say("-".repeat(50))?;
        self.say("Conseil : laissez vide pour utiliser les valeurs par défaut")?;

        self.say("\nFacteur K1 - Correction temporelle")?;
        let k1_jour = self.ask_number_or("K1 jour (dB(A)) [défaut: 5] : ", DEFAULT_K1_JOUR)?;
        let k1_nuit = self.ask_number_or("K1 nuit (dB(A)) [défaut: 10] : ", DEFAULT_K1_NUIT)?;

        self.say("\nFacteur K2 - Composante tonale")?;
        self.say("0 = Pas de composante tonale")?;
        self.say("4 = Composante tonale audible")?;
        self.say("6 = Composante tonale très marquée")?;
        let k2 = self.ask_number_or("K2 (dB(A)) [défaut: 4] : ", DEFAULT_K2)?;

        self.say("\nFacteur K3 - Composante impulsive")?;
        self.say("0 = Pas de composante impulsive")?;
        self.say("5 = Composante impulsive audible")?;
        let k3 = self.ask_number_or("K3 (dB(A)) [défaut: 0] : ", DEFAULT_K3)?;

        self.say("\nCorrection de réflexion")?;
        self.say("0 = Terrain libre")?;
        self.say("1 = Réflexion sur une surface")?;
        self.say("3 = Réflexion en angle (coin de bâtiment)")?;
        let reflexion =
            self.ask_number_or("Correction réflexion (dB(A)) [défaut: 1] : ", DEFAULT_REFLEXION)?;

        Ok(CorrectionFactors {
            k1_jour,
            k1_nuit,
            k2,
            k3,
            reflexion,
        })
    }

    pub fn confirm(&mut self) -> Result<Confirmation> {
        loop {
            let answer = self
                .ask("\nCes données sont-elles correctes ? (o/n/m pour modifier) : ")?
                .to_lowercase();
            match answer.as_str() {
                "o" | "oui" | "y" | "yes" => return Ok(Confirmation::Accept),
                "n" | "non" | "no" => return Ok(Confirmation::Restart),
                "m" | "modifier" | "mod" => return Ok(Confirmation::Modify),
                _ => self.say("Veuillez répondre par 'o' (oui), 'n' (non) ou 'm' (modifier)")?,
            }
        }
    }

    /// Re-enter one group of fields. Changing the zone drops earlier overrides.
    pub fn modify(&mut self, study: &mut Study) -> Result<()> {
        self.say("\nMODIFICATION DES DONNEES")?;
        self.say("-".repeat(30))?;
        self.say("Que souhaitez-vous modifier ?")?;
        self.say("1. Informations du projet")?;
        self.say("2. Paramètres techniques")?;
        self.say("3. Facteurs de correction")?;
        self.say("4. Zone de sensibilité")?;

        match self.ask("Votre choix (1-4) : ")?.as_str() {
            "1" => study.project = self.project_info()?,
            "2" => study.params = self.technical_parameters()?,
            "3" => study.factors = self.correction_factors()?,
            "4" => {
                study.zone = self.zone()?;
                study.overrides = self.limit_overrides(study.zone)?;
            }
            _ => self.say("Choix invalide")?,
        }
        Ok(())
    }

    fn fresh_study(&mut self) -> Result<Study> {
        let project = self.project_info()?;
        let zone = self.zone()?;
        let overrides = self.limit_overrides(zone)?;
        let params = self.technical_parameters()?;
        let factors = self.correction_factors()?;
        Ok(Study {
            project,
            params,
            factors,
            zone,
            overrides,
        })
    }

    /// Full input sequence, repeated until the summary is accepted
    pub fn collect_study(&mut self) -> Result<Study> {
        let mut study = self.fresh_study()?;
        loop {
            let summary = display::format_summary(&study)?;
            write!(self.output, "{}", summary)?;

            match self.confirm()? {
                Confirmation::Accept => return Ok(study),
                Confirmation::Restart => {
                    self.say("\nReprise de la saisie des données...")?;
                    study = self.fresh_study()?;
                }
                Confirmation::Modify => self.modify(&mut study)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    const UCIOLE_SCRIPT: &str = "Hôtel L'Uciole\n\
        Crans-Montana, Valais, Suisse\n\
        \n\
        2\n\
        o\n\
        50\n\
        \n\
        31\n\
        10\n\
        18\n\
        63\n\
        21\n\
        \n\
        \n\
        \n\
        \n\
        \n";

    #[test]
    fn test_full_session_with_defaults_and_override() {
        let mut p = prompter(&format!("{}o\n", UCIOLE_SCRIPT));
        let study = p.collect_study().unwrap();

        assert_eq!(study.project.nom_projet, "Hôtel L'Uciole");
        assert_eq!(study.project.equipement, "Équipement non spécifié");
        assert_eq!(study.zone, SensitivityZone::DsII);
        assert_eq!(study.overrides, LimitOverrides::none().day(50.0));
        assert_eq!(
            study.params,
            AcousticParameters::new(31.0, 10.0, 18.0)
                .with_sound_power(63.0)
                .with_cooling_capacity(21.0)
        );
        assert_eq!(study.factors, CorrectionFactors::default());

        let result = study.compute().unwrap();
        assert_eq!(result.limite_jour(), 50.0);
        assert_eq!(result.limite_nuit(), 45.0);
    }

    #[test]
    fn test_invalid_numbers_are_asked_again() {
        let mut p = prompter("abc\n150\n31\n0\n10\n-2\n18\n\n\n");
        let params = p.technical_parameters().unwrap();
        assert_eq!(params, AcousticParameters::new(31.0, 10.0, 18.0));

        let output = transcript(p);
        assert!(output.contains(INVALID_NUMBER));
        assert!(output.contains("entre 0 et 120 dB(A)"));
        assert_eq!(output.matches("La distance doit être positive.").count(), 2);
    }

    #[test]
    fn test_malformed_factor_is_not_a_default() {
        let mut p = prompter("cinq\n7\n\n\n\n\n");
        let factors = p.correction_factors().unwrap();
        assert_eq!(factors.k1_jour, 7.0);
        assert_eq!(factors.k1_nuit, DEFAULT_K1_NUIT);
        assert!(transcript(p).contains(INVALID_NUMBER));
    }

    #[test]
    fn test_decimal_comma_accepted() {
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number(" 18 "), Some(18.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_invalid_zone_choice_reprompts() {
        let mut p = prompter("7\nDS V\n3\n");
        assert_eq!(p.zone().unwrap(), SensitivityZone::DsIII);
        assert_eq!(transcript(p).matches("Choix invalide").count(), 2);
    }

    #[test]
    fn test_modify_zone_drops_overrides() {
        let script = format!("{}m\n4\n4\nn\no\n", UCIOLE_SCRIPT);
        let mut p = prompter(&script);
        let study = p.collect_study().unwrap();
        assert_eq!(study.zone, SensitivityZone::DsIV);
        assert!(study.overrides.is_empty());
    }

    #[test]
    fn test_restart_reenters_everything() {
        let second = "Autre\n\n\n1\nn\n40\n1\n20\n\n\n\n\n\n\n\n";
        let script = format!("{}x\nn\n{}o\n", UCIOLE_SCRIPT, second);
        let mut p = prompter(&script);
        let study = p.collect_study().unwrap();

        assert_eq!(study.project.nom_projet, "Autre");
        assert_eq!(study.zone, SensitivityZone::DsI);
        assert!(study.overrides.is_empty());
        assert_eq!(study.params.lp1, 40.0);

        let output = transcript(p);
        assert!(output.contains("Veuillez répondre par 'o' (oui)"));
        assert!(output.contains("Reprise de la saisie"));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let mut p = prompter("Projet\n");
        let err = p.collect_study().unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("o"));
        assert!(is_yes(" OUI "));
        assert!(is_yes("y"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
