//! Subcommand implementations
//!
//! Output goes to the writer passed in; logs go to stderr through tracing.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use acoustic_engine::{profiles, AcousticEngine, Study};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime};
use shared_types::CalculationResult;
use typst_engine::{report_file_name, OutputFormat, StudyReport};

use crate::display;
use crate::prompt::Prompter;
use crate::study_file;

/// Where to write a PDF report, if at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    None,
    /// Default file name in the given directory
    InDir(PathBuf),
    File(PathBuf),
}

impl ReportTarget {
    /// From `--report [PATH]`: absent, bare flag, or explicit path
    pub fn from_flag(flag: Option<Option<PathBuf>>) -> Self {
        match flag {
            None => ReportTarget::None,
            Some(None) => ReportTarget::InDir(PathBuf::from(".")),
            Some(Some(path)) => ReportTarget::File(path),
        }
    }
}

/// How reports are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub format: OutputFormat,
    pub timeout_ms: u64,
}

impl ReportSettings {
    pub fn new(format: OutputFormat, timeout_ms: u64) -> Self {
        Self { format, timeout_ms }
    }

    pub fn pdf(timeout_ms: u64) -> Self {
        Self::new(OutputFormat::Pdf, timeout_ms)
    }
}

pub fn compute(study: &Study) -> Result<CalculationResult> {
    AcousticEngine::new()
        .run(study)
        .with_context(|| format!("Study '{}' failed", study.project.nom_projet))
}

/// Render the report and write it; returns the written path
pub async fn write_report(
    study: &Study,
    result: &CalculationResult,
    target: &ReportTarget,
    settings: ReportSettings,
) -> Result<Option<PathBuf>> {
    if *target == ReportTarget::None {
        return Ok(None);
    }

    let report = StudyReport::new(study.project.clone(), study.params, study.factors, *result);
    let path = match target {
        ReportTarget::None => return Ok(None),
        ReportTarget::File(path) => path.clone(),
        ReportTarget::InDir(dir) => {
            dir.join(report.file_name(settings.format, Local::now().naive_local()))
        }
    };

    let artifact = typst_engine::render_report(report, settings.format, settings.timeout_ms)
        .await
        .context("Report rendering failed")?
        .into_artifact()
        .context("Report compilation failed")?;

    std::fs::write(&path, &artifact.data)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        format = %settings.format,
        pages = artifact.page_count,
        "report written"
    );
    Ok(Some(path))
}

/// Compute, display and optionally report one study
pub async fn run_study<W: Write>(
    study: &Study,
    target: &ReportTarget,
    settings: ReportSettings,
    out: &mut W,
) -> Result<CalculationResult> {
    let result = compute(study)?;
    write!(out, "{}", display::format_results(study, &result)?)?;
    if let Some(path) = write_report(study, &result, target, settings).await? {
        writeln!(
            out,
            "Rapport {} généré : {}",
            settings.format.extension().to_uppercase(),
            path.display()
        )?;
    }
    Ok(result)
}

pub async fn run_file<W: Write>(
    path: &Path,
    target: &ReportTarget,
    settings: ReportSettings,
    out: &mut W,
) -> Result<CalculationResult> {
    let study = study_file::load(path)?;
    run_study(&study, target, settings, out).await
}

pub async fn run_profile<W: Write>(
    name: &str,
    target: &ReportTarget,
    settings: ReportSettings,
    out: &mut W,
) -> Result<CalculationResult> {
    let study = profiles::by_name(name).ok_or_else(|| {
        anyhow!(
            "Unknown profile '{}' (available: {})",
            name,
            profiles::list().join(", ")
        )
    })?;
    run_study(&study, target, settings, out).await
}

pub fn zones<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "{}", display::format_zones()?)?;
    Ok(())
}

/// Run every study file on its own task. Returns true when all succeeded.
///
/// Reports are named after each study file's stem, so studies sharing a
/// project name never write to the same path.
pub async fn batch<W: Write>(
    paths: &[PathBuf],
    report_dir: Option<PathBuf>,
    settings: ReportSettings,
    out: &mut W,
) -> Result<bool> {
    let targets = batch_targets(
        paths,
        report_dir.as_deref(),
        settings.format,
        Local::now().naive_local(),
    );

    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .zip(targets)
        .map(|(path, target)| {
            tokio::spawn(async move {
                let outcome = batch_one(&path, &target, settings).await;
                (path, outcome)
            })
        })
        .collect();

    let mut all_ok = true;
    for handle in handles {
        let (path, outcome) = handle.await.context("Batch task failed")?;
        if let Err(err) = &outcome {
            tracing::warn!(path = %path.display(), error = %err, "study failed");
            all_ok = false;
        }
        writeln!(out, "{}", display::format_batch_line(&path, &outcome))?;
    }

    Ok(all_ok)
}

/// One report path per input, suffixed `_2`, `_3`.. when stems repeat
fn batch_targets(
    paths: &[PathBuf],
    report_dir: Option<&Path>,
    format: OutputFormat,
    at: NaiveDateTime,
) -> Vec<ReportTarget> {
    let Some(dir) = report_dir else {
        return vec![ReportTarget::None; paths.len()];
    };

    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "etude".to_string());
            let mut name = report_file_name(&stem, format, at);
            let mut n = 1;
            while !taken.insert(name.clone()) {
                n += 1;
                name = report_file_name(&format!("{}_{}", stem, n), format, at);
            }
            ReportTarget::File(dir.join(name))
        })
        .collect()
}

async fn batch_one(
    path: &Path,
    target: &ReportTarget,
    settings: ReportSettings,
) -> Result<CalculationResult> {
    let study = study_file::load(path)?;
    let result = compute(&study)?;
    write_report(&study, &result, target, settings).await?;
    Ok(result)
}

/// Guided session: input, results, optional report and study file in `dir`
pub async fn interactive<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    dir: &Path,
    timeout_ms: u64,
) -> Result<()> {
    prompter.say("Bienvenue dans le Calculateur Acoustique Interactif")?;
    prompter.say("Cet outil va vous guider pour réaliser votre étude acoustique")?;

    let study = prompter.collect_study()?;
    prompter.say("\nCALCULS EN COURS...")?;
    let result = compute(&study)?;
    prompter.say(display::format_results(&study, &result)?)?;

    if prompter.ask_yes_no("\nSouhaitez-vous générer le rapport PDF ? (o/n) : ")? {
        prompter.say("\nGénération du rapport PDF en cours...")?;
        let target = ReportTarget::InDir(dir.to_path_buf());
        match write_report(&study, &result, &target, ReportSettings::pdf(timeout_ms)).await {
            Ok(Some(path)) => {
                prompter.say(format!("Rapport PDF généré avec succès : {}", path.display()))?
            }
            Ok(None) => {}
            Err(err) => prompter.say(format!("Échec de la génération du rapport : {:#}", err))?,
        }
    }

    if prompter.ask_yes_no(
        "\nSouhaitez-vous sauvegarder cette configuration pour un usage futur ? (o/n) : ",
    )? {
        let name = prompter.ask("Nom du fichier de configuration (sans extension) : ")?;
        let file_name = if name.is_empty() {
            study_file::default_file_name(&study.project)
        } else {
            format!("{}.txt", name)
        };
        let path = dir.join(file_name);
        match study_file::save(&study, &path, Local::now().date_naive()) {
            Ok(()) => prompter.say(format!("Configuration sauvegardée dans : {}", path.display()))?,
            Err(err) => prompter.say(format!("Erreur lors de la sauvegarde : {:#}", err))?,
        }
    }

    prompter.say("\nMerci d'avoir utilisé le Calculateur Acoustique Interactif !")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_run_profile_without_report() {
        let mut out = Vec::new();
        let result = run_profile("uciole", &ReportTarget::None, ReportSettings::pdf(5000), &mut out)
            .await
            .unwrap();
        assert!(result.conforme_jour && result.conforme_nuit);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(dérogation)"));
        assert!(!text.contains("Rapport PDF"));
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let mut out = Vec::new();
        let err = run_profile("mirabeau", &ReportTarget::None, ReportSettings::pdf(5000), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("available: uciole"));
    }

    #[test]
    fn test_report_flag() {
        assert_eq!(ReportTarget::from_flag(None), ReportTarget::None);
        assert_eq!(
            ReportTarget::from_flag(Some(None)),
            ReportTarget::InDir(PathBuf::from("."))
        );
        assert_eq!(
            ReportTarget::from_flag(Some(Some(PathBuf::from("r.pdf")))),
            ReportTarget::File(PathBuf::from("r.pdf"))
        );
    }

    #[tokio::test]
    async fn test_run_file_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let study_path = dir.path().join("uciole.txt");
        let report_path = dir.path().join("uciole.pdf");
        study_file::save(
            &profiles::uciole(),
            &study_path,
            Local::now().date_naive(),
        )
        .unwrap();

        let mut out = Vec::new();
        run_file(
            &study_path,
            &ReportTarget::File(report_path.clone()),
            ReportSettings::pdf(30_000),
            &mut out,
        )
        .await
        .unwrap();

        let bytes = std::fs::read(&report_path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        study_file::save(&profiles::uciole(), &good, Local::now().date_naive()).unwrap();
        std::fs::write(
            &bad,
            "zone_sensibilite = \"DS II\"\nlp1 = 31.0\ndistance_ref = 10.0\ndistance_cible = -3.0\n",
        )
        .unwrap();
        let missing = dir.path().join("missing.txt");

        let mut out = Vec::new();
        let all_ok = batch(&[good, bad, missing], None, ReportSettings::pdf(5000), &mut out)
            .await
            .unwrap();
        assert!(!all_ok);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("✓") && lines[0].contains("CONFORME"));
        assert!(lines[1].starts_with("✗") && lines[1].contains("Invalid geometry"));
        assert!(lines[2].starts_with("✗") && lines[2].contains("Failed to read study file"));
    }

    #[test]
    fn test_batch_targets_are_unique_per_input() {
        let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let paths = [
            PathBuf::from("a/etude.txt"),
            PathBuf::from("b/etude.txt"),
            PathBuf::from("annexe.txt"),
        ];

        let targets = batch_targets(&paths, Some(Path::new("out")), OutputFormat::Pdf, at);
        assert_eq!(
            targets,
            vec![
                ReportTarget::File(PathBuf::from("out/rapport_acoustique_etude_20250314_0905.pdf")),
                ReportTarget::File(PathBuf::from("out/rapport_acoustique_etude_2_20250314_0905.pdf")),
                ReportTarget::File(PathBuf::from("out/rapport_acoustique_annexe_20250314_0905.pdf")),
            ]
        );
        assert_eq!(
            batch_targets(&paths, None, OutputFormat::Pdf, at),
            vec![ReportTarget::None; 3]
        );
    }

    #[tokio::test]
    async fn test_batch_writes_one_report_per_study_sharing_a_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("rapports");
        std::fs::create_dir(&reports).unwrap();

        // Neither file names its project, both fall back to the default name
        let conforming = dir.path().join("a.txt");
        let failing = dir.path().join("b.txt");
        std::fs::write(
            &conforming,
            "zone_sensibilite = \"DS II\"\nlp1 = 31.0\ndistance_ref = 10.0\ndistance_cible = 18.0\n",
        )
        .unwrap();
        std::fs::write(
            &failing,
            "zone_sensibilite = \"DS IV\"\nlp1 = 90.0\ndistance_ref = 10.0\ndistance_cible = 18.0\n",
        )
        .unwrap();

        let mut out = Vec::new();
        let all_ok = batch(
            &[conforming, failing],
            Some(reports.clone()),
            ReportSettings::pdf(30_000),
            &mut out,
        )
        .await
        .unwrap();
        assert!(all_ok);

        let mut written: Vec<String> = std::fs::read_dir(&reports)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(written.len(), 2, "{:?}", written);
        assert!(written[0].starts_with("rapport_acoustique_a_"));
        assert!(written[1].starts_with("rapport_acoustique_b_"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("MESURES NECESSAIRES"));
    }

    #[tokio::test]
    async fn test_run_profile_svg_preview() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        run_profile(
            "uciole",
            &ReportTarget::InDir(dir.path().to_path_buf()),
            ReportSettings::new(OutputFormat::Svg, 30_000),
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rapport SVG généré"));
        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
        let path = written[0].as_ref().unwrap().path();
        assert_eq!(path.extension().unwrap(), "svg");
        assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
    }

    #[tokio::test]
    async fn test_interactive_session_saves_study() {
        let dir = tempfile::tempdir().unwrap();
        let script = "Hotel Test\nSion\nPAC\n3\nn\n45\n5\n20\n\n\n\n\n\n\n\no\nn\no\netude\n";
        let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());

        interactive(&mut prompter, dir.path(), 5000).await.unwrap();

        let saved = study_file::load(dir.path().join("etude.txt")).unwrap();
        assert_eq!(saved.project.nom_projet, "Hotel Test");
        assert_eq!(saved.params.distance_cible, 20.0);

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert!(output.contains("RESULTATS DE L'ETUDE ACOUSTIQUE"));
        assert!(output.contains("Configuration sauvegardée dans"));
    }
}
