//! `acoustic` binary
//!
//! Stdout carries the study display; logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use acoustic_cli::{commands, Prompter, ReportSettings, ReportTarget};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use typst_engine::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "acoustic")]
#[command(
    version,
    about = "Calculateur acoustique OPB: niveaux d'évaluation jour/nuit et conformité"
)]
struct Args {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Report compilation timeout in milliseconds
    #[arg(long, default_value = "5000", global = true)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Guided input session (default)
    Interactive,

    /// Compute a saved study file
    Run {
        file: PathBuf,

        /// Write the report (default name in the current directory)
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        report: Option<Option<PathBuf>>,

        /// Report format: pdf, or svg for a first-page preview
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
    },

    /// Compute a built-in study
    Profile {
        #[arg(default_value = "uciole")]
        name: String,

        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        report: Option<Option<PathBuf>>,

        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
    },

    /// Print the sensitivity zone table
    Zones,

    /// Compute several study files concurrently
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write one report per study into DIR (default: current directory)
        #[arg(long, num_args = 0..=1, value_name = "DIR")]
        report: Option<Option<PathBuf>>,

        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout();

    match args.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            let dir = std::env::current_dir()?;
            commands::interactive(&mut prompter, &dir, args.timeout_ms).await?;
        }
        Command::Run { file, report, format } => {
            let target = ReportTarget::from_flag(report);
            let settings = ReportSettings::new(format, args.timeout_ms);
            commands::run_file(&file, &target, settings, &mut stdout).await?;
        }
        Command::Profile {
            name,
            report,
            format,
        } => {
            let target = ReportTarget::from_flag(report);
            let settings = ReportSettings::new(format, args.timeout_ms);
            commands::run_profile(&name, &target, settings, &mut stdout).await?;
        }
        Command::Zones => commands::zones(&mut stdout)?,
        Command::Batch {
            files,
            report,
            format,
        } => {
            let report_dir = report.map(|dir| dir.unwrap_or_else(|| PathBuf::from(".")));
            let settings = ReportSettings::new(format, args.timeout_ms);
            let all_ok = commands::batch(&files, report_dir, settings, &mut stdout).await?;
            if !all_ok {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    tracing::debug!("acoustic v{}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
