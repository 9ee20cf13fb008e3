use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;

use flight_list_check::catalog::{self, Catalog};
use flight_list_check::config::{Args, CheckArgs, CheckSettings, Command, Config, FlyArgs};
use flight_list_check::error::ListError;
use flight_list_check::session::{self, Session};
use flight_list_check::{check, report, watch};

/// No error-severity findings
const EXIT_CLEAN: u8 = 0;
/// At least one error-severity finding
const EXIT_FINDINGS: u8 = 1;
/// Unreadable source, bad configuration or usage
const EXIT_FATAL: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(args: Args) -> Result<u8> {
    let config = Config::from_args(&args)?;
    if let Some(path) = &config.project_config_path {
        log::info!("Using project config {}", path.display());
    }

    match &args.command {
        Command::Check(check_args) => run_check(&config, check_args).await,
        Command::List => run_list(&config),
        Command::Fly(fly_args) => run_fly(&config, fly_args),
    }
}

fn lists_dir(config: &Config) -> Result<PathBuf> {
    match &config.lists_dir {
        Some(dir) => Ok(dir.clone()),
        None => bail!("Could not determine the lists directory, pass --lists-dir"),
    }
}

async fn run_check(config: &Config, args: &CheckArgs) -> Result<u8> {
    let settings = config.check_settings(args)?;

    if !settings.watch {
        let files = resolve_files(config, &settings)?;
        let failed = check_files(&settings, &files)?;
        return Ok(if failed { EXIT_FINDINGS } else { EXIT_CLEAN });
    }

    let mut targets = if settings.paths.is_empty() {
        vec![lists_dir(config)?]
    } else {
        settings.paths.clone()
    };
    targets.extend(settings.reference.clone());

    watch::watch_loop(&targets, || {
        let outcome =
            resolve_files(config, &settings).and_then(|files| check_files(&settings, &files));
        if let Err(e) = outcome {
            log::error!("{e:#}");
        }
        Ok(())
    })
    .await?;

    Ok(EXIT_CLEAN)
}

/// Expand directories into their list files; the whole library when no path is given
fn resolve_files(config: &Config, settings: &CheckSettings) -> Result<Vec<PathBuf>> {
    if settings.paths.is_empty() {
        let root = lists_dir(config)?;
        let files = Catalog::scan(&root)?.checklist_paths();
        if files.is_empty() {
            bail!("No checklists found in {}", root.display());
        }
        return Ok(files);
    }

    let mut files = Vec::new();
    for path in &settings.paths {
        if path.is_dir() {
            files.extend(catalog::list_files(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Check every file and print its report; true when any report has errors
fn check_files(settings: &CheckSettings, files: &[PathBuf]) -> Result<bool> {
    let reference = settings
        .reference
        .as_deref()
        .map(|path| check::load_reference(path, &settings.format))
        .transpose()
        .context("Failed to load reference list")?;
    let rules = settings.rules(reference);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for path in files {
        let report = check::check_path(path, &settings.format, &rules)?;
        report::write_report(&report, &path.display().to_string(), settings.output, &mut out)?;
        failed |= report.has_errors();
    }

    out.flush()?;
    Ok(failed)
}

fn run_list(config: &Config) -> Result<u8> {
    let root = lists_dir(config)?;
    let catalog = Catalog::scan(&root)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Checklist files expected in: {}", root.display())?;

    if catalog.is_empty() {
        writeln!(
            out,
            "No aircraft folders found. Create manufacturer folders (e.g., 'Boeing 737') \
             and add numbered .txt checklist files inside them."
        )?;
        return Ok(EXIT_CLEAN);
    }

    for aircraft in &catalog.aircraft {
        writeln!(out, "{}", aircraft.name)?;
        for checklist in &aircraft.checklists {
            writeln!(out, "  {}  ({})", checklist.display_name, checklist.file_name)?;
        }
    }

    Ok(EXIT_CLEAN)
}

fn run_fly(config: &Config, args: &FlyArgs) -> Result<u8> {
    let catalog = Catalog::scan(&lists_dir(config)?)?;
    let aircraft = catalog
        .aircraft(&args.aircraft)
        .ok_or_else(|| ListError::UnknownAircraft(args.aircraft.clone()))?;

    let mut session = Session::new(aircraft.clone());
    if let Some(file_name) = &args.from {
        session.select(file_name)?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = session::fly(&mut session, stdin.lock(), &mut out)?;
    log::debug!("Walkthrough ended: {:?}", outcome);

    Ok(EXIT_CLEAN)
}
