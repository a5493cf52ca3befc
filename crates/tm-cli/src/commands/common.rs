//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tm_core::{read_migration_files, Config, ConnectionUrl, MigrationFile};
use tm_db::{Driver, DriverRegistry};
use tm_run::{BatchReport, Orchestrator, StepReport, Target};

use crate::cli::{GlobalArgs, OutputFormat};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run and open stores are closed.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main never prints it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Status of one batch step
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StepStatus {
    Success,
    Error,
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "success"),
            StepStatus::Error => write!(f, "error"),
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Serializable view of one step
#[derive(Debug, Serialize)]
pub(crate) struct StepSummary {
    pub(crate) file: String,
    pub(crate) version: Option<u64>,
    pub(crate) direction: Option<String>,
    pub(crate) status: StepStatus,
    pub(crate) duration_ms: u128,
    pub(crate) errors: Vec<String>,
}

impl From<&StepReport> for StepSummary {
    fn from(step: &StepReport) -> Self {
        Self {
            file: step.file_name.clone(),
            version: Some(step.version),
            direction: Some(step.direction.to_string()),
            status: if step.succeeded() {
                StepStatus::Success
            } else {
                StepStatus::Error
            },
            duration_ms: step.duration.as_millis(),
            errors: step.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Every dispatched step followed by the skipped files
pub(crate) fn summarize(report: &BatchReport) -> Vec<StepSummary> {
    report
        .steps
        .iter()
        .map(StepSummary::from)
        .chain(report.skipped.iter().map(|file| StepSummary {
            file: file.clone(),
            version: None,
            direction: None,
            status: StepStatus::Skipped,
            duration_ms: 0,
            errors: Vec::new(),
        }))
        .collect()
}

/// Project root from `--project-dir`
pub(crate) fn project_root(global: &GlobalArgs) -> PathBuf {
    PathBuf::from(&global.project_dir)
}

/// Load config from `--config` or the project directory
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::from_file(&PathBuf::from(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Config::load(&project_root(global)).context("Failed to load config"),
    }
}

/// `--url` wins over `--target`, which wins over the config default
pub(crate) fn resolve_url(global: &GlobalArgs, config: &Config) -> Result<ConnectionUrl> {
    match &global.url {
        Some(raw) => ConnectionUrl::parse(raw).context("Invalid --url"),
        None => config
            .resolve_url(global.target.as_deref())
            .context("Failed to resolve connection url"),
    }
}

/// Migrations directory from `--migrations` or config
pub(crate) fn migrations_dir(global: &GlobalArgs, config: &Config) -> PathBuf {
    match &global.migrations {
        Some(dir) => PathBuf::from(dir),
        None => config.migrations_dir(&project_root(global)),
    }
}

/// Read every migration file in the migrations directory
pub(crate) fn load_migrations(global: &GlobalArgs, config: &Config) -> Result<Vec<MigrationFile>> {
    let dir = migrations_dir(global, config);
    let files = read_migration_files(&dir)
        .with_context(|| format!("Failed to read migrations from {}", dir.display()))?;
    log::info!("Loaded {} migration file(s) from {}", files.len(), dir.display());
    Ok(files)
}

/// Open the store named by the global args
pub(crate) async fn connect(global: &GlobalArgs, config: &Config) -> Result<Arc<dyn Driver>> {
    let url = resolve_url(global, config)?;
    let driver = DriverRegistry::with_defaults()
        .connect(&url)
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;
    Ok(driver)
}

/// Close a driver, logging instead of failing
pub(crate) async fn close_quietly(driver: &Arc<dyn Driver>) {
    if let Err(e) = driver.close().await {
        log::warn!("Failed to close {} store: {}", driver.db_type(), e);
    }
}

/// Plan and run one batch toward `target` against the configured store
pub(crate) async fn run_to_target(
    global: &GlobalArgs,
    target: Target,
    output: OutputFormat,
) -> Result<()> {
    let config = load_config(global)?;
    let files = load_migrations(global, &config)?;
    let driver = connect(global, &config).await?;

    let result = Orchestrator::new(Arc::clone(&driver))
        .migrate_to(&files, target)
        .await;
    close_quietly(&driver).await;

    let report = result.context("Failed to plan migrations")?;
    finish_batch(&report, output)
}

/// Print a batch report and turn a failed batch into exit code 1
pub(crate) fn finish_batch(report: &BatchReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&summarize(report))?,
        OutputFormat::Text => print_batch_text(report),
    }
    if report.is_success() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

fn print_batch_text(report: &BatchReport) {
    if report.steps.is_empty() && report.skipped.is_empty() {
        println!("Nothing to do");
        return;
    }

    for step in summarize(report) {
        println!("  [{}] {} ({}ms)", step.status, step.file, step.duration_ms);
        for error in &step.errors {
            eprintln!("      {}", error);
        }
    }

    println!();
    let applied = report.applied().count();
    match report.failure() {
        None => println!("Applied {} migration(s)", applied),
        Some(failed) => println!(
            "Applied {} migration(s); halted at {}, {} skipped",
            applied,
            failed.file_name,
            report.skipped.len()
        ),
    }
}

/// Pretty-print any serializable value as JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
