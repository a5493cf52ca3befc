//! Fleet command implementation

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tm_core::{Config, ConnectionUrl};
use tm_db::DriverRegistry;
use tm_run::{migrate_fleet, StoreOutcome, Target};

use crate::cli::{FleetArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{
    load_config, load_migrations, print_json, summarize, ExitCode, StepSummary,
};

#[derive(Serialize)]
struct StoreSummary {
    target: String,
    success: bool,
    error: Option<String>,
    steps: Vec<StepSummary>,
}

impl From<&StoreOutcome> for StoreSummary {
    fn from(outcome: &StoreOutcome) -> Self {
        let (error, steps) = match &outcome.result {
            Ok(report) => (None, summarize(report)),
            Err(e) => (Some(e.to_string()), Vec::new()),
        };
        Self {
            target: outcome.name.clone(),
            success: outcome.is_success(),
            error,
            steps,
        }
    }
}

/// Execute the fleet command
pub async fn execute(args: &FleetArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let stores = select_stores(&config, args.targets.as_deref())?;
    let files = Arc::new(load_migrations(global, &config)?);
    let threads = args.threads.unwrap_or(config.threads);

    log::info!("Migrating {} store(s) with {} thread(s)", stores.len(), threads);
    let registry = DriverRegistry::with_defaults();
    let outcomes = migrate_fleet(&registry, stores, files, Target::Latest, threads).await;
    let summaries: Vec<StoreSummary> = outcomes.iter().map(StoreSummary::from).collect();

    match args.output.output {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Text => print_text(&summaries),
    }

    let failed = summaries.iter().filter(|s| !s.success).count();
    if failed > 0 {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Configured targets, optionally narrowed to a comma-separated selection
fn select_stores(config: &Config, selection: Option<&str>) -> Result<Vec<(String, ConnectionUrl)>> {
    if config.targets.is_empty() {
        bail!("No targets configured; add a `targets` section to tidemark.yml");
    }

    let selected: BTreeMap<&str, _> = match selection {
        None => config
            .targets
            .iter()
            .map(|(name, target)| (name.as_str(), target))
            .collect(),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                config
                    .targets
                    .get(name)
                    .map(|target| (name, target))
                    .with_context(|| format!("Unknown target '{}'", name))
            })
            .collect::<Result<_>>()?,
    };

    selected
        .into_iter()
        .map(|(name, target)| {
            let url = ConnectionUrl::parse(&target.url)
                .with_context(|| format!("Invalid url for target '{}'", name))?;
            Ok((name.to_string(), url))
        })
        .collect()
}

fn print_text(summaries: &[StoreSummary]) {
    for store in summaries {
        let status = if store.success { "ok" } else { "FAILED" };
        println!("{} [{}]", store.target, status);
        if let Some(error) = &store.error {
            eprintln!("  {}", error);
        }
        for step in &store.steps {
            println!("  [{}] {} ({}ms)", step.status, step.file, step.duration_ms);
            for error in &step.errors {
                eprintln!("      {}", error);
            }
        }
    }

    let failed = summaries.iter().filter(|s| !s.success).count();
    println!();
    println!("{} store(s) migrated, {} failed", summaries.len() - failed, failed);
}

#[cfg(test)]
#[path = "fleet_test.rs"]
mod tests;
