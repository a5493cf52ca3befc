//! Redo command implementation

use anyhow::{Context, Result};
use std::sync::Arc;
use tm_run::Orchestrator;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{close_quietly, connect, finish_batch, load_config, load_migrations};

/// Execute the redo command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let files = load_migrations(global, &config)?;
    let driver = connect(global, &config).await?;

    let result = Orchestrator::new(Arc::clone(&driver)).redo(&files).await;
    close_quietly(&driver).await;

    let report = result.context("Failed to plan redo")?;
    finish_batch(&report, args.output.output)
}
