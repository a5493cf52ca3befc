//! Version command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputArgs, OutputFormat};
use crate::commands::common::{close_quietly, connect, load_config, print_json};

#[derive(Serialize)]
struct VersionOutput {
    version: Option<u64>,
}

/// Execute the version command
pub async fn execute(args: &OutputArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let driver = connect(global, &config).await?;
    let result = driver.version().await;
    close_quietly(&driver).await;
    let version = result.context("Failed to read version")?;

    match args.output {
        OutputFormat::Json => print_json(&VersionOutput { version })?,
        OutputFormat::Text => match version {
            Some(v) => println!("{}", v),
            None => println!("No migrations applied"),
        },
    }
    Ok(())
}
