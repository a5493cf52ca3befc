//! Versions command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputArgs, OutputFormat};
use crate::commands::common::{close_quietly, connect, load_config, print_json};

/// Execute the versions command
pub async fn execute(args: &OutputArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let driver = connect(global, &config).await?;
    let result = driver.versions().await;
    close_quietly(&driver).await;
    let versions = result.context("Failed to read versions")?;

    match args.output {
        OutputFormat::Json => print_json(&versions)?,
        OutputFormat::Text if versions.is_empty() => println!("No migrations applied"),
        OutputFormat::Text => {
            for version in &versions {
                println!("{}", version);
            }
        }
    }
    Ok(())
}
