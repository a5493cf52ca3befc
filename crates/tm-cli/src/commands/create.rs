//! Create command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use tm_core::create_migration_pair;
use tm_core::loader::timestamp_version;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{load_config, migrations_dir};

/// Execute the create command
pub async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let dir = migrations_dir(global, &config);
    let version = args.version.unwrap_or_else(|| timestamp_version(Utc::now()));

    let (up, down) = create_migration_pair(&dir, &args.name, version)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!("Created migration {}", version);
    println!("  {}", up.display());
    println!("  {}", down.display());
    Ok(())
}
