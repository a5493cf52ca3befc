//! Up command implementation

use anyhow::Result;
use tm_run::Target;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::run_to_target;

/// Execute the up command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    run_to_target(global, Target::Latest, args.output.output).await
}
