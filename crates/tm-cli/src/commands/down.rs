//! Down command implementation

use anyhow::Result;
use tm_run::Target;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::run_to_target;

/// Execute the down command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    run_to_target(global, Target::Zero, args.output.output).await
}
