//! Migrate command implementation

use anyhow::Result;
use tm_run::Target;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::run_to_target;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    if args.steps == 0 {
        println!("Nothing to do");
        return Ok(());
    }
    run_to_target(global, Target::Relative(args.steps), args.output.output).await
}
