//! Goto command implementation

use anyhow::Result;
use tm_run::Target;

use crate::cli::{GlobalArgs, GotoArgs};
use crate::commands::common::run_to_target;

/// Execute the goto command
pub async fn execute(args: &GotoArgs, global: &GlobalArgs) -> Result<()> {
    let target = match args.version {
        0 => Target::Zero,
        version => Target::Version(version),
    };
    run_to_target(global, target, args.output.output).await
}
