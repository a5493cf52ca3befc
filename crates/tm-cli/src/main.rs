//! Tidemark CLI - versioned schema migrations for DuckDB and SQLite stores

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{common, create, down, fleet, goto, migrate, redo, up, version, versions};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match run(&cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(code) = err.downcast_ref::<common::ExitCode>() {
                return std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1));
            }
            eprintln!("Error: {:#}", err);
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Create(args) => create::execute(args, &cli.global).await,
        Commands::Up(args) => up::execute(args, &cli.global).await,
        Commands::Down(args) => down::execute(args, &cli.global).await,
        Commands::Redo(args) => redo::execute(args, &cli.global).await,
        Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        Commands::Goto(args) => goto::execute(args, &cli.global).await,
        Commands::Version(args) => version::execute(args, &cli.global).await,
        Commands::Versions(args) => versions::execute(args, &cli.global).await,
        Commands::Fleet(args) => fleet::execute(args, &cli.global).await,
    }
}

/// `RUST_LOG` wins; otherwise `info` with --verbose and `warn` without
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
