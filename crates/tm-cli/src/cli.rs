//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - versioned schema migrations for DuckDB and SQLite stores
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Connection URL (`scheme://params`), overrides config
    #[arg(short, long, global = true, env = "TIDEMARK_URL")]
    pub url: Option<String>,

    /// Named target from config
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override migrations directory
    #[arg(short, long, global = true)]
    pub migrations: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty up/down migration pair
    Create(CreateArgs),

    /// Apply all pending migrations
    Up(ApplyArgs),

    /// Revert all applied migrations
    Down(ApplyArgs),

    /// Revert the latest migration and apply it again
    Redo(ApplyArgs),

    /// Apply (n > 0) or revert (n < 0) n migrations
    Migrate(MigrateArgs),

    /// Move the store to a specific version
    Goto(GotoArgs),

    /// Print the latest applied version
    Version(OutputArgs),

    /// Print every applied version
    Versions(OutputArgs),

    /// Apply all pending migrations to every configured target
    Fleet(FleetArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name (letters, digits, underscores, dashes)
    pub name: String,

    /// Explicit version instead of the current UTC timestamp
    #[arg(long = "set-version")]
    pub version: Option<u64>,
}

/// Output format selection
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments shared by batch commands
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Number of steps; negative values revert
    #[arg(allow_negative_numbers = true)]
    pub steps: i64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the goto command
#[derive(Args, Debug)]
pub struct GotoArgs {
    /// Target version; 0 reverts everything
    pub version: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the fleet command
#[derive(Args, Debug)]
pub struct FleetArgs {
    /// Targets to migrate (comma-separated, default: all configured)
    #[arg(long)]
    pub targets: Option<String>,

    /// Maximum stores migrated concurrently (default: config `threads`)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
