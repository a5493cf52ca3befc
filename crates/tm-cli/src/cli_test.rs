use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_migrate_accepts_negative_steps() {
    let cli = Cli::try_parse_from(["tidemark", "migrate", "-2"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => assert_eq!(args.steps, -2),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tidemark",
        "versions",
        "--url",
        "sqlite://:memory:",
        "-o",
        "json",
        "--verbose",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.url.as_deref(), Some("sqlite://:memory:"));
    match cli.command {
        Commands::Versions(args) => assert_eq!(args.output, OutputFormat::Json),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_create_with_explicit_version() {
    let cli =
        Cli::try_parse_from(["tidemark", "create", "add_users", "--set-version", "7"]).unwrap();
    match cli.command {
        Commands::Create(args) => {
            assert_eq!(args.name, "add_users");
            assert_eq!(args.version, Some(7));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_goto_rejects_negative_version() {
    assert!(Cli::try_parse_from(["tidemark", "goto", "-1"]).is_err());
}

#[test]
fn test_fleet_defaults() {
    let cli = Cli::try_parse_from(["tidemark", "fleet"]).unwrap();
    match cli.command {
        Commands::Fleet(args) => {
            assert!(args.targets.is_none());
            assert!(args.threads.is_none());
            assert_eq!(args.output.output, OutputFormat::Text);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
