use super::*;
use std::time::Duration;
use tempfile::TempDir;
use tm_core::Direction;

fn global(dir: &TempDir) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.path().display().to_string(),
        config: None,
        url: None,
        target: None,
        migrations: None,
    }
}

fn write_project(dir: &TempDir, store: &str) {
    std::fs::write(
        dir.path().join("tidemark.yml"),
        format!(
            "url: \"sqlite://{}\"\ntargets:\n  other:\n    url: \"duckdb://:memory:\"\n",
            dir.path().join(store).display()
        ),
    )
    .unwrap();
    let migrations = dir.path().join("migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::write(migrations.join("1_users.up.sql"), "CREATE TABLE users (id INTEGER);").unwrap();
    std::fs::write(migrations.join("1_users.down.sql"), "DROP TABLE users;").unwrap();
    std::fs::write(migrations.join("2_bad.up.sql"), "CREATE TABLE users (id INTEGER);").unwrap();
    std::fs::write(migrations.join("2_bad.down.sql"), "").unwrap();
}

#[test]
fn test_url_precedence() {
    let dir = TempDir::new().unwrap();
    write_project(&dir, "store.sqlite");
    let mut args = global(&dir);
    let config = load_config(&args).unwrap();

    assert_eq!(resolve_url(&args, &config).unwrap().scheme(), "sqlite");

    args.target = Some("other".to_string());
    assert_eq!(resolve_url(&args, &config).unwrap().scheme(), "duckdb");

    args.url = Some("sqlite://:memory:".to_string());
    assert_eq!(
        resolve_url(&args, &config).unwrap().to_string(),
        "sqlite://:memory:"
    );

    args.url = Some("not a url".to_string());
    assert!(resolve_url(&args, &config).is_err());
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let args = global(&dir);
    let config = load_config(&args).unwrap();
    assert_eq!(migrations_dir(&args, &config), dir.path().join("migrations"));
    assert!(resolve_url(&args, &config).is_err());
}

#[test]
fn test_migrations_override() {
    let dir = TempDir::new().unwrap();
    let mut args = global(&dir);
    args.migrations = Some("/elsewhere".to_string());
    let config = load_config(&args).unwrap();
    assert_eq!(migrations_dir(&args, &config), PathBuf::from("/elsewhere"));
}

#[test]
fn test_summarize_lists_skipped_last() {
    let report = BatchReport {
        steps: vec![StepReport {
            version: 1,
            direction: Direction::Up,
            file_name: "1_a.up.sql".to_string(),
            notices: vec!["applying 1_a.up.sql".to_string()],
            errors: Vec::new(),
            duration: Duration::from_millis(3),
        }],
        skipped: vec!["2_b.up.sql".to_string()],
    };

    let summary = summarize(&report);
    assert_eq!(summary.len(), 2);
    assert!(matches!(summary[0].status, StepStatus::Success));
    assert_eq!(summary[0].duration_ms, 3);
    assert!(matches!(summary[1].status, StepStatus::Skipped));
    assert_eq!(summary[1].version, None);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json[1]["status"], "skipped");
    assert_eq!(json[0]["direction"], "up");
}

#[tokio::test]
async fn test_run_to_target_halts_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write_project(&dir, "store.sqlite");
    let args = global(&dir);

    let err = run_to_target(&args, Target::Latest, OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<ExitCode>(), Some(ExitCode(1))));

    let config = load_config(&args).unwrap();
    let driver = connect(&args, &config).await.unwrap();
    assert_eq!(driver.versions().await.unwrap(), vec![1]);
    driver.close().await.unwrap();

    run_to_target(&args, Target::Zero, OutputFormat::Text)
        .await
        .unwrap();
    let driver = connect(&args, &config).await.unwrap();
    assert!(driver.versions().await.unwrap().is_empty());
    driver.close().await.unwrap();
}
