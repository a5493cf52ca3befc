use super::*;

fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("tidemark.yml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_defaults_when_fields_missing() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.migrations_path, "migrations");
    assert_eq!(config.threads, 4);
    assert!(config.url.is_none());
    assert!(config.targets.is_empty());
}

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
migrations_path: db/migrations
url: "duckdb://dev.duckdb"
threads: 2
targets:
  staging:
    url: "sqlite://staging.sqlite"
  prod:
    url: "duckdb://prod.duckdb"
"#,
    );

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.threads, 2);
    assert_eq!(
        config.migrations_dir(dir.path()),
        dir.path().join("db/migrations")
    );
    assert_eq!(config.resolve_url(None).unwrap().scheme(), "duckdb");
    let staging = config.resolve_url(Some("staging")).unwrap();
    assert_eq!(staging.scheme(), "sqlite");
    assert_eq!(staging.params(), "staging.sqlite");
}

#[test]
fn test_load_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.migrations_path, "migrations");
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(&dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_unknown_fields_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "migration_path: typo\n");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_zero_threads_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "threads: 0\n");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_bad_target_url_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "targets:\n  broken:\n    url: not-a-url\n",
    );
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_resolve_unknown_target_lists_available() {
    let mut config = Config::default();
    config.targets.insert(
        "dev".to_string(),
        TargetConfig {
            url: "duckdb://:memory:".to_string(),
        },
    );
    let err = config.resolve_url(Some("prod")).unwrap_err();
    assert!(err.to_string().contains("available: dev"));
}

#[test]
fn test_resolve_without_url_fails() {
    let err = Config::default().resolve_url(None).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}
