use super::*;
use tempfile::TempDir;
use tm_core::{Direction, Version};

fn file(version: Version, direction: Direction, sql: &str) -> MigrationFile {
    MigrationFile::new(
        "/m",
        format!("{version}_t.{direction}.sql"),
        version,
        "t",
        direction,
        sql,
    )
}

fn files() -> Arc<Vec<MigrationFile>> {
    Arc::new(vec![
        file(1, Direction::Up, "CREATE TABLE one (id INTEGER);"),
        file(1, Direction::Down, "DROP TABLE one;"),
        file(2, Direction::Up, "CREATE TABLE two (id INTEGER);"),
        file(2, Direction::Down, "DROP TABLE two;"),
    ])
}

fn url(scheme: &str, dir: &TempDir, name: &str) -> ConnectionUrl {
    let path = dir.path().join(name);
    ConnectionUrl::parse(&format!("{scheme}://{}", path.display())).unwrap()
}

async fn versions_at(registry: &DriverRegistry, url: &ConnectionUrl) -> Vec<Version> {
    let driver = registry.connect(url).await.unwrap();
    let versions = driver.versions().await.unwrap();
    driver.close().await.unwrap();
    versions
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fleet_brings_every_store_to_latest() {
    let dir = TempDir::new().unwrap();
    let registry = DriverRegistry::with_defaults();
    let stores = vec![
        ("a".to_string(), url("duckdb", &dir, "a.duckdb")),
        ("b".to_string(), url("sqlite", &dir, "b.sqlite")),
        ("c".to_string(), url("duckdb", &dir, "c.duckdb")),
    ];

    let outcomes = migrate_fleet(&registry, stores.clone(), files(), Target::Latest, 2).await;

    assert_eq!(
        outcomes.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
    assert!(outcomes.iter().all(StoreOutcome::is_success));
    for (_, url) in &stores {
        assert_eq!(versions_at(&registry, url).await, vec![1, 2]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fleet_failures_stay_per_store() {
    let dir = TempDir::new().unwrap();
    let registry = DriverRegistry::with_defaults();
    let healthy = url("sqlite", &dir, "healthy.sqlite");
    let drifted = url("sqlite", &dir, "drifted.sqlite");

    // A hand-made table makes version 2 fail on this store only
    create_drifted_table(&registry, &drifted).await;

    let stores = vec![
        ("healthy".to_string(), healthy.clone()),
        ("drifted".to_string(), drifted.clone()),
        (
            "unknown".to_string(),
            ConnectionUrl::parse("postgres://localhost/db").unwrap(),
        ),
    ];
    let outcomes = migrate_fleet(&registry, stores, files(), Target::Latest, 4).await;

    assert!(outcomes[0].is_success());

    let drifted_report = outcomes[1].result.as_ref().unwrap();
    assert!(!drifted_report.is_success());
    assert_eq!(drifted_report.applied_versions(), vec![1]);
    assert_eq!(drifted_report.failure().unwrap().version, 2);

    assert!(matches!(
        outcomes[2].result,
        Err(RunError::Db(DbError::UnknownScheme { .. }))
    ));

    assert_eq!(versions_at(&registry, &healthy).await, vec![1, 2]);
    assert_eq!(versions_at(&registry, &drifted).await, vec![1]);
}

/// Create table `two` through a migration the fleet never sees
async fn create_drifted_table(registry: &DriverRegistry, url: &ConnectionUrl) {
    let driver = registry.connect(url).await.unwrap();
    let setup = file(99, Direction::Up, "CREATE TABLE two (id INTEGER);");
    let errors = tm_db::dispatch(&driver, setup).errors().await;
    assert!(errors.is_empty());
    let down = file(99, Direction::Down, "");
    let errors = tm_db::dispatch(&driver, down).errors().await;
    assert!(errors.is_empty());
    driver.close().await.unwrap();
}

#[tokio::test]
async fn test_fleet_connection_error_reported() {
    let registry = DriverRegistry::with_defaults();
    let stores = vec![(
        "broken".to_string(),
        ConnectionUrl::parse("duckdb:///no/such/dir/store.duckdb").unwrap(),
    )];
    let outcomes = migrate_fleet(&registry, stores, files(), Target::Latest, 1).await;
    assert!(matches!(
        outcomes[0].result,
        Err(RunError::Db(DbError::ConnectionError(_)))
    ));
}

#[tokio::test]
async fn test_fleet_with_no_stores() {
    let registry = DriverRegistry::with_defaults();
    let outcomes = migrate_fleet(&registry, Vec::new(), files(), Target::Zero, 0).await;
    assert!(outcomes.is_empty());
}
