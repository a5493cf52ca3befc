use super::*;
use duckdb::Connection;

fn memory() -> Connection {
    Connection::open_in_memory().unwrap()
}

#[test]
fn test_classify_column_types() {
    assert_eq!(LedgerLayout::from_column_type("BIGINT"), LedgerLayout::Current);
    assert_eq!(LedgerLayout::from_column_type("bigint"), LedgerLayout::Current);
    assert_eq!(
        LedgerLayout::from_column_type("BIGINT UNSIGNED"),
        LedgerLayout::Current
    );
    assert_eq!(LedgerLayout::from_column_type("INTEGER"), LedgerLayout::Legacy);
    assert_eq!(LedgerLayout::from_column_type("int(11)"), LedgerLayout::Legacy);
    assert_eq!(LedgerLayout::from_column_type("VARCHAR"), LedgerLayout::Legacy);
}

#[test]
fn test_classify_by_affinity() {
    assert_eq!(LedgerLayout::from_affinity("INTEGER"), LedgerLayout::Current);
    assert_eq!(LedgerLayout::from_affinity("int"), LedgerLayout::Current);
    assert_eq!(LedgerLayout::from_affinity("BIGINT"), LedgerLayout::Current);
    assert_eq!(LedgerLayout::from_affinity("VARCHAR(14)"), LedgerLayout::Legacy);
    assert_eq!(LedgerLayout::from_affinity("TEXT"), LedgerLayout::Legacy);
}

#[test]
fn test_version_conversion_bounds() {
    assert_eq!(to_stored(20060102150405).unwrap(), 20060102150405);
    assert!(matches!(
        to_stored(u64::MAX),
        Err(DbError::InvalidVersion(_))
    ));
    assert_eq!(from_stored(7).unwrap(), 7);
    assert!(matches!(from_stored(-1), Err(DbError::InvalidVersion(_))));
}

#[test]
fn test_mutation_sql_per_direction() {
    assert!(mutation_sql(Direction::Up).starts_with("INSERT OR IGNORE"));
    assert!(mutation_sql(Direction::Down).starts_with("DELETE"));
}

#[test]
fn test_probe_and_create() {
    let conn = memory();
    assert_eq!(probe(&conn).unwrap(), LedgerLayout::Absent);
    assert_eq!(ensure_ledger(&conn).unwrap(), LedgerLayout::Absent);
    assert_eq!(probe(&conn).unwrap(), LedgerLayout::Current);
    // Second run is a no-op
    assert_eq!(ensure_ledger(&conn).unwrap(), LedgerLayout::Current);
    assert!(read_versions(&conn).unwrap().is_empty());
    assert_eq!(read_latest(&conn).unwrap(), None);
}

#[test]
fn test_probe_table_without_version_column() {
    let conn = memory();
    conn.execute_batch("CREATE TABLE schema_migrations (id INTEGER)")
        .unwrap();
    assert!(matches!(
        ensure_ledger(&conn),
        Err(DbError::SchemaUpgradeError(_))
    ));
}

#[test]
fn test_upgrade_keeps_every_legacy_row() {
    let conn = memory();
    conn.execute_batch(
        "CREATE TABLE schema_migrations (version INTEGER NOT NULL PRIMARY KEY);
         INSERT INTO schema_migrations VALUES (9), (3);",
    )
    .unwrap();

    assert_eq!(ensure_ledger(&conn).unwrap(), LedgerLayout::Legacy);
    assert_eq!(probe(&conn).unwrap(), LedgerLayout::Current);
    assert_eq!(read_versions(&conn).unwrap(), vec![3, 9]);
    assert_eq!(read_latest(&conn).unwrap(), Some(9));
}

#[test]
fn test_upgrade_collapses_duplicate_legacy_rows() {
    let conn = memory();
    conn.execute_batch(
        "CREATE TABLE schema_migrations (version VARCHAR);
         INSERT INTO schema_migrations VALUES ('20060102150405'), ('20060102150405'), (NULL);",
    )
    .unwrap();

    assert_eq!(ensure_ledger(&conn).unwrap(), LedgerLayout::Legacy);
    assert_eq!(read_versions(&conn).unwrap(), vec![20060102150405]);
}

#[test]
fn test_upgrade_of_empty_legacy_table() {
    let conn = memory();
    conn.execute_batch("CREATE TABLE schema_migrations (version INTEGER NOT NULL PRIMARY KEY)")
        .unwrap();
    ensure_ledger(&conn).unwrap();
    assert_eq!(probe(&conn).unwrap(), LedgerLayout::Current);
    assert!(read_versions(&conn).unwrap().is_empty());
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let conn = memory();
    conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result: DbResult<()> = transaction(&conn, DbError::LedgerConsistencyError, |s| {
        s.run_batch("INSERT INTO t VALUES (1)")
            .map_err(DbError::LedgerConsistencyError)?;
        Err(DbError::TaskFailed("abort".to_string()))
    });
    assert!(matches!(result, Err(DbError::TaskFailed(_))));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_apply_rejects_out_of_range_version_before_touching_store() {
    let conn = memory();
    ensure_ledger(&conn).unwrap();
    let file = MigrationFile::new(
        "/m",
        "big.up.sql",
        u64::MAX,
        "big",
        Direction::Up,
        "CREATE TABLE never (id INTEGER);",
    );
    assert!(matches!(
        apply_migration(&conn, &file),
        Err(DbError::InvalidVersion(_))
    ));
    let never: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'never'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(never, 0);
}

#[test]
fn test_apply_rejects_non_utf8_script() {
    let conn = memory();
    ensure_ledger(&conn).unwrap();
    let file = MigrationFile::new("/m", "1_bin.up.sql", 1, "bin", Direction::Up, vec![0xff, 0xfe]);
    assert!(matches!(
        apply_migration(&conn, &file),
        Err(DbError::ScriptExecutionError { .. })
    ));
    assert!(read_versions(&conn).unwrap().is_empty());
}

#[test]
fn test_empty_script_still_records_version() {
    let conn = memory();
    ensure_ledger(&conn).unwrap();
    let file = MigrationFile::new("/m", "4_noop.up.sql", 4, "noop", Direction::Up, "  \n");
    apply_migration(&conn, &file).unwrap();
    assert_eq!(read_versions(&conn).unwrap(), vec![4]);
}
