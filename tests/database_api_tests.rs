/// Database API tests
///
/// Tables, sessions, scans, column deletes and concurrent writers, driven
/// through the public `Database` facade.
/// Run with: cargo test --test database_api_tests

use rustcelldb::{
    Column, DataType, Database, DbError, EngineConfig, ManualClock, MutationRequest, QueryResult,
    ReadRequest, Result, Statement, TableSchema, Value,
};
use std::sync::Arc;
use tokio::sync::Barrier;

const T0: i64 = 1_700_000_000_000_000;

async fn database() -> Result<(Database, Arc<ManualClock>)> {
    let clock = Arc::new(ManualClock::new(T0));
    let db = Database::with_clock(EngineConfig::new().node_id(3), clock.clone())?;
    db.create_table(TableSchema::new(
        "events",
        vec![
            Column::new("device", DataType::Text).partition_key(),
            Column::new("seq", DataType::Integer).clustering(),
            Column::new("reading", DataType::Float),
            Column::new("note", DataType::Text),
        ],
    )?)
    .await?;
    Ok((db, clock))
}

fn event(device: &str, seq: i64, reading: f64) -> MutationRequest {
    MutationRequest::insert("events")
        .key("device", device)
        .key("seq", seq)
        .value("reading", reading)
}

#[tokio::test]
async fn test_create_and_drop_table() -> Result<()> {
    let (db, _clock) = database().await?;
    assert!(db.table_exists("events").await);
    assert_eq!(db.list_tables().await, vec!["events".to_string()]);

    let duplicate = TableSchema::new(
        "events",
        vec![Column::new("id", DataType::Integer).partition_key()],
    )?;
    assert_eq!(
        db.create_table(duplicate).await,
        Err(DbError::TableExists("events".into()))
    );

    db.drop_table("events").await?;
    assert!(!db.table_exists("events").await);
    assert!(matches!(
        db.mutate(event("a", 1, 1.0)).await,
        Err(DbError::TableNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_partition_scan_in_clustering_order() -> Result<()> {
    let (db, _clock) = database().await?;
    let session = db.session();

    for seq in [3, 1, 2] {
        session.mutate(event("a", seq, seq as f64)).await?;
    }
    session.mutate(event("b", 1, 10.0)).await?;

    let rows = session
        .read(ReadRequest::new("events").partition("device", "a"))
        .await?;
    let seqs: Vec<_> = rows.rows.iter().map(|r| r.get("seq").cloned()).collect();
    assert_eq!(
        seqs,
        vec![
            Some(Value::from(1)),
            Some(Value::from(2)),
            Some(Value::from(3))
        ]
    );

    let all = session.read(ReadRequest::new("events")).await?;
    assert_eq!(all.row_count(), 4);
    assert_eq!(all.columns, vec!["device", "seq", "reading", "note"]);

    Ok(())
}

#[tokio::test]
async fn test_column_delete_keeps_row() -> Result<()> {
    let (db, _clock) = database().await?;
    let session = db.session();

    session
        .mutate(event("a", 1, 1.5).value("note", "calibrated"))
        .await?;
    session
        .mutate(
            MutationRequest::delete("events")
                .key("device", "a")
                .key("seq", 1)
                .column("note"),
        )
        .await?;

    let rows = session
        .read(ReadRequest::new("events").key("device", "a").key("seq", 1))
        .await?;
    let row = rows.first().expect("marker keeps the row");
    assert!(row.is_null("note"));
    assert_eq!(row.get("reading"), Some(&Value::from(1.5)));

    Ok(())
}

#[tokio::test]
async fn test_validation_errors_leave_no_trace() -> Result<()> {
    let (db, _clock) = database().await?;
    let session = db.session();

    let wrong_type = MutationRequest::insert("events")
        .key("device", "a")
        .key("seq", 1)
        .value("reading", "hot");
    assert!(matches!(
        session.mutate(wrong_type).await,
        Err(DbError::TypeMismatch(_))
    ));

    let missing_key = MutationRequest::insert("events")
        .key("device", "a")
        .value("reading", 1.0);
    assert!(matches!(
        session.mutate(missing_key).await,
        Err(DbError::InvalidRequest(_))
    ));

    let unknown = event("a", 1, 1.0).value("nope", 1);
    assert!(matches!(
        session.mutate(unknown).await,
        Err(DbError::ColumnNotFound(_, _))
    ));

    assert!(session.read(ReadRequest::new("events")).await?.is_empty());
    assert_eq!(db.table_stats("events").await?.row_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_statement_dispatch() -> Result<()> {
    let (db, _clock) = database().await?;

    let outcome = db
        .execute(Statement::from(event("a", 1, 2.0)))
        .await?;
    let QueryResult::Mutation(outcome) = outcome else {
        panic!("expected a mutation outcome");
    };
    assert_eq!(outcome.stats.applied, 2);
    assert!(outcome.write_time >= T0);

    let rows = db
        .execute(ReadRequest::new("events").column("reading"))
        .await?
        .into_rows()
        .expect("rows");
    assert_eq!(rows.first().and_then(|r| r.get("reading")), Some(&Value::from(2.0)));

    Ok(())
}

#[tokio::test]
async fn test_sessions_never_tie() -> Result<()> {
    let (db, _clock) = database().await?;
    let first = db.session();
    let second = db.session();

    // Same frozen clock reading, same explicit write-time.
    first
        .mutate(event("a", 1, 1.0).using_timestamp(5000))
        .await?;
    second
        .mutate(event("a", 1, 2.0).using_timestamp(5000))
        .await?;

    let rows = first.read(ReadRequest::new("events").writetime("reading")).await?;
    let row = rows.first().expect("row");
    assert_eq!(row.writetime("reading"), Some(5000));
    // Equal proposal times: the higher origin breaks the tie.
    assert_eq!(row.get("reading"), Some(&Value::from(2.0)));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_writers_converge_on_highest_timestamp() -> Result<()> {
    let (db, _clock) = database().await?;
    let num_tasks = 8;
    let barrier = Arc::new(Barrier::new(num_tasks));

    let mut handles = vec![];
    for task_id in 0..num_tasks {
        let session = db.session();
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            for i in 0..20 {
                let ts = (task_id * 100 + i) as i64;
                session
                    .mutate(event("shared", 1, ts as f64).using_timestamp(ts))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let rows = db
        .read(ReadRequest::new("events").writetime("reading"))
        .await?;
    let row = rows.first().expect("row");
    assert_eq!(row.get("reading"), Some(&Value::from(719.0)));
    assert_eq!(row.writetime("reading"), Some(719));

    Ok(())
}

#[tokio::test]
async fn test_read_time_is_fixed_per_request() -> Result<()> {
    let (db, clock) = database().await?;
    let session = db.session();

    session.mutate(event("a", 1, 1.0).using_ttl(1)).await?;
    session.mutate(event("a", 2, 2.0).using_ttl(3)).await?;
    clock.advance(std::time::Duration::from_secs(2));

    // An explicit read time looks back before the expiry.
    let past = session
        .read(ReadRequest::new("events").at(T0 + 500_000))
        .await?;
    assert_eq!(past.row_count(), 2);
    assert_eq!(past.read_time, T0 + 500_000);

    let now = session.read(ReadRequest::new("events")).await?;
    assert_eq!(now.row_count(), 1);
    assert_eq!(now.read_time, T0 + 2_000_000);

    Ok(())
}

#[tokio::test]
async fn test_result_rendering() -> Result<()> {
    let (db, _clock) = database().await?;
    db.mutate(event("a", 1, 1.5)).await?;

    let rows = db.read(ReadRequest::new("events")).await?;
    let rendered = rows.to_string();
    assert!(rendered.contains("device"));
    assert!(rendered.contains("1 row(s)"));

    let json = rows.to_json().map_err(DbError::from)?;
    assert!(json.contains("\"reading\""));

    Ok(())
}

#[test]
fn test_config_from_json() -> Result<()> {
    let config = EngineConfig::from_json(r#"{ "node_id": 12, "max_ttl_seconds": 60 }"#)?;
    assert_eq!(config, EngineConfig::new().node_id(12).max_ttl_seconds(60));
    Ok(())
}

#[tokio::test]
async fn test_configured_ttl_ceiling() -> Result<()> {
    let clock = Arc::new(ManualClock::new(T0));
    let db = Database::with_clock(EngineConfig::new().max_ttl_seconds(60), clock)?;
    db.create_table(TableSchema::new(
        "short",
        vec![
            Column::new("id", DataType::Integer).partition_key(),
            Column::new("v", DataType::Integer),
        ],
    )?)
    .await?;

    let request = |ttl| {
        MutationRequest::insert("short")
            .key("id", 1)
            .value("v", 1)
            .using_ttl(ttl)
    };
    assert!(db.mutate(request(60)).await.is_ok());
    assert!(matches!(
        db.mutate(request(61)).await,
        Err(DbError::InvalidTtl(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_integer_literals_widen_in_float_columns() -> Result<()> {
    let clock = Arc::new(ManualClock::new(T0));
    let db = Database::with_clock(EngineConfig::new(), clock)?;
    db.create_table(TableSchema::new(
        "gauges",
        vec![
            Column::new("k", DataType::Float).partition_key(),
            Column::new("level", DataType::Float),
        ],
    )?)
    .await?;

    db.mutate(
        MutationRequest::insert("gauges")
            .key("k", 1)
            .value("level", 7),
    )
    .await?;

    let rows = db.read(ReadRequest::new("gauges").key("k", 1.0)).await?;
    let row = rows.first().expect("integer and float keys address one row");
    assert_eq!(row.get("k"), Some(&Value::Float(1.0)));
    assert_eq!(row.get("level"), Some(&Value::Float(7.0)));

    // Writing through the float spelling updates the same row.
    db.mutate(
        MutationRequest::update("gauges")
            .key("k", 1.0)
            .value("level", 8.5),
    )
    .await?;
    let all = db.read(ReadRequest::new("gauges")).await?;
    assert_eq!(all.row_count(), 1);
    assert_eq!(all.first().and_then(|r| r.get("level")), Some(&Value::Float(8.5)));

    Ok(())
}

#[tokio::test]
async fn test_writetime_scan_fails_on_any_null_cell() -> Result<()> {
    let (db, _clock) = database().await?;
    let session = db.session();

    session
        .mutate(event("a", 1, 1.0).value("note", "set").using_timestamp(1000))
        .await?;
    session.mutate(event("a", 2, 2.0).using_timestamp(2000)).await?;

    let scan = ReadRequest::new("events").partition("device", "a");
    assert_eq!(
        session.read(scan.clone().writetime("note")).await,
        Err(DbError::NoValue("note".into()))
    );

    let rows = session.read(scan.writetime("reading").ttl("note")).await?;
    let writetimes: Vec<_> = rows.rows.iter().map(|r| r.writetime("reading")).collect();
    assert_eq!(writetimes, vec![Some(1000), Some(2000)]);
    assert!(rows.rows.iter().all(|r| r.ttl("note").is_none()));

    Ok(())
}
