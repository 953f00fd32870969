//! Gateway Scenario Tests
//!
//! Run against a live Postgres named by `TABLEGATE_TEST_DATABASE_URL`.
//! Each test skips when the variable is unset. Table names carry a random
//! suffix so concurrent runs and leftovers never collide.

use serde_json::json;
use uuid::Uuid;

use tablegate::gateway::{ColumnMap, GatewayError, Operation, PoolSettings, TableGateway};

fn database_url() -> Option<String> {
    match std::env::var("TABLEGATE_TEST_DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("TABLEGATE_TEST_DATABASE_URL not set, skipping");
            None
        }
    }
}

async fn gateway() -> Option<TableGateway> {
    let url = database_url()?;
    Some(
        TableGateway::connect(&url, "public", &PoolSettings::default())
            .await
            .expect("test database reachable"),
    )
}

/// Run setup SQL the gateway has no operation for (enum types)
async fn run_sql(sql: &str) {
    let url = database_url().expect("checked by gateway()");
    let pool = sqlx::PgPool::connect(&url).await.expect("test database reachable");
    sqlx::query(sql).execute(&pool).await.expect("setup statement");
    pool.close().await;
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

fn map(pairs: &[(&str, &str)]) -> ColumnMap {
    pairs.iter().copied().collect()
}

// =============================================================================
// CATALOG PROPERTIES
// =============================================================================

/// After create, the table and its column are visible in the catalog.
#[tokio::test]
async fn test_create_is_visible_in_catalog() {
    let Some(gw) = gateway().await else { return };
    let table = unique("created");

    gw.create_table(&table, &map(&[("id", "INTEGER"), ("note", "TEXT")]))
        .await
        .unwrap();

    assert!(gw.list_tables().await.unwrap().contains(&table));
    assert_eq!(gw.list_columns(&table).await.unwrap(), vec!["id", "note"]);

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// Drop is idempotent and the table never reappears.
#[tokio::test]
async fn test_drop_is_idempotent() {
    let Some(gw) = gateway().await else { return };
    let table = unique("dropped");

    gw.create_table(&table, &map(&[("id", "INTEGER")])).await.unwrap();
    gw.drop_table(&table).await.unwrap();
    gw.drop_table(&table).await.unwrap();

    assert!(!gw.list_tables().await.unwrap().contains(&table));
    gw.close().await;
}

/// Columns of an absent table are an empty list, not an error.
#[tokio::test]
async fn test_columns_of_missing_table_are_empty() {
    let Some(gw) = gateway().await else { return };
    let columns = gw.list_columns(&unique("absent")).await.unwrap();
    assert!(columns.is_empty());
    gw.close().await;
}

/// Mixed-case names round-trip through the catalog unchanged.
#[tokio::test]
async fn test_names_keep_their_case() {
    let Some(gw) = gateway().await else { return };
    let table = unique("Mixed");

    gw.create_table(&table, &map(&[("CamelCol", "TEXT")])).await.unwrap();
    assert!(gw.list_tables().await.unwrap().contains(&table));
    assert_eq!(gw.list_columns(&table).await.unwrap(), vec!["CamelCol"]);

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

// =============================================================================
// ROW PROPERTIES
// =============================================================================

/// Update matching nothing is Not-found; delete matching nothing is 0.
#[tokio::test]
async fn test_zero_match_outcomes() {
    let Some(gw) = gateway().await else { return };
    let table = unique("zero");

    gw.create_table(&table, &map(&[("id", "INTEGER"), ("city", "TEXT")]))
        .await
        .unwrap();

    let result = gw
        .update(&table, &map(&[("id", "99")]), &map(&[("city", "x")]))
        .await;
    assert!(matches!(result, Err(GatewayError::NoMatchingRecord)));

    assert_eq!(gw.delete(&table, &map(&[("id", "99")])).await.unwrap(), 0);

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// Type mismatches are engine faults with the engine's message.
#[tokio::test]
async fn test_type_mismatch_is_engine_fault() {
    let Some(gw) = gateway().await else { return };
    let table = unique("mismatch");

    gw.create_table(&table, &map(&[("id", "INTEGER")])).await.unwrap();
    let result = gw.insert(&table, &map(&[("id", "four")])).await;
    match result {
        Err(GatewayError::Engine(message)) => assert!(message.contains("integer")),
        other => panic!("expected engine fault, got {other:?}"),
    }

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// A value that looks like SQL is stored as plain text.
#[tokio::test]
async fn test_values_are_never_interpolated() {
    let Some(gw) = gateway().await else { return };
    let table = unique("values");
    let hostile = "x'); DROP TABLE pg_class; --";

    gw.create_table(&table, &map(&[("note", "TEXT")])).await.unwrap();
    gw.insert(&table, &map(&[("note", hostile)])).await.unwrap();

    let rows = gw.select_all(&table).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("note"), Some(&json!(hostile)));

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// A failing statement in a multi-statement request leaves nothing behind.
#[tokio::test]
async fn test_multi_statement_requests_are_atomic() {
    let Some(gw) = gateway().await else { return };
    let table = unique("atomic");

    gw.create_table(&table, &map(&[("a", "TEXT"), ("b", "TEXT")]))
        .await
        .unwrap();

    let result = gw
        .drop_columns(&table, &["a".to_string(), "missing".to_string()])
        .await;
    assert!(matches!(result, Err(GatewayError::Engine(_))));
    assert_eq!(gw.list_columns(&table).await.unwrap(), vec!["a", "b"]);

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

// =============================================================================
// END-TO-END SCENARIOS
// =============================================================================

/// create → insert → select → update → select → rename → drop column →
/// count, all through the unified operation model.
#[tokio::test]
async fn test_orders_lifecycle() {
    let Some(gw) = gateway().await else { return };
    let orders = unique("orders");
    let purchases = unique("purchases");

    Operation::CreateTable {
        table_name: orders.clone(),
        columns: map(&[("id", "INTEGER"), ("city", "VARCHAR(50)")]),
    }
    .dispatch(&gw)
    .await
    .unwrap();

    gw.insert(&orders, &map(&[("id", "4"), ("city", "Guangzhou")]))
        .await
        .unwrap();

    let rows = gw.select_all(&orders).await.unwrap();
    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        json!([{"id": 4, "city": "Guangzhou"}])
    );

    let affected = gw
        .update(&orders, &map(&[("id", "4")]), &map(&[("city", "Guangdong")]))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = gw.select_all(&orders).await.unwrap();
    assert_eq!(rows[0].get("city"), Some(&json!("Guangdong")));

    gw.rename_table(&orders, &purchases).await.unwrap();
    let tables = gw.list_tables().await.unwrap();
    assert!(tables.contains(&purchases));
    assert!(!tables.contains(&orders));
    assert_eq!(gw.select_all(&purchases).await.unwrap().len(), 1);

    gw.drop_columns(&purchases, &["city".to_string()]).await.unwrap();
    assert_eq!(gw.list_columns(&purchases).await.unwrap(), vec!["id"]);

    let output = Operation::Count {
        table_name: purchases.clone(),
    }
    .dispatch(&gw)
    .await
    .unwrap();
    assert_eq!(serde_json::to_value(output).unwrap()["count"], 1);

    gw.drop_table(&purchases).await.unwrap();
    gw.close().await;
}

/// Rename columns in payload order; a swap through a temporary name works.
#[tokio::test]
async fn test_rename_columns_in_order() {
    let Some(gw) = gateway().await else { return };
    let table = unique("renames");

    gw.create_table(&table, &map(&[("a", "TEXT"), ("b", "TEXT")]))
        .await
        .unwrap();
    gw.rename_columns(&table, &map(&[("a", "tmp"), ("b", "a"), ("tmp", "b")]))
        .await
        .unwrap();

    assert_eq!(gw.list_columns(&table).await.unwrap(), vec!["b", "a"]);

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// Summary with counts reports each table's columns and row count.
#[tokio::test]
async fn test_summary_with_counts() {
    let Some(gw) = gateway().await else { return };
    let full = unique("full");
    let empty = unique("empty");

    gw.create_table(&full, &map(&[("id", "INTEGER")])).await.unwrap();
    gw.create_table(&empty, &map(&[("id", "INTEGER")])).await.unwrap();
    for id in ["1", "2", "3"] {
        gw.insert(&full, &map(&[("id", id)])).await.unwrap();
    }

    let snapshot = gw.summarize(true).await.unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value[&full], json!({"columns": ["id"], "number_of_entries": 3}));
    assert_eq!(value[&empty], json!({"columns": ["id"], "number_of_entries": 0}));

    let snapshot = gw.summarize(false).await.unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value[&full], json!(["id"]));

    gw.drop_table(&full).await.unwrap();
    gw.drop_table(&empty).await.unwrap();
    gw.close().await;
}

// =============================================================================
// VALUE ROUND TRIPS
// =============================================================================

/// json and jsonb values are written as documents and read back parsed;
/// a jsonb condition matches the stored document.
#[tokio::test]
async fn test_json_columns_round_trip() {
    let Some(gw) = gateway().await else { return };
    let table = unique("documents");

    gw.create_table(
        &table,
        &map(&[("id", "INTEGER"), ("doc", "JSONB"), ("raw", "JSON")]),
    )
    .await
    .unwrap();

    let inserted = gw
        .insert(
            &table,
            &map(&[("id", "1"), ("doc", r#"{"a": 1}"#), ("raw", r#"{"b": [1, 2]}"#)]),
        )
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let rows = gw.select_all(&table).await.unwrap();
    assert_eq!(rows[0].get("doc"), Some(&json!({"a": 1})));
    assert_eq!(rows[0].get("raw"), Some(&json!({"b": [1, 2]})));

    let affected = gw
        .update(&table, &map(&[("doc", r#"{"a": 1}"#)]), &map(&[("doc", "[true, null]")]))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = gw.select_all(&table).await.unwrap();
    assert_eq!(rows[0].get("doc"), Some(&json!([true, null])));

    let result = gw.insert(&table, &map(&[("doc", "{not json")])).await;
    assert!(matches!(result, Err(GatewayError::Engine(_))));

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

/// Values of types without a JSON counterpart come back as the engine's
/// own text, never as null, and that text works as a condition again.
#[tokio::test]
async fn test_values_keep_the_engine_text() {
    let Some(gw) = gateway().await else { return };
    let table = unique("typed");
    let mood = unique("mood");

    run_sql(&format!("CREATE TYPE \"{}\" AS ENUM ('happy', 'sad')", mood)).await;
    gw.create_table(
        &table,
        &map(&[
            ("id", "SMALLINT"),
            ("amount", "NUMERIC"),
            ("ratio", "DOUBLE PRECISION"),
            ("span", "INTERVAL"),
            ("flags", "BOOLEAN[]"),
            ("points", "SMALLINT[]"),
            ("addr", "INET"),
            ("local_at", "TIMESTAMP"),
            ("at", "TIMESTAMPTZ"),
            ("feeling", mood.as_str()),
            ("active", "BOOLEAN"),
        ]),
    )
    .await
    .unwrap();

    gw.insert(
        &table,
        &map(&[
            ("id", "1"),
            ("amount", "NaN"),
            ("ratio", "NaN"),
            ("span", "1 day"),
            ("flags", "{true,false}"),
            ("points", "{1,2}"),
            ("addr", "10.0.0.1"),
            ("local_at", "2024-01-02 03:04:05.5"),
            ("at", "2024-01-02 03:04:05+00"),
            ("feeling", "happy"),
            ("active", "true"),
        ]),
    )
    .await
    .unwrap();
    gw.insert(
        &table,
        &map(&[
            ("id", "2"),
            ("amount", "123456789012345678901234567890.000000001"),
            ("ratio", "0.25"),
            ("feeling", "sad"),
        ]),
    )
    .await
    .unwrap();

    let rows = gw.select_all(&table).await.unwrap();
    assert_eq!(rows.len(), 2);
    let first = rows.iter().find(|r| r.get("id") == Some(&json!(1))).unwrap();
    let second = rows.iter().find(|r| r.get("id") == Some(&json!(2))).unwrap();

    assert_eq!(first.get("amount"), Some(&json!("NaN")));
    assert_eq!(first.get("ratio"), Some(&json!("NaN")));
    assert_eq!(first.get("span"), Some(&json!("1 day")));
    assert_eq!(first.get("flags"), Some(&json!("{t,f}")));
    assert_eq!(first.get("points"), Some(&json!("{1,2}")));
    assert_eq!(first.get("addr"), Some(&json!("10.0.0.1")));
    assert_eq!(first.get("local_at"), Some(&json!("2024-01-02 03:04:05.5")));
    assert_eq!(first.get("feeling"), Some(&json!("happy")));
    assert_eq!(first.get("active"), Some(&json!(true)));
    assert!(first.get("at").unwrap().is_string());

    assert_eq!(
        second.get("amount"),
        Some(&json!("123456789012345678901234567890.000000001"))
    );
    assert_eq!(second.get("ratio"), Some(&json!(0.25)));
    assert_eq!(second.get("span"), Some(&serde_json::Value::Null));

    let at = first.get("at").and_then(|v| v.as_str()).unwrap().to_string();
    let affected = gw
        .update(&table, &map(&[("at", at.as_str())]), &map(&[("feeling", "sad")]))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let deleted = gw.delete(&table, &map(&[("feeling", "sad")])).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(gw.count(&table).await.unwrap(), 0);

    gw.drop_table(&table).await.unwrap();
    run_sql(&format!("DROP TYPE \"{}\"", mood)).await;
    gw.close().await;
}

/// Delete reports how many rows its conditions matched.
#[tokio::test]
async fn test_delete_reports_matched_rows() {
    let Some(gw) = gateway().await else { return };
    let table = unique("deletes");

    gw.create_table(&table, &map(&[("id", "INTEGER"), ("city", "TEXT")]))
        .await
        .unwrap();
    for (id, city) in [("1", "Guangzhou"), ("2", "Guangzhou"), ("3", "Shenzhen")] {
        gw.insert(&table, &map(&[("id", id), ("city", city)])).await.unwrap();
    }

    let deleted = gw.delete(&table, &map(&[("city", "Guangzhou")])).await.unwrap();
    assert_eq!(deleted, 2);

    let rows = gw.select_all(&table).await.unwrap();
    assert_eq!(serde_json::to_value(&rows).unwrap(), json!([{"id": 3, "city": "Shenzhen"}]));

    gw.drop_table(&table).await.unwrap();
    gw.close().await;
}

// =============================================================================
// BATCH INSERT
// =============================================================================

/// Every record lands and the total is reported.
#[tokio::test]
async fn test_insert_rows_adds_every_record() {
    let Some(gw) = gateway().await else { return };
    let tweets = unique("tweets");

    gw.create_table(&tweets, &map(&[("id", "INTEGER"), ("text", "TEXT")]))
        .await
        .unwrap();

    let output = Operation::InsertRows {
        table_name: tweets.clone(),
        rows: vec![
            map(&[("id", "1"), ("text", "first")]),
            map(&[("id", "2"), ("text", "second")]),
            map(&[("id", "3")]),
        ],
    }
    .dispatch(&gw)
    .await
    .unwrap();
    assert_eq!(
        serde_json::to_value(output).unwrap(),
        json!({
            "message": format!("Data added to the table {} successfully", tweets),
            "rows_affected": 3
        })
    );
    assert_eq!(gw.count(&tweets).await.unwrap(), 3);

    gw.drop_table(&tweets).await.unwrap();
    gw.close().await;
}

/// A record the engine rejects leaves none of the batch behind.
#[tokio::test]
async fn test_insert_rows_is_atomic() {
    let Some(gw) = gateway().await else { return };
    let tweets = unique("tweets");

    gw.create_table(&tweets, &map(&[("id", "INTEGER"), ("text", "TEXT")]))
        .await
        .unwrap();

    let result = gw
        .insert_rows(
            &tweets,
            &[map(&[("id", "1"), ("text", "ok")]), map(&[("id", "two")])],
        )
        .await;
    assert!(matches!(result, Err(GatewayError::Engine(_))));
    assert_eq!(gw.count(&tweets).await.unwrap(), 0);

    gw.drop_table(&tweets).await.unwrap();
    gw.close().await;
}
