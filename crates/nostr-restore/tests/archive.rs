//! Archive queries against a real Postgres.
//!
//! Skipped unless `TEST_DATABASE_URL` is set. Each test uses its own table.

use nostr_restore::archive::Archive;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const PUBKEY: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";
const OTHER: &str = "3bf0c63fcb93463407af97a5e5ee64fa883d107ef9e558472c4eb9aaaefa459d";

async fn pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    Some(
        PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to TEST_DATABASE_URL"),
    )
}

async fn create_table(pool: &PgPool, table: &str) {
    create_table_with(pool, table, "INTEGER", "TEXT").await;
}

/// Create an archive table with the given `event_kind` and `event_data` types.
async fn create_table_with(pool: &PgPool, table: &str, kind_type: &str, data_type: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(&format!(
        "CREATE TABLE {table} (
            id VARCHAR(64) PRIMARY KEY,
            pubkey TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            event_kind {kind_type} NOT NULL,
            event_data {data_type} NOT NULL
        )"
    ))
    .execute(pool)
    .await
    .unwrap();
}

async fn insert(pool: &PgPool, table: &str, id: &str, pubkey: &str, kind: i32, created_at: i64) {
    insert_as(pool, table, "TEXT", id, pubkey, kind, created_at).await;
}

/// Insert one row, casting the payload to `data_type`. Integer columns take
/// the bound `INT4`/`INT8` through Postgres' assignment casts.
async fn insert_as(
    pool: &PgPool,
    table: &str,
    data_type: &str,
    id: &str,
    pubkey: &str,
    kind: i32,
    created_at: i64,
) {
    sqlx::query(&format!(
        "INSERT INTO {table} (id, pubkey, created_at, event_kind, event_data) \
         VALUES ($1, $2, $3, $4, $5::TEXT::{data_type})"
    ))
    .bind(id)
    .bind(pubkey)
    .bind(created_at)
    .bind(kind)
    .bind(format!(r#"{{"id":"{id}","kind":{kind}}}"#))
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn events_ordered_by_kind_then_newest() {
    let Some(pool) = pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let table = "restore_test_ordering";
    create_table(&pool, table).await;

    insert(&pool, table, "a", PUBKEY, 3, 100).await;
    insert(&pool, table, "b", PUBKEY, 1, 50).await;
    insert(&pool, table, "c", PUBKEY, 1, 200).await;
    insert(&pool, table, "d", PUBKEY, 0, 10).await;
    insert(&pool, table, "e", OTHER, 1, 300).await;

    let archive = Archive::new(pool.clone(), table);
    let events = archive.events_by_pubkey(PUBKEY).await.unwrap();

    let order: Vec<(&str, i32, i64)> = events
        .iter()
        .map(|e| (e.id.as_str(), e.kind, e.created_at))
        .collect();
    assert_eq!(
        order,
        vec![("d", 0, 10), ("c", 1, 200), ("b", 1, 50), ("a", 3, 100)]
    );
    assert!(events.iter().all(|e| e.pubkey == PUBKEY));
    assert_eq!(events[3].event_data, r#"{"id":"a","kind":3}"#);

    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_pubkey_yields_no_events() {
    let Some(pool) = pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let table = "restore_test_empty";
    create_table(&pool, table).await;
    insert(&pool, table, "x", OTHER, 3, 1).await;

    let archive = Archive::new(pool.clone(), table);
    assert!(archive.events_by_pubkey(PUBKEY).await.unwrap().is_empty());
    archive.ping().await.unwrap();

    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn wide_integer_and_json_columns_decode() {
    let Some(pool) = pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let table = "restore_test_wide_columns";
    create_table_with(&pool, table, "BIGINT", "JSONB").await;

    insert_as(&pool, table, "JSONB", "k3", PUBKEY, 3, 20).await;
    insert_as(&pool, table, "JSONB", "k0", PUBKEY, 0, 10).await;

    let archive = Archive::new(pool.clone(), table);
    let events = archive.events_by_pubkey(PUBKEY).await.unwrap();

    let kinds: Vec<i32> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![0, 3]);
    let payload: serde_json::Value = serde_json::from_str(&events[1].event_data).unwrap();
    assert_eq!(payload["id"], "k3");
    assert_eq!(payload["kind"], 3);

    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn small_integer_kind_column_decodes() {
    let Some(pool) = pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let table = "restore_test_smallint_kind";
    create_table_with(&pool, table, "SMALLINT", "TEXT").await;
    insert(&pool, table, "s", PUBKEY, 3, 5).await;

    let archive = Archive::new(pool.clone(), table);
    let events = archive.events_by_pubkey(PUBKEY).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, 3);

    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&pool)
        .await
        .unwrap();
}
