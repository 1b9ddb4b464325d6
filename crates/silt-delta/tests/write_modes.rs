//! Write-strategy behavior against tempdir-backed Delta tables.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use datafusion::prelude::SessionContext;
use deltalake::open_table;
use tempfile::TempDir;

use silt_delta::{table_exists, write, WriteError, WriteMode};
use silt_test_utils::{keyed_batch, region_batch};

fn location(dir: &TempDir) -> String {
    dir.path().join("tbl").to_string_lossy().into_owned()
}

fn no_options() -> HashMap<String, String> {
    HashMap::new()
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

async fn collect_query(location: &str, sql: &str) -> Vec<arrow::record_batch::RecordBatch> {
    let table = open_table(location).await.expect("open table");
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(table)).expect("register");
    ctx.sql(sql)
        .await
        .expect("sql")
        .collect()
        .await
        .expect("collect")
}

async fn row_count(location: &str) -> i64 {
    let batches = collect_query(location, "SELECT COUNT(*) FROM t").await;
    let array = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("count column");
    array.value(0)
}

#[tokio::test]
async fn overwrite_replaces_all_rows() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);

    let first = vec![keyed_batch(&[1, 2, 3], &["a", "b", "c"])];
    write(WriteMode::Overwrite, &location, &first, &no_options(), &[], &[])
        .await
        .expect("first write");
    assert_eq!(row_count(&location).await, 3);

    let second = vec![keyed_batch(&[7, 8], &["x", "y"])];
    write(WriteMode::Overwrite, &location, &second, &no_options(), &[], &[])
        .await
        .expect("second write");
    assert_eq!(row_count(&location).await, 2);

    // Each write advances the transaction log by one version.
    let second_commit = dir
        .path()
        .join("tbl/_delta_log/00000000000000000001.json");
    assert!(second_commit.exists());
}

#[tokio::test]
async fn table_exists_reflects_writes() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);

    assert!(!table_exists(&location, &no_options()).await.expect("probe"));

    let data = vec![keyed_batch(&[1], &["a"])];
    write(WriteMode::Overwrite, &location, &data, &no_options(), &[], &[])
        .await
        .expect("write");

    assert!(table_exists(&location, &no_options()).await.expect("probe"));
}

#[tokio::test]
async fn overwrite_partition_requires_partition_key() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let data = vec![region_batch(&["eu"], &[1])];

    let err = write(
        WriteMode::OverwritePartition,
        &location,
        &data,
        &no_options(),
        &[],
        &[],
    )
    .await
    .expect_err("must fail");

    assert!(matches!(err, WriteError::PartitionKeyMissing));
}

#[tokio::test]
async fn overwrite_partition_rejects_non_uniform_batches() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let data = vec![region_batch(&["eu", "us"], &[1, 2])];

    let err = write(
        WriteMode::OverwritePartition,
        &location,
        &data,
        &no_options(),
        &keys(&["region"]),
        &[],
    )
    .await
    .expect_err("must fail");

    match err {
        WriteError::NonUniformPartitionValue { column, values } => {
            assert_eq!(column, "region");
            assert_eq!(values, vec!["eu".to_string(), "us".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Precondition failures must not create the table.
    assert!(!table_exists(&location, &no_options()).await.expect("probe"));
}

#[tokio::test]
async fn overwrite_partition_creates_then_replaces_one_partition() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let partition_key = keys(&["region"]);

    // New table: created partitioned by region.
    let eu = vec![region_batch(&["eu", "eu"], &[1, 2])];
    write(
        WriteMode::OverwritePartition,
        &location,
        &eu,
        &no_options(),
        &partition_key,
        &[],
    )
    .await
    .expect("create partitioned");
    assert_eq!(row_count(&location).await, 2);

    // A different partition value adds rows without touching eu.
    let us = vec![region_batch(&["us"], &[3])];
    write(
        WriteMode::OverwritePartition,
        &location,
        &us,
        &no_options(),
        &partition_key,
        &[],
    )
    .await
    .expect("write us partition");
    assert_eq!(row_count(&location).await, 3);

    // Rewriting eu replaces only the eu rows.
    let eu_again = vec![region_batch(&["eu"], &[9])];
    write(
        WriteMode::OverwritePartition,
        &location,
        &eu_again,
        &no_options(),
        &partition_key,
        &[],
    )
    .await
    .expect("rewrite eu partition");
    assert_eq!(row_count(&location).await, 2);

    let batches =
        collect_query(&location, "SELECT id FROM t WHERE region = 'us'").await;
    let ids = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("id column");
    assert_eq!(ids.value(0), 3);
}

#[tokio::test]
async fn merge_requires_unique_key() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let data = vec![keyed_batch(&[1], &["a"])];

    let err = write(WriteMode::Merge, &location, &data, &no_options(), &[], &[])
        .await
        .expect_err("must fail");

    assert!(matches!(err, WriteError::UniqueKeyMissing));
}

#[tokio::test]
async fn merge_accepts_any_non_empty_unique_key() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let data = vec![keyed_batch(&[1], &["a"])];

    write(
        WriteMode::Merge,
        &location,
        &data,
        &no_options(),
        &[],
        &keys(&["id"]),
    )
    .await
    .expect("single-column key");

    write(
        WriteMode::Merge,
        &location,
        &data,
        &no_options(),
        &[],
        &keys(&["id", "name"]),
    )
    .await
    .expect("multi-column key");
}

#[tokio::test]
async fn merge_inserts_only_unmatched_rows() {
    let dir = TempDir::new().expect("tempdir");
    let location = location(&dir);
    let unique_key = keys(&["id"]);

    // Bootstrap: no table yet, rows written verbatim.
    let first = vec![keyed_batch(&[1, 2], &["a", "b"])];
    write(
        WriteMode::Merge,
        &location,
        &first,
        &no_options(),
        &[],
        &unique_key,
    )
    .await
    .expect("bootstrap merge");
    assert_eq!(row_count(&location).await, 2);

    // Overlapping batch: id=2 is skipped, id=3 inserted, nothing updated.
    let second = vec![keyed_batch(&[2, 3], &["changed", "c"])];
    write(
        WriteMode::Merge,
        &location,
        &second,
        &no_options(),
        &[],
        &unique_key,
    )
    .await
    .expect("incremental merge");
    assert_eq!(row_count(&location).await, 3);

    let batches = collect_query(&location, "SELECT name FROM t WHERE id = 2").await;
    let names = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("name column");
    assert_eq!(names.value(0), "b");
}
