//! Write strategies against Delta tables.
//!
//! One handler per [`WriteMode`]. All handlers take the full storage-option
//! map (region, credentials) and pass it through to the table layer; on
//! success the table's transaction log advances by one version (two for a
//! merge that bootstraps a new table).

use std::collections::{BTreeSet, HashMap};
use std::sync::Once;

use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use datafusion::common::Column;
use datafusion::prelude::{Expr, SessionContext};
use deltalake::protocol::SaveMode;
use deltalake::{open_table_with_storage_options, DeltaOps, DeltaTableError};

use crate::error::{Result, WriteError};
use crate::mode::WriteMode;

static REGISTER_HANDLERS: Once = Once::new();

/// Registers cloud object-store handlers. Idempotent; local paths work
/// without them.
fn register_store_handlers() {
    REGISTER_HANDLERS.call_once(|| {
        deltalake::aws::register_handlers(None);
    });
}

/// Returns whether a Delta table exists at `location`.
///
/// # Errors
///
/// Returns [`WriteError::Delta`] for failures other than the location not
/// holding a table.
pub async fn table_exists(
    location: &str,
    storage_options: &HashMap<String, String>,
) -> Result<bool> {
    register_store_handlers();
    match open_table_with_storage_options(location, storage_options.clone()).await {
        Ok(_) => Ok(true),
        // A location that does not yet hold a table. Older deltalake surfaced
        // this as `NotATable`; 0.26 reports a missing local path as
        // `InvalidTableLocation`.
        Err(DeltaTableError::NotATable(_) | DeltaTableError::InvalidTableLocation(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Applies `data` to the table at `location` according to `mode`.
///
/// `partition_key` and `unique_key` are column-name lists taken from the
/// storage options; an empty slice means the key was not supplied.
///
/// # Errors
///
/// Returns the mode's precondition error when its key argument is missing,
/// [`WriteError::NonUniformPartitionValue`] when a partition-overwrite batch
/// spans more than one partition value, and the underlying table error for
/// storage failures.
pub async fn write(
    mode: WriteMode,
    location: &str,
    data: &[RecordBatch],
    storage_options: &HashMap<String, String>,
    partition_key: &[String],
    unique_key: &[String],
) -> Result<()> {
    register_store_handlers();
    match mode {
        WriteMode::Overwrite => write_overwrite(location, data, storage_options).await,
        WriteMode::OverwritePartition => {
            write_overwrite_partition(location, data, storage_options, partition_key).await
        }
        WriteMode::Merge => write_merge(location, data, storage_options, unique_key).await,
    }
}

async fn delta_ops(
    location: &str,
    storage_options: &HashMap<String, String>,
) -> Result<DeltaOps> {
    DeltaOps::try_from_uri_with_storage_options(location, storage_options.clone())
        .await
        .map_err(WriteError::from)
}

async fn write_overwrite(
    location: &str,
    data: &[RecordBatch],
    storage_options: &HashMap<String, String>,
) -> Result<()> {
    delta_ops(location, storage_options)
        .await?
        .write(data.to_vec())
        .with_save_mode(SaveMode::Overwrite)
        .await?;
    tracing::debug!(location, "overwrote table");
    Ok(())
}

async fn write_overwrite_partition(
    location: &str,
    data: &[RecordBatch],
    storage_options: &HashMap<String, String>,
    partition_key: &[String],
) -> Result<()> {
    if partition_key.is_empty() {
        return Err(WriteError::PartitionKeyMissing);
    }

    // The batch must carry exactly one value per partition column; anything
    // else would silently fan out over partitions the caller did not name.
    let mut partitions = Vec::with_capacity(partition_key.len());
    for column in partition_key {
        let mut values = distinct_values(data, column)?;
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                partitions.push((column.clone(), value));
            }
        } else {
            return Err(WriteError::non_uniform_partition(column, values));
        }
    }

    if table_exists(location, storage_options).await? {
        let predicate = partitions
            .iter()
            .map(|(column, value)| format!("\"{column}\" = '{value}'"))
            .collect::<Vec<_>>()
            .join(" AND ");
        tracing::info!(location, predicate = %predicate, "overwriting partition");
        delta_ops(location, storage_options)
            .await?
            .write(data.to_vec())
            .with_save_mode(SaveMode::Overwrite)
            .with_replace_where(predicate)
            .await?;
    } else {
        tracing::info!(location, partition_columns = ?partition_key, "creating partitioned table");
        delta_ops(location, storage_options)
            .await?
            .write(data.to_vec())
            .with_partition_columns(partition_key.to_vec())
            .await?;
    }
    Ok(())
}

async fn write_merge(
    location: &str,
    data: &[RecordBatch],
    storage_options: &HashMap<String, String>,
    unique_key: &[String],
) -> Result<()> {
    if unique_key.is_empty() {
        return Err(WriteError::UniqueKeyMissing);
    }

    if !table_exists(location, storage_options).await? {
        tracing::info!(location, "bootstrapping table before merge");
        delta_ops(location, storage_options)
            .await?
            .write(data.to_vec())
            .await?;
    }

    let table = open_table_with_storage_options(location, storage_options.clone()).await?;

    let ctx = SessionContext::new();
    let source = ctx.read_batches(data.iter().cloned())?;
    let column_names: Vec<String> = source
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();

    let predicate = unique_key
        .iter()
        .map(|key| format!("source.\"{key}\" = target.\"{key}\""))
        .collect::<Vec<_>>()
        .join(" AND ");

    let (_table, metrics) = DeltaOps(table)
        .merge(source, predicate)
        .with_source_alias("source")
        .with_target_alias("target")
        .when_not_matched_insert(|insert| {
            column_names.iter().fold(insert, |insert, name| {
                insert.set(
                    Column::new_unqualified(name.clone()),
                    Expr::Column(Column::new(Some("source"), name.clone())),
                )
            })
        })?
        .await?;

    tracing::debug!(
        location,
        inserted = metrics.num_target_rows_inserted,
        "merge complete"
    );
    Ok(())
}

fn distinct_values(data: &[RecordBatch], column: &str) -> Result<Vec<String>> {
    let mut values = BTreeSet::new();
    for batch in data {
        let index = batch.schema().index_of(column)?;
        let array = batch.column(index);
        for row in 0..array.len() {
            values.insert(array_value_to_string(array.as_ref(), row)?);
        }
    }
    Ok(values.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn batch(regions: &[&str], ids: &[i64]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("region", DataType::Utf8, false),
            Field::new("id", DataType::Int64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(regions.to_vec())),
                Arc::new(Int64Array::from(ids.to_vec())),
            ],
        )
        .expect("batch")
    }

    #[test]
    fn distinct_values_spans_batches() {
        let batches = vec![batch(&["eu", "eu"], &[1, 2]), batch(&["us"], &[3])];
        let values = distinct_values(&batches, "region").expect("distinct");
        assert_eq!(values, vec!["eu".to_string(), "us".to_string()]);
    }

    #[test]
    fn distinct_values_deduplicates() {
        let batches = vec![batch(&["eu", "eu", "eu"], &[1, 2, 3])];
        let values = distinct_values(&batches, "region").expect("distinct");
        assert_eq!(values, vec!["eu".to_string()]);
    }

    #[test]
    fn distinct_values_rejects_unknown_column() {
        let batches = vec![batch(&["eu"], &[1])];
        let err = distinct_values(&batches, "missing").expect_err("must fail");
        assert!(matches!(err, WriteError::Arrow(_)));
    }
}
