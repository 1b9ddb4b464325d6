//! Factory functions for Arrow record batches used across tests.

use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

/// Schema used by keyed test batches: `id BIGINT NOT NULL, name STRING`.
pub fn keyed_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]))
}

/// Builds a batch of `(id, name)` rows.
pub fn keyed_batch(ids: &[i64], names: &[&str]) -> RecordBatch {
    assert_eq!(ids.len(), names.len(), "ids and names must align");
    RecordBatch::try_new(
        keyed_schema(),
        vec![
            Arc::new(Int64Array::from(ids.to_vec())),
            Arc::new(StringArray::from(names.to_vec())),
        ],
    )
    .expect("keyed batch")
}

/// Schema used by partitioned test batches:
/// `region STRING NOT NULL, id BIGINT NOT NULL`.
pub fn region_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("id", DataType::Int64, false),
    ]))
}

/// Builds a batch of `(region, id)` rows.
pub fn region_batch(regions: &[&str], ids: &[i64]) -> RecordBatch {
    assert_eq!(regions.len(), ids.len(), "regions and ids must align");
    RecordBatch::try_new(
        region_schema(),
        vec![
            Arc::new(StringArray::from(regions.to_vec())),
            Arc::new(Int64Array::from(ids.to_vec())),
        ],
    )
    .expect("region batch")
}
