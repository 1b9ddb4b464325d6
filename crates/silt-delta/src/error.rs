//! Error types for `silt-delta`.

use arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use deltalake::DeltaTableError;

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Errors raised by the write strategy engine.
///
/// The first four variants are local precondition violations raised before
/// any durable state is touched; they are never retried.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// `partition_key` is required for partition-overwrite writes.
    #[error("'partition_key' has to be defined for mode 'overwrite_partition'")]
    PartitionKeyMissing,

    /// `unique_key` is required for merge writes.
    #[error("'unique_key' has to be defined for mode 'merge'")]
    UniqueKeyMissing,

    /// A partition column carried more than one distinct value (or none);
    /// each batch must represent exactly one partition value per key.
    #[error("'{column}' column has not one distinct value, values are: {values:?}")]
    NonUniformPartitionValue {
        /// The partition column.
        column: String,
        /// The distinct values observed.
        values: Vec<String>,
    },

    /// The requested write mode is not one of the supported variants.
    #[error("write mode '{mode}' is not supported")]
    UnsupportedMode {
        /// The unrecognized mode string.
        mode: String,
    },

    /// An error from the Delta table layer.
    #[error(transparent)]
    Delta(#[from] DeltaTableError),

    /// An error from Arrow data handling.
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// An error from the merge execution engine.
    #[error(transparent)]
    DataFusion(#[from] DataFusionError),
}

impl WriteError {
    /// Creates a non-uniform-partition-value error.
    #[must_use]
    pub fn non_uniform_partition(column: impl Into<String>, values: Vec<String>) -> Self {
        Self::NonUniformPartitionValue {
            column: column.into(),
            values,
        }
    }

    /// Creates an unsupported-mode error.
    #[must_use]
    pub fn unsupported_mode(mode: impl Into<String>) -> Self {
        Self::UnsupportedMode { mode: mode.into() }
    }
}
