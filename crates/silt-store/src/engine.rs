//! Query-engine seam.
//!
//! The pipeline consumes the engine through [`QueryEngine`] so callers can
//! bring their own execution layer; [`DataFusionEngine`] is the default
//! implementation.

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::error::DataFusionError;
use datafusion::prelude::SessionContext;

/// An in-memory columnar query result.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    /// Result schema; authoritative even when `batches` is empty.
    pub schema: SchemaRef,
    /// Result rows.
    pub batches: Vec<RecordBatch>,
}

/// Errors surfaced by a query engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A DataFusion planning or execution failure.
    #[error(transparent)]
    DataFusion(#[from] DataFusionError),

    /// A failure from a non-DataFusion engine implementation.
    #[error("query engine failure: {message}")]
    Other {
        /// Description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Creates an engine error from a message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Executes the residual select statement of a directive.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Runs `sql` and returns the full result in memory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when planning or execution fails.
    async fn execute(&self, sql: &str) -> Result<QueryOutput, EngineError>;
}

/// Default engine backed by a DataFusion [`SessionContext`].
///
/// Tables the select refers to must be registered on the session before
/// materializing.
pub struct DataFusionEngine {
    ctx: SessionContext,
}

impl DataFusionEngine {
    /// Creates an engine with a fresh session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ctx: SessionContext::new(),
        }
    }

    /// Creates an engine over an existing session.
    #[must_use]
    pub fn with_context(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Returns the underlying session, e.g. for registering source tables.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }
}

impl Default for DataFusionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryEngine for DataFusionEngine {
    async fn execute(&self, sql: &str) -> Result<QueryOutput, EngineError> {
        let df = self.ctx.sql(sql).await?;
        let schema: Schema = df.schema().into();
        let schema = Arc::new(schema);
        let batches = df.collect().await?;
        Ok(QueryOutput { schema, batches })
    }
}
