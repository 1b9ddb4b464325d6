//! The materialization pipeline.
//!
//! Ordering within one invocation is fixed: catalog registration precedes
//! credential fetch, which precedes the physical write. The whole store
//! phase runs under the supervisor's budget on one background task; there is
//! no internal parallelism across write strategies.

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use tracing::Instrument;

use silt_core::observability::materialize_span;
use silt_core::{MaterializationTarget, ParsedDirective, QualifiedTableName, StoreConfig};
use silt_delta::WriteMode;
use silt_uc::{columns_from_schema, CatalogRegistrar, UnityCatalogClient};

use crate::engine::{DataFusionEngine, QueryEngine, QueryOutput};
use crate::error::{Result, StoreError};
use crate::supervisor::run_bounded;

/// Storage format registered in the catalog for materialized tables.
pub const STORAGE_FORMAT: &str = "DELTA";

/// Materializes directives end to end.
pub struct Materializer {
    config: StoreConfig,
    engine: Arc<dyn QueryEngine>,
}

impl Materializer {
    /// Creates a materializer with an explicit query engine.
    #[must_use]
    pub fn new(config: StoreConfig, engine: Arc<dyn QueryEngine>) -> Self {
        Self { config, engine }
    }

    /// Creates a materializer backed by a fresh DataFusion session.
    #[must_use]
    pub fn with_datafusion(config: StoreConfig) -> Self {
        Self::new(config, Arc::new(DataFusionEngine::new()))
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Parses `directive`, executes its select statement, registers the
    /// table in the catalog, writes the result to the target location, and
    /// returns the fully qualified table name.
    ///
    /// The registration + credential + write phase runs under the
    /// configured budget; see [`StoreError::TimedOut`] for the abandoned
    /// outcome. Verification (re-reading the table) is the caller's step,
    /// keyed off the returned name.
    ///
    /// # Errors
    ///
    /// Returns parse, engine, catalog, and write errors unchanged, plus
    /// [`StoreError::TimedOut`] on budget exhaustion. A write failure after
    /// this invocation created the catalog entry deletes that entry before
    /// the error surfaces.
    pub async fn materialize(&self, directive: &str) -> Result<QualifiedTableName> {
        let ParsedDirective { target, select } =
            ParsedDirective::parse(directive, &self.config)?;
        let qualified = target.qualified_name();
        let span = materialize_span(
            &target.catalog_name,
            &target.schema_name,
            &target.table_name,
        );

        let output = self.engine.execute(&select).await?;

        let config = self.config.clone();
        let budget = self.config.store_timeout;
        run_bounded(
            async move { store(&config, &target, output).await }.instrument(span),
            budget,
        )
        .await?;

        Ok(qualified)
    }
}

/// Runs the store phase: ensure catalog metadata, fetch credentials, write.
async fn store(
    config: &StoreConfig,
    target: &MaterializationTarget,
    output: QueryOutput,
) -> Result<()> {
    // Directive options override the environment-sourced catalog settings
    // for this invocation only.
    let mut catalog_config = config.clone();
    if let Some(endpoint) = target.storage_options.get("UC_ENDPOINT") {
        catalog_config = catalog_config.with_endpoint(endpoint);
    }
    if let Some(token) = target.storage_options.get("UC_TOKEN") {
        catalog_config = catalog_config.with_token(token);
    }
    let registrar = CatalogRegistrar::new(UnityCatalogClient::from_config(&catalog_config)?);

    let columns = columns_from_schema(&output.schema);
    let ensured = registrar
        .ensure_table(target, columns, STORAGE_FORMAT)
        .await?;

    let mut storage_options = target.storage_options.clone();
    let credentials = registrar
        .fetch_storage_credentials(
            &target.catalog_name,
            &target.schema_name,
            &target.table_name,
        )
        .await?;
    storage_options.extend(credentials);

    let partition_key = split_key_list(storage_options.get("partition_key"));
    let unique_key = split_key_list(storage_options.get("unique_key"));

    // An empty result still materializes the schema.
    let batches = if output.batches.is_empty() {
        vec![RecordBatch::new_empty(output.schema.clone())]
    } else {
        output.batches
    };

    let write_result = async {
        let mode = WriteMode::parse(storage_options.get("mode").map(String::as_str))?;
        silt_delta::write(
            mode,
            &target.location,
            &batches,
            &storage_options,
            &partition_key,
            &unique_key,
        )
        .await
    }
    .await;

    match write_result {
        Ok(()) => Ok(()),
        Err(write_error) => {
            if ensured.created {
                compensate(&registrar, &target.full_name()).await;
            }
            Err(StoreError::Write(write_error))
        }
    }
}

/// Deletes the catalog entry created earlier in this invocation. Best
/// effort: a failed delete is logged, never raised over the write error.
async fn compensate(registrar: &CatalogRegistrar, full_name: &str) {
    tracing::info!(table = %full_name, "write failed; deleting catalog entry created by this invocation");
    if let Err(delete_error) = registrar.client().delete_table(full_name).await {
        tracing::warn!(
            table = %full_name,
            error = %delete_error,
            "failed to delete catalog entry after write failure"
        );
    }
}

fn split_key_list(value: Option<&String>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
