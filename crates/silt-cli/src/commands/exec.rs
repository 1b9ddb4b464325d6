//! Exec command - run one SQL statement.

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;

use silt_core::{is_materialization_directive, StoreConfig};
use silt_store::{DataFusionEngine, Materializer, QueryEngine, QueryOutput};

/// Arguments for the exec command.
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Statement to execute: a `CREATE EXTERNAL TABLE ... AS SELECT`
    /// directive or a bare `SELECT`.
    pub statement: String,
}

/// Execute the exec command.
///
/// # Errors
///
/// Returns an error when the statement is neither a directive nor a select,
/// or when execution fails.
pub async fn execute(args: ExecArgs, config: &StoreConfig) -> Result<()> {
    let statement = args.statement.trim();

    if is_materialization_directive(statement) {
        let materializer = Materializer::with_datafusion(config.clone());
        let name = materializer
            .materialize(statement)
            .await
            .context("materialization failed")?;
        println!("External table '{name}' created successfully.");
        return Ok(());
    }

    if is_select(statement) {
        let engine = DataFusionEngine::new();
        let output = engine.execute(statement).await.context("query failed")?;
        print!("{}", render_table(&output)?);
        return Ok(());
    }

    anyhow::bail!(
        "unsupported statement; expected SELECT or CREATE EXTERNAL TABLE ... AS SELECT"
    )
}

fn is_select(statement: &str) -> bool {
    let pattern = Regex::new(r"(?i)^\s*SELECT\s").expect("select pattern is valid");
    pattern.is_match(statement)
}

fn render_table(output: &QueryOutput) -> Result<String> {
    use arrow::util::display::array_value_to_string;
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(output.schema.fields().iter().map(|field| field.name().clone()));

    for batch in &output.batches {
        for row in 0..batch.num_rows() {
            let mut record = Vec::with_capacity(batch.num_columns());
            for column in batch.columns() {
                record.push(array_value_to_string(column.as_ref(), row)?);
            }
            builder.push_record(record);
        }
    }

    let total: usize = output.batches.iter().map(arrow::record_batch::RecordBatch::num_rows).sum();
    Ok(format!("{}\n({total} rows)\n", builder.build()))
}
