//! Catalog registration for materialized tables.
//!
//! The registrar is a stateless layer over [`UnityCatalogClient`]: every
//! existence check is a fresh round trip, since catalog state may change
//! between invocations.

use std::collections::HashMap;

use silt_core::MaterializationTarget;

use crate::client::{ColumnInfo, CreateTableRequest, TableInfo, UnityCatalogClient};
use crate::error::Result;

/// Table type registered for materialized tables.
pub const EXTERNAL_TABLE_TYPE: &str = "EXTERNAL";

/// Outcome of [`CatalogRegistrar::ensure_table`].
#[derive(Debug)]
pub struct EnsuredTable {
    /// The catalog's record of the table.
    pub table: TableInfo,
    /// True when this invocation created the entry. Compensation on write
    /// failure is keyed off this: a pre-existing entry is never deleted.
    pub created: bool,
}

/// Ensures catalog metadata exists and vends scoped storage credentials.
pub struct CatalogRegistrar {
    client: UnityCatalogClient,
}

impl CatalogRegistrar {
    /// Creates a registrar over the given client.
    #[must_use]
    pub fn new(client: UnityCatalogClient) -> Self {
        Self { client }
    }

    /// Returns the underlying catalog client.
    #[must_use]
    pub fn client(&self) -> &UnityCatalogClient {
        &self.client
    }

    /// Ensures the target's schema and table exist in the catalog.
    ///
    /// The schema is created when absent, then the table is created as an
    /// external table with the supplied column schema and storage format.
    /// An existing table is returned as-is; no schema reconciliation is
    /// attempted. Calling this twice with the same arguments performs
    /// exactly one schema and one table creation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CatalogError`] when any catalog round trip fails.
    pub async fn ensure_table(
        &self,
        target: &MaterializationTarget,
        columns: Vec<ColumnInfo>,
        storage_format: &str,
    ) -> Result<EnsuredTable> {
        let schema_full_name = format!("{}.{}", target.catalog_name, target.schema_name);
        if self.client.get_schema(&schema_full_name).await?.is_none() {
            tracing::info!(schema = %schema_full_name, "creating catalog schema");
            self.client
                .create_schema(&target.catalog_name, &target.schema_name)
                .await?;
        }

        let full_name = target.full_name();
        if let Some(existing) = self.client.get_table(&full_name).await? {
            return Ok(EnsuredTable {
                table: existing,
                created: false,
            });
        }

        tracing::info!(table = %full_name, location = %target.location, "creating catalog table");
        let created = self
            .client
            .create_table(&CreateTableRequest {
                name: target.table_name.clone(),
                catalog_name: target.catalog_name.clone(),
                schema_name: target.schema_name.clone(),
                table_type: EXTERNAL_TABLE_TYPE.to_string(),
                data_source_format: storage_format.to_string(),
                columns,
                storage_location: target.location.clone(),
            })
            .await?;

        Ok(EnsuredTable {
            table: created,
            created: true,
        })
    }

    /// Fetches temporary storage credentials for a table, keyed by its
    /// catalog-assigned id.
    ///
    /// When the table or its id is unavailable, an empty map is returned —
    /// a defined non-error state whose merge into storage options is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CatalogError`] when a catalog round trip fails.
    pub async fn fetch_storage_credentials(
        &self,
        catalog_name: &str,
        schema_name: &str,
        table_name: &str,
    ) -> Result<HashMap<String, String>> {
        let full_name = format!("{catalog_name}.{schema_name}.{table_name}");

        let Some(table) = self.client.get_table(&full_name).await? else {
            return Ok(HashMap::new());
        };
        let Some(table_id) = table.table_id.filter(|id| !id.is_empty()) else {
            return Ok(HashMap::new());
        };

        let credentials = self.client.create_table_credential(&table_id).await?;
        if let Some(expires_at) = credentials.expires_at() {
            tracing::debug!(table = %full_name, %expires_at, "fetched temporary table credentials");
        }
        Ok(credentials.into_storage_options())
    }
}
