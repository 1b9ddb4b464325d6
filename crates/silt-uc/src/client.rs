//! HTTP client for the Unity Catalog REST API.
//!
//! One synchronous round trip per operation, no retries, no caching. The
//! direct retrieve-by-full-name endpoints are used for existence checks;
//! a 404 from those maps to `Ok(None)` rather than an error.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use silt_core::StoreConfig;

use crate::error::{CatalogError, Result};

/// Path prefix of the Unity Catalog 2.1 API, appended to the endpoint URL.
pub const UC_API_SUFFIX: &str = "/api/2.1/unity-catalog";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential operation requested for a table write.
const READ_WRITE_OPERATION: &str = "READ_WRITE";

/// Stateless client for one Unity Catalog deployment.
pub struct UnityCatalogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl UnityCatalogClient {
    /// Creates a client for the given endpoint, with an optional bearer
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(endpoint: &str, token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CatalogError::Unavailable)?;

        Ok(Self {
            client,
            base_url: format!("{}{UC_API_SUFFIX}", endpoint.trim_end_matches('/')),
            token: token.map(str::to_string),
        })
    }

    /// Creates a client from pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::new(&config.uc_endpoint, config.uc_token.as_deref())
    }

    /// Retrieves a schema by `catalog.schema` full name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails with anything other
    /// than a 404.
    pub async fn get_schema(&self, full_name: &str) -> Result<Option<SchemaInfo>> {
        let url = format!("{}/schemas/{full_name}", self.base_url);
        self.get_optional(url).await
    }

    /// Creates a schema in the given catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails.
    pub async fn create_schema(&self, catalog_name: &str, name: &str) -> Result<SchemaInfo> {
        let url = format!("{}/schemas", self.base_url);
        let request = CreateSchemaRequest {
            name: name.to_string(),
            catalog_name: catalog_name.to_string(),
        };

        let response = self
            .authorized(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(CatalogError::Unavailable)?;
        let response = check_status(response).await?;
        response.json().await.map_err(CatalogError::Unavailable)
    }

    /// Retrieves a table by `catalog.schema.table` full name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails with anything other
    /// than a 404.
    pub async fn get_table(&self, full_name: &str) -> Result<Option<TableInfo>> {
        let url = format!("{}/tables/{full_name}", self.base_url);
        self.get_optional(url).await
    }

    /// Creates a table.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails.
    pub async fn create_table(&self, request: &CreateTableRequest) -> Result<TableInfo> {
        let url = format!("{}/tables", self.base_url);

        let response = self
            .authorized(self.client.post(&url).json(request))
            .send()
            .await
            .map_err(CatalogError::Unavailable)?;
        let response = check_status(response).await?;
        response.json().await.map_err(CatalogError::Unavailable)
    }

    /// Deletes a table by full name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails.
    pub async fn delete_table(&self, full_name: &str) -> Result<()> {
        let url = format!("{}/tables/{full_name}", self.base_url);

        let response = self
            .authorized(self.client.delete(&url))
            .send()
            .await
            .map_err(CatalogError::Unavailable)?;
        check_status(response).await?;
        Ok(())
    }

    /// Requests a read-write temporary credential for a table id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails.
    pub async fn create_table_credential(
        &self,
        table_id: &str,
    ) -> Result<TemporaryTableCredentials> {
        let url = format!("{}/temporary-table-credentials", self.base_url);
        let request = TemporaryTableCredentialsRequest {
            table_id: table_id.to_string(),
            operation: READ_WRITE_OPERATION.to_string(),
        };

        let response = self
            .authorized(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(CatalogError::Unavailable)?;
        let response = check_status(response).await?;
        response.json().await.map_err(CatalogError::Unavailable)
    }

    async fn get_optional<T>(&self, url: String) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(CatalogError::Unavailable)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map(Some)
            .map_err(CatalogError::Unavailable)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::api(status, message))
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Request to create a schema.
#[derive(Debug, Clone, Serialize)]
struct CreateSchemaRequest {
    name: String,
    catalog_name: String,
}

/// A schema object as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Schema name.
    pub name: String,
    /// Parent catalog name.
    pub catalog_name: String,
    /// Full `catalog.schema` name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Optional comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Catalog-assigned schema id.
    #[serde(default)]
    pub schema_id: Option<String>,
}

/// A column payload in catalog table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Human-readable type text (e.g. `long`, `decimal(10,2)`).
    pub type_text: String,
    /// JSON-encoded type descriptor.
    pub type_json: String,
    /// Catalog type name (e.g. `LONG`, `STRING`).
    pub type_name: String,
    /// Zero-based column position.
    pub position: i32,
    /// Whether the column admits nulls.
    pub nullable: bool,
    /// Optional comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Request to create a table.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTableRequest {
    /// Table name.
    pub name: String,
    /// Parent catalog name.
    pub catalog_name: String,
    /// Parent schema name.
    pub schema_name: String,
    /// Table type; this pipeline always registers `EXTERNAL` tables.
    pub table_type: String,
    /// Data source format tag (e.g. `DELTA`).
    pub data_source_format: String,
    /// Column schema.
    pub columns: Vec<ColumnInfo>,
    /// Storage URI of the physical data.
    pub storage_location: String,
}

/// A table object as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Parent catalog name.
    pub catalog_name: String,
    /// Parent schema name.
    pub schema_name: String,
    /// Full `catalog.schema.table` name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Table type.
    #[serde(default)]
    pub table_type: Option<String>,
    /// Data source format tag.
    #[serde(default)]
    pub data_source_format: Option<String>,
    /// Storage URI of the physical data.
    #[serde(default)]
    pub storage_location: Option<String>,
    /// Column schema.
    #[serde(default)]
    pub columns: Option<Vec<ColumnInfo>>,
    /// Catalog-assigned table id; required for credential vending.
    #[serde(default)]
    pub table_id: Option<String>,
    /// Creation timestamp in epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Request payload for `POST /temporary-table-credentials`.
#[derive(Debug, Clone, Serialize)]
struct TemporaryTableCredentialsRequest {
    table_id: String,
    operation: String,
}

/// Temporary credentials vended for one table.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporaryTableCredentials {
    /// AWS credential triple, when the table lives on S3-compatible storage.
    #[serde(default)]
    pub aws_temp_credentials: Option<AwsTempCredentials>,
    /// Expiration timestamp in epoch milliseconds.
    #[serde(default)]
    pub expiration_time: Option<i64>,
}

/// Time-boxed AWS credential triple scoped to one table's location.
#[derive(Debug, Clone, Deserialize)]
pub struct AwsTempCredentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token.
    pub session_token: String,
}

impl TemporaryTableCredentials {
    /// Returns the credential expiry as a UTC timestamp, when present.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration_time
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Flattens the credential triple into the well-known storage-option
    /// keys. A missing triple yields an empty map, which merges as a no-op.
    #[must_use]
    pub fn into_storage_options(self) -> HashMap<String, String> {
        match self.aws_temp_credentials {
            Some(aws) => HashMap::from([
                ("AWS_ACCESS_KEY_ID".to_string(), aws.access_key_id),
                ("AWS_SECRET_ACCESS_KEY".to_string(), aws.secret_access_key),
                ("AWS_SESSION_TOKEN".to_string(), aws.session_token),
            ]),
            None => HashMap::new(),
        }
    }
}
