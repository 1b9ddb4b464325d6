//! In-process Unity Catalog stub.
//!
//! Serves just enough of the Unity Catalog 2.1 REST surface for the client
//! and pipeline tests: schema/table retrieval by full name, creation,
//! deletion, and temporary table credentials. Every mutating call is
//! counted so tests can assert idempotence and compensation behavior.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Access key id vended by the stub credential endpoint.
pub const STUB_ACCESS_KEY_ID: &str = "stub-access-key";
/// Secret access key vended by the stub credential endpoint.
pub const STUB_SECRET_ACCESS_KEY: &str = "stub-secret-key";
/// Session token vended by the stub credential endpoint.
pub const STUB_SESSION_TOKEN: &str = "stub-session-token";

#[derive(Debug, Default)]
struct CatalogState {
    schemas: HashMap<String, Value>,
    tables: HashMap<String, Value>,
    schema_creates: usize,
    table_creates: usize,
    credential_requests: usize,
    deleted_tables: Vec<String>,
}

#[derive(Clone)]
struct AppState {
    inner: Arc<Mutex<CatalogState>>,
}

impl AppState {
    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.inner.lock().expect("stub catalog state lock")
    }
}

/// An in-process Unity Catalog server bound on `127.0.0.1:0`.
///
/// The server shuts down gracefully when the stub is dropped.
pub struct StubUnityCatalog {
    endpoint: String,
    state: Arc<Mutex<CatalogState>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for StubUnityCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubUnityCatalog")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl StubUnityCatalog {
    /// Starts the stub server.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(CatalogState::default()));
        let app_state = AppState {
            inner: state.clone(),
        };

        let app = Router::new()
            .route("/api/2.1/unity-catalog/schemas", post(create_schema))
            .route(
                "/api/2.1/unity-catalog/schemas/:full_name",
                get(get_schema),
            )
            .route("/api/2.1/unity-catalog/tables", post(create_table))
            .route(
                "/api/2.1/unity-catalog/tables/:full_name",
                get(get_table).delete(delete_table),
            )
            .route(
                "/api/2.1/unity-catalog/temporary-table-credentials",
                post(create_credential),
            )
            .with_state(app_state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub catalog listener");
        let addr: SocketAddr = listener.local_addr().expect("stub listener addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        Self {
            endpoint: format!("http://{addr}"),
            state,
            shutdown_tx: Some(shutdown_tx),
            _task: task,
        }
    }

    /// Endpoint URL to hand to a catalog client (no API suffix).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of `POST /schemas` calls observed.
    pub fn schema_creates(&self) -> usize {
        self.lock().schema_creates
    }

    /// Number of `POST /tables` calls observed.
    pub fn table_creates(&self) -> usize {
        self.lock().table_creates
    }

    /// Number of credential requests observed.
    pub fn credential_requests(&self) -> usize {
        self.lock().credential_requests
    }

    /// Full names passed to `DELETE /tables`, in call order.
    pub fn deleted_tables(&self) -> Vec<String> {
        self.lock().deleted_tables.clone()
    }

    /// Whether a table entry currently exists.
    pub fn has_table(&self, full_name: &str) -> bool {
        self.lock().tables.contains_key(full_name)
    }

    /// Seeds a schema entry without going through the API.
    pub fn seed_schema(&self, catalog_name: &str, schema_name: &str) {
        let full_name = format!("{catalog_name}.{schema_name}");
        let schema = json!({
            "name": schema_name,
            "catalog_name": catalog_name,
            "full_name": full_name,
        });
        self.lock().schemas.insert(full_name, schema);
    }

    /// Seeds a table entry without going through the API.
    ///
    /// Pass `table_id: None` to model a catalog entry whose id is
    /// unavailable (the empty-credential case).
    pub fn seed_table(
        &self,
        catalog_name: &str,
        schema_name: &str,
        table_name: &str,
        table_id: Option<&str>,
    ) {
        self.seed_schema(catalog_name, schema_name);
        let full_name = format!("{catalog_name}.{schema_name}.{table_name}");
        let mut table = json!({
            "name": table_name,
            "catalog_name": catalog_name,
            "schema_name": schema_name,
            "full_name": full_name,
            "table_type": "EXTERNAL",
            "data_source_format": "DELTA",
        });
        if let Some(id) = table_id {
            table["table_id"] = json!(id);
        }
        self.lock().tables.insert(full_name, table);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().expect("stub catalog state lock")
    }
}

impl Drop for StubUnityCatalog {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": { "error_code": "NOT_FOUND", "message": message }
        })),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": { "error_code": "BAD_REQUEST", "message": message }
        })),
    )
        .into_response()
}

async fn get_schema(State(state): State<AppState>, Path(full_name): Path<String>) -> Response {
    let state = state.lock();
    match state.schemas.get(&full_name) {
        Some(schema) => (StatusCode::OK, Json(schema.clone())).into_response(),
        None => not_found(format!("schema not found: {full_name}")),
    }
}

async fn create_schema(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(name) = payload["name"].as_str().map(str::to_string) else {
        return bad_request("name is required".to_string());
    };
    let Some(catalog_name) = payload["catalog_name"].as_str().map(str::to_string) else {
        return bad_request("catalog_name is required".to_string());
    };

    let full_name = format!("{catalog_name}.{name}");
    let schema = json!({
        "name": name,
        "catalog_name": catalog_name,
        "full_name": full_name,
    });

    let mut state = state.lock();
    state.schema_creates += 1;
    state.schemas.insert(full_name, schema.clone());
    (StatusCode::OK, Json(schema)).into_response()
}

async fn get_table(State(state): State<AppState>, Path(full_name): Path<String>) -> Response {
    let state = state.lock();
    match state.tables.get(&full_name) {
        Some(table) => (StatusCode::OK, Json(table.clone())).into_response(),
        None => not_found(format!("table not found: {full_name}")),
    }
}

async fn create_table(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(name) = payload["name"].as_str().map(str::to_string) else {
        return bad_request("name is required".to_string());
    };
    let Some(catalog_name) = payload["catalog_name"].as_str().map(str::to_string) else {
        return bad_request("catalog_name is required".to_string());
    };
    let Some(schema_name) = payload["schema_name"].as_str().map(str::to_string) else {
        return bad_request("schema_name is required".to_string());
    };

    let full_name = format!("{catalog_name}.{schema_name}.{name}");
    let mut table = payload.clone();
    table["full_name"] = json!(full_name);
    table["table_id"] = json!(Uuid::new_v4().to_string());

    let mut state = state.lock();
    state.table_creates += 1;
    state.tables.insert(full_name, table.clone());
    (StatusCode::OK, Json(table)).into_response()
}

async fn delete_table(State(state): State<AppState>, Path(full_name): Path<String>) -> Response {
    let mut state = state.lock();
    // Record the attempt even when the entry is missing; compensation tests
    // assert on exact call sequences.
    state.deleted_tables.push(full_name.clone());
    match state.tables.remove(&full_name) {
        Some(_) => (StatusCode::OK, Json(json!({}))).into_response(),
        None => not_found(format!("table not found: {full_name}")),
    }
}

async fn create_credential(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let table_id = payload["table_id"].as_str().unwrap_or_default();
    if table_id.is_empty() {
        return bad_request("table_id is required".to_string());
    }

    let mut state = state.lock();
    state.credential_requests += 1;

    let response = json!({
        "aws_temp_credentials": {
            "access_key_id": STUB_ACCESS_KEY_ID,
            "secret_access_key": STUB_SECRET_ACCESS_KEY,
            "session_token": STUB_SESSION_TOKEN,
        },
        "expiration_time": 4_102_444_800_000_i64,
    });
    (StatusCode::OK, Json(response)).into_response()
}
