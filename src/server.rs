//! Reference contacts API server.
//!
//! Serves the JSON contract the client syncs against, backed by an
//! in-memory [`MemoryRemote`]. Useful for local development, demos, and
//! integration tests. Nothing is persisted.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `{collection}` | List every contact |
//! | `POST`   | `{collection}` | Create a contact (`201`, returns it) |
//! | `PUT`    | `{collection}/{id}` | Replace a contact (returns it) |
//! | `DELETE` | `{collection}/{id}` | Delete a contact (`204`) |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "contact 7 not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser client
//! served from elsewhere can talk to it.

use std::path::Path as FsPath;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use contact_manager_core::models::{Contact, ContactForm, ContactId, ContactPayload};
use contact_manager_core::remote::memory::MemoryRemote;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;

/// Starts the reference server on `[server].bind`.
///
/// `seed` optionally names a JSON file holding an array of contacts to
/// start with.
pub async fn run_server(config: &Config, seed: Option<&FsPath>) -> Result<()> {
    let remote = match seed {
        Some(path) => Arc::new(MemoryRemote::with_contacts(load_seed(path)?)),
        None => Arc::new(MemoryRemote::new()),
    };

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    println!(
        "Contacts API listening on http://{}{}",
        listener.local_addr()?,
        config.remote.collection_path
    );
    serve(listener, remote, &config.remote.collection_path).await
}

/// Serve on an already-bound listener until the process ends.
pub async fn serve(
    listener: TcpListener,
    remote: Arc<MemoryRemote>,
    collection_path: &str,
) -> Result<()> {
    axum::serve(listener, router(remote, collection_path)).await?;
    Ok(())
}

pub fn router(remote: Arc<MemoryRemote>, collection_path: &str) -> Router {
    let collection = collection_path.trim_end_matches('/').to_string();
    let item = format!("{}/{{id}}", collection);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&collection, get(handle_list).post(handle_create))
        .route(&item, put(handle_update).delete(handle_delete))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(remote)
}

fn load_seed(path: &FsPath) -> Result<Vec<Contact>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Seed file must be a JSON array of contacts: {}", path.display()))
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(id: &ContactId) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: format!("contact {} not found", id),
    }
}

/// Apply the same required-field rule the client enforces.
fn validated(payload: ContactPayload) -> Result<ContactPayload, AppError> {
    let form = ContactForm {
        full_name: payload.full_name,
        email: payload.email,
        phone_number: payload.phone_number,
        tags: payload.tags,
    };
    form.to_payload().map_err(|e| bad_request(e.to_string()))
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_list(State(remote): State<Arc<MemoryRemote>>) -> Json<Vec<Contact>> {
    Json(remote.snapshot())
}

async fn handle_create(
    State(remote): State<Arc<MemoryRemote>>,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = remote.insert(validated(payload)?);
    info!(id = ?contact.id, "created contact");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn handle_update(
    State(remote): State<Arc<MemoryRemote>>,
    Path(id): Path<String>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<Contact>, AppError> {
    let id = ContactId::parse(&id);
    let contact = remote
        .replace(&id, validated(payload)?)
        .ok_or_else(|| not_found(&id))?;
    info!(%id, "updated contact");
    Ok(Json(contact))
}

async fn handle_delete(
    State(remote): State<Arc<MemoryRemote>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = ContactId::parse(&id);
    if !remote.remove(&id) {
        return Err(not_found(&id));
    }
    info!(%id, "deleted contact");
    Ok(StatusCode::NO_CONTENT)
}
