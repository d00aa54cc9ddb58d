//! HTTP surface for the two labs.
//!
//! Each lab exposes a vulnerable endpoint next to its fixed counterpart. The
//! vulnerable handlers skip the core checks on purpose; the fixed ones call
//! [`AccessGate::guard`] or [`UrlValidator::validate`] before doing any work.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/health` | liveness |
//! | `GET /api/lab1/vulnerable/users/{id}` | any record, no credential |
//! | `POST /api/lab1/fixed/login` | issue a session token |
//! | `GET /api/lab1/fixed/users/{id}` | own record only |
//! | `POST /api/lab2/vulnerable/fetch-metadata` | fetch any URL |
//! | `POST /api/lab2/fixed/fetch-metadata` | validate, then fetch |
//!
//! Unknown paths answer `404 NotFound` and a wrong method on a known path
//! answers `405 MethodNotAllowed`, both as JSON.
//!
//! Errors are rendered by the [`IntoResponse`](axum::response::IntoResponse)
//! impl on [`Violation`].

use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::Violation;
use crate::fetch::MetadataFetch;
use crate::gate::AccessGate;
use crate::record::RecordStore;
use crate::session::SessionStore;
use crate::url_policy::UrlValidator;

mod extract;
mod idor;
mod response;
mod ssrf;

pub use extract::{ExtractMetadata, REQUEST_ID_HEADER};
pub use idor::{LoginRequest, LoginResponse};
pub use response::status_for;
pub use ssrf::{FetchRequest, FetchResponse};

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    records: Arc<RecordStore>,
    gate: Arc<AccessGate>,
    validator: Arc<UrlValidator>,
    fetcher: Arc<dyn MetadataFetch>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("records", &self.records.len())
            .field("sessions", &self.gate.sessions().len())
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates state with an empty session store.
    pub fn new(
        records: RecordStore,
        validator: UrlValidator,
        fetcher: Arc<dyn MetadataFetch>,
    ) -> Self {
        Self {
            records: Arc::new(records),
            gate: Arc::new(AccessGate::new(Arc::new(SessionStore::new()))),
            validator: Arc::new(validator),
            fetcher,
        }
    }

    /// The record store both lookups read from.
    pub fn records(&self) -> &RecordStore {
        &self.records
    }
}

/// Builds the application router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/lab1/vulnerable/users/{id}", get(idor::vulnerable_user))
        .route("/api/lab1/fixed/login", post(idor::login))
        .route("/api/lab1/fixed/users/{id}", get(idor::fixed_user))
        .route(
            "/api/lab2/vulnerable/fetch-metadata",
            post(ssrf::vulnerable_fetch),
        )
        .route("/api/lab2/fixed/fetch-metadata", post(ssrf::fixed_fetch))
        .fallback(unknown_route)
        .method_not_allowed_fallback(wrong_method)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn unknown_route() -> Violation {
    Violation::not_found("Endpoint")
}

async fn wrong_method(method: Method) -> Violation {
    Violation::method_not_allowed(method)
}
