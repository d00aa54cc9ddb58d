//! Lab 1: insecure direct object reference.
//!
//! The vulnerable lookup serves any record to anyone. The fixed lookup runs
//! behind [`AccessGate::guard`](crate::AccessGate::guard), so a caller only
//! ever sees the record its session was created for.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::extract::required_field;
use super::AppState;
use crate::error::Violation;
use crate::record::PrincipalRecord;
use crate::request::RequestMeta;

/// Login body. `identifier` is accepted as an alias of `userId`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userId", alias = "identifier", default)]
    user_id: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    success: bool,
    token: String,
    id: String,
    name: String,
}

/// `GET /api/lab1/vulnerable/users/{id}`
pub(super) async fn vulnerable_user(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Result<Json<Arc<PrincipalRecord>>, Violation> {
    tracing::warn!(
        request_id = %meta.request_id,
        requested_id = %id,
        "serving record without any ownership check"
    );

    state.records.get(&id).map(Json)
}

/// `POST /api/lab1/fixed/login`
pub(super) async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, Violation> {
    let user_id = required_field(body, "userId", |req| req.user_id)?;
    let record = state.records.get(&user_id)?;

    let token = state.gate.sessions().create_session(Arc::clone(&record));
    tracing::info!(
        request_id = %meta.request_id,
        user_id = %record.id,
        token = ?token,
        "session created"
    );

    Ok(Json(LoginResponse {
        success: true,
        token: token.into_string(),
        id: record.id.clone(),
        name: record.name.clone(),
    }))
}

/// `GET /api/lab1/fixed/users/{id}`
pub(super) async fn fixed_user(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Result<Json<Arc<PrincipalRecord>>, Violation> {
    let request_id = meta.request_id.clone();
    let record = state.gate.guard(meta, &id, Arc::clone)?;

    tracing::info!(request_id = %request_id, user_id = %record.id, "own record served");
    Ok(Json(record))
}
