//! Lab 2: server-side request forgery.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::required_field;
use super::AppState;
use crate::error::Violation;
use crate::request::RequestMeta;

/// Fetch body.
#[derive(Debug, Default, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    url: Option<String>,
}

/// Successful fetch.
#[derive(Debug, Serialize)]
pub struct FetchResponse {
    success: bool,
    metadata: Value,
}

/// `POST /api/lab2/vulnerable/fetch-metadata`
pub(super) async fn vulnerable_fetch(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Result<Json<FetchRequest>, JsonRejection>,
) -> Result<Json<FetchResponse>, Violation> {
    let url = required_field(body, "URL", |req| req.url)?;

    tracing::warn!(
        request_id = %meta.request_id,
        url = %url,
        "fetching caller-supplied URL without validation"
    );

    fetch(&state, &meta, &url).await
}

/// `POST /api/lab2/fixed/fetch-metadata`
pub(super) async fn fixed_fetch(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Result<Json<FetchRequest>, JsonRejection>,
) -> Result<Json<FetchResponse>, Violation> {
    let url = required_field(body, "URL", |req| req.url)?;

    // Name resolution blocks.
    let validator = Arc::clone(&state.validator);
    let target = url.clone();
    let decision = tokio::task::spawn_blocking(move || validator.validate(&target))
        .await
        .map_err(Violation::fetch_failed)?;

    if let Some(reason) = decision.reason {
        tracing::info!(
            request_id = %meta.request_id,
            url = %url,
            reason = ?reason,
            "URL rejected"
        );
    }
    decision.into_result()?;

    fetch(&state, &meta, &url).await
}

async fn fetch(
    state: &AppState,
    meta: &RequestMeta,
    url: &str,
) -> Result<Json<FetchResponse>, Violation> {
    match state.fetcher.fetch_json(url).await {
        Ok(metadata) => {
            tracing::info!(request_id = %meta.request_id, url, "metadata fetched");
            Ok(Json(FetchResponse {
                success: true,
                metadata,
            }))
        }
        Err(violation) => {
            tracing::warn!(
                request_id = %meta.request_id,
                url,
                error = %violation.message,
                "metadata fetch failed"
            );
            Err(violation)
        }
    }
}
