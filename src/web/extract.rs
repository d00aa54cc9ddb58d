//! Extraction boundary between axum requests and core types.
//!
//! This layer only maps HTTP values onto [`RequestMeta`] and required body
//! fields. It never resolves a credential; that is the gate's job.

use std::convert::Infallible;
use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use uuid::Uuid;

use crate::error::Violation;
use crate::request::{credential_from_header, RequestMeta};

/// Header carrying a caller-chosen request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Extracts request metadata from a framework-specific request.
///
/// Implementations provide the request identifier and the raw, unverified
/// credential. They must not grant anything.
pub trait ExtractMetadata {
    /// Builds the metadata for this request.
    fn extract_metadata(&self) -> RequestMeta;
}

impl ExtractMetadata for Parts {
    fn extract_metadata(&self) -> RequestMeta {
        let request_id = self
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

        let credential = self
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(credential_from_header)
            .map(str::to_owned);

        RequestMeta {
            request_id,
            credential,
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let meta = parts.extract_metadata();
        async move { Ok(meta) }
    }
}

/// Pulls one required string field out of a JSON body.
///
/// An unreadable body, a missing field and a blank value are all reported as
/// `FieldRequired` for `field`.
pub(crate) fn required_field<T>(
    body: Result<Json<T>, JsonRejection>,
    field: &str,
    pick: impl FnOnce(T) -> Option<String>,
) -> Result<String, Violation> {
    let value = match body {
        Ok(Json(body)) => pick(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unusable JSON body");
            None
        }
    };

    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Violation::field_required(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn request_id_is_echoed_when_present() {
        let meta = parts(&[(REQUEST_ID_HEADER, "req-abc")]).extract_metadata();
        assert_eq!(meta.request_id, "req-abc");
    }

    #[test]
    fn request_id_is_generated_when_absent_or_oversized() {
        let generated = parts(&[]).extract_metadata();
        assert!(Uuid::parse_str(&generated.request_id).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let replaced = parts(&[(REQUEST_ID_HEADER, long.as_str())]).extract_metadata();
        assert_ne!(replaced.request_id, long);
    }

    #[test]
    fn credential_accepts_raw_and_bearer_forms() {
        let raw = parts(&[("authorization", "tok-1")]).extract_metadata();
        assert_eq!(raw.credential.as_deref(), Some("tok-1"));

        let bearer = parts(&[("authorization", "Bearer tok-2")]).extract_metadata();
        assert_eq!(bearer.credential.as_deref(), Some("tok-2"));
    }

    #[test]
    fn blank_authorization_is_no_credential() {
        let meta = parts(&[("authorization", "   ")]).extract_metadata();
        assert!(meta.credential.is_none());
    }

    #[test]
    fn required_field_rejects_missing_and_blank() {
        let missing = required_field(Ok(Json(None::<String>)), "URL", |v| v).unwrap_err();
        assert_eq!(missing.kind, ViolationKind::FieldRequired);
        assert_eq!(missing.message, "URL is required");

        let blank = required_field(Ok(Json(Some("  ".to_string()))), "URL", |v| v);
        assert!(blank.is_err());

        let present = required_field(Ok(Json(Some("x".to_string()))), "URL", |v| v);
        assert_eq!(present.unwrap(), "x");
    }
}
