//! JSON error bodies for [`Violation`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{Violation, ViolationKind};
use crate::url_policy::RejectReason;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<RejectReason>,
}

/// HTTP status for each violation kind.
pub fn status_for(kind: ViolationKind) -> StatusCode {
    match kind {
        ViolationKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ViolationKind::Forbidden => StatusCode::FORBIDDEN,
        ViolationKind::NotFound => StatusCode::NOT_FOUND,
        ViolationKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ViolationKind::FieldRequired
        | ViolationKind::InvalidFormat
        | ViolationKind::SchemeNotAllowed
        | ViolationKind::DomainNotAllowlisted
        | ViolationKind::PrivateOrLoopbackAddress => StatusCode::BAD_REQUEST,
        ViolationKind::FetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Violation {
    fn into_response(self) -> Response {
        let reason = self.kind.reject_reason();
        let error = match reason {
            Some(_) => format!("URL validation failed: {}", self.message),
            None => self.message,
        };

        let body = ErrorBody {
            success: false,
            error,
            kind: self.kind.to_string(),
            reason,
        };

        (status_for(self.kind), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    async fn render(violation: Violation) -> (StatusCode, Value) {
        let response = violation.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn forbidden_renders_403_without_reason() {
        let (status, body) = render(Violation::forbidden()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Access denied: You can only access your own data",
                "kind": "Forbidden",
            })
        );
    }

    #[tokio::test]
    async fn url_rejection_renders_reason_and_prefix() {
        let violation = Violation::new(
            ViolationKind::DomainNotAllowlisted,
            "Domain not in allowlist: 169.254.169.254",
        );
        let (status, body) = render(violation).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "DomainNotAllowlisted");
        assert_eq!(
            body["error"],
            "URL validation failed: Domain not in allowlist: 169.254.169.254"
        );
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(status_for(ViolationKind::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ViolationKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ViolationKind::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(status_for(ViolationKind::FieldRequired), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ViolationKind::FetchFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
