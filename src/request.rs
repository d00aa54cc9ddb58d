/// Metadata about an incoming request.
///
/// Carries the request identifier used in log lines and the raw credential,
/// if the caller presented one. The credential is unverified until the
/// [`AccessGate`](crate::AccessGate) resolves it.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Session token taken from the `Authorization` header, if any
    pub credential: Option<String>,
}

impl RequestMeta {
    /// Creates metadata with no credential.
    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            credential: None,
        }
    }

    /// Attaches a credential.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

/// Pulls the session token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` as well as a bare token. Blank values yield `None`.
///
/// ```
/// use seclab_core::credential_from_header;
///
/// assert_eq!(credential_from_header("Bearer abc"), Some("abc"));
/// assert_eq!(credential_from_header("abc"), Some("abc"));
/// assert_eq!(credential_from_header("Bearer   "), None);
/// ```
pub fn credential_from_header(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let token = match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &value[7..],
        _ => value,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}
