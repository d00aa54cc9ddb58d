use std::fmt;

use thiserror::Error;

use crate::url_policy::RejectReason;

/// A denied or failed operation with details about what went wrong.
///
/// Every fallible operation in the core returns a `Violation`. The web layer
/// turns it into a structured JSON error body; nothing inside the crate
/// retries or swallows one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No credential was presented, or it does not resolve to a session.
    pub fn unauthenticated() -> Self {
        Self::new(ViolationKind::Unauthenticated, "Authentication required")
    }

    /// The caller is authenticated but asked for somebody else's record.
    pub fn forbidden() -> Self {
        Self::new(
            ViolationKind::Forbidden,
            "Access denied: You can only access your own data",
        )
    }

    /// No record exists under the requested identifier.
    pub fn not_found(what: &str) -> Self {
        Self::new(ViolationKind::NotFound, format!("{what} not found"))
    }

    /// The route exists but does not accept `method`.
    pub fn method_not_allowed(method: impl fmt::Display) -> Self {
        Self::new(
            ViolationKind::MethodNotAllowed,
            format!("Method {method} not allowed for this endpoint"),
        )
    }

    /// A required request field was missing or empty.
    pub fn field_required(field: &str) -> Self {
        Self::new(ViolationKind::FieldRequired, format!("{field} is required"))
    }

    /// The outbound call failed; `cause` carries the underlying message.
    pub fn fetch_failed(cause: impl fmt::Display) -> Self {
        Self::new(
            ViolationKind::FetchFailed,
            format!("Failed to fetch metadata: {cause}"),
        )
    }
}

/// The kind of violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Missing or unknown session credential
    Unauthenticated,
    /// Valid credential, but the identity does not own the target
    Forbidden,
    /// Unknown record identifier
    NotFound,
    /// Known route, wrong HTTP method
    MethodNotAllowed,
    /// Required input field missing
    FieldRequired,
    /// URL could not be parsed
    InvalidFormat,
    /// URL scheme other than http/https
    SchemeNotAllowed,
    /// URL host outside the domain allowlist
    DomainNotAllowlisted,
    /// URL host resolved to a private, loopback or link-local address
    PrivateOrLoopbackAddress,
    /// Network or parse failure during the outbound call
    FetchFailed,
}

impl ViolationKind {
    /// Maps the validator rejections back to their [`RejectReason`].
    pub fn reject_reason(self) -> Option<RejectReason> {
        match self {
            ViolationKind::InvalidFormat => Some(RejectReason::InvalidFormat),
            ViolationKind::SchemeNotAllowed => Some(RejectReason::SchemeNotAllowed),
            ViolationKind::DomainNotAllowlisted => Some(RejectReason::DomainNotAllowlisted),
            ViolationKind::PrivateOrLoopbackAddress => {
                Some(RejectReason::PrivateOrLoopbackAddress)
            }
            _ => None,
        }
    }
}

impl From<RejectReason> for ViolationKind {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InvalidFormat => ViolationKind::InvalidFormat,
            RejectReason::SchemeNotAllowed => ViolationKind::SchemeNotAllowed,
            RejectReason::DomainNotAllowlisted => ViolationKind::DomainNotAllowlisted,
            RejectReason::PrivateOrLoopbackAddress => ViolationKind::PrivateOrLoopbackAddress,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::Unauthenticated => "Unauthenticated",
            ViolationKind::Forbidden => "Forbidden",
            ViolationKind::NotFound => "NotFound",
            ViolationKind::MethodNotAllowed => "MethodNotAllowed",
            ViolationKind::FieldRequired => "FieldRequired",
            ViolationKind::InvalidFormat => "InvalidFormat",
            ViolationKind::SchemeNotAllowed => "SchemeNotAllowed",
            ViolationKind::DomainNotAllowlisted => "DomainNotAllowlisted",
            ViolationKind::PrivateOrLoopbackAddress => "PrivateOrLoopbackAddress",
            ViolationKind::FetchFailed => "FetchFailed",
        };
        f.write_str(name)
    }
}
