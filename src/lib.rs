//! Paired vulnerable/fixed security labs for broken object-level
//! authorization (IDOR) and server-side request forgery (SSRF).
//!
//! Each lab pairs a deliberately broken endpoint with a fixed one. The fixed
//! endpoints share two small pieces of policy:
//!
//! - [`AccessGate`]: resolves a session token and allows a read only when the
//!   token belongs to the requested record
//! - [`UrlValidator`]: decides whether an outbound fetch target is an
//!   allowlisted, non-internal http(s) URL
//!
//! # Core Types
//!
//! - [`RecordStore`] / [`PrincipalRecord`]: read-only user records
//! - [`SessionStore`] / [`SessionToken`]: opaque token → record bindings
//! - [`Ctx`]: proof that a [`PolicyGate`] accepted the request
//! - [`Decision`]: validator outcome with a [`RejectReason`]
//! - [`Secret<T>`]: wrapper that redacts sensitive values in logs
//! - [`Violation`]: the single error type crossing the core boundary
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use seclab_core::{AccessGate, RecordStore, SessionStore, ViolationKind};
//!
//! let records = RecordStore::seeded();
//! let gate = AccessGate::new(Arc::new(SessionStore::new()));
//! let token = gate.sessions().create_session(records.get("1").unwrap());
//!
//! // The owner reads their own record.
//! assert_eq!(gate.authorize(Some(token.as_str()), "1").unwrap().name, "Jordan");
//!
//! // Anyone else's record is refused.
//! let err = gate.authorize(Some(token.as_str()), "2").unwrap_err();
//! assert_eq!(err.kind, ViolationKind::Forbidden);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod context;
mod error;
pub mod fetch;
mod gate;
mod policy;
mod record;
mod request;
pub mod resolve;
mod secret;
mod seed;
mod session;
mod url_policy;
pub mod web;

pub use config::LabConfig;
pub use context::Ctx;
pub use error::{Violation, ViolationKind};
pub use gate::{AccessGate, PolicyGate};
pub use policy::{Authenticated, OwnsRecord, PolicyReq};
pub use record::{Nft, PrincipalRecord, RecordStore, Transaction};
pub use request::{credential_from_header, RequestMeta};
pub use secret::{serialize_exposed, Secret};
pub use session::{SessionNotFound, SessionStore, SessionToken};
pub use url_policy::{
    is_private_or_loopback, Decision, DomainAllowlist, RejectReason, UrlValidator,
    DEFAULT_ALLOWED_DOMAINS,
};
