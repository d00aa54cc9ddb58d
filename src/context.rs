use std::sync::Arc;

use crate::record::PrincipalRecord;

/// Authorization context produced by a successful `PolicyGate::build()`.
///
/// Holds the request identifier and, when the gate required authentication,
/// the record the caller's session resolved to.
///
/// # Construction
///
/// `Ctx` cannot be constructed by user code. It only comes out of the gate,
/// so holding one is proof that every requirement passed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use seclab_core::{AccessGate, Authenticated, OwnsRecord, RecordStore, RequestMeta, SessionStore};
///
/// let records = RecordStore::seeded();
/// let gate = AccessGate::new(Arc::new(SessionStore::new()));
/// let token = gate.sessions().create_session(records.get("1").unwrap());
///
/// let meta = RequestMeta::anonymous("req-1").with_credential(token.as_str());
/// let ctx = gate
///     .check(meta)
///     .require(Authenticated)
///     .require(OwnsRecord::id("1"))
///     .build()
///     .expect("caller owns record 1");
///
/// assert_eq!(ctx.principal().unwrap().name, "Jordan");
/// ```
#[derive(Debug, Clone)]
pub struct Ctx {
    request_id: String,
    principal: Option<Arc<PrincipalRecord>>,
}

impl Ctx {
    pub(crate) fn new(request_id: String, principal: Option<Arc<PrincipalRecord>>) -> Self {
        Self {
            request_id,
            principal,
        }
    }

    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the authenticated principal's record, if one was resolved.
    pub fn principal(&self) -> Option<&Arc<PrincipalRecord>> {
        self.principal.as_ref()
    }
}
