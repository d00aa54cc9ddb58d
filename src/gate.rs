use std::sync::Arc;

use uuid::Uuid;

use crate::{
    context::Ctx,
    error::Violation,
    policy::{Authenticated, OwnsRecord, PolicyReq},
    record::PrincipalRecord,
    request::RequestMeta,
    session::SessionStore,
};

/// The authorization gate for identity-scoped reads.
///
/// `AccessGate` owns the session store and is the only way to obtain a
/// [`Ctx`]. The fixed user lookup calls [`guard`](Self::guard) before it
/// touches any data; the vulnerable lookup never calls it.
///
/// Checks run in this order and stop at the first failure:
///
/// 1. credential missing or unknown → `Unauthenticated`
/// 2. session record id differs from the requested id → `Forbidden`
/// 3. otherwise the wrapped operation runs and its result is returned as is
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use seclab_core::{AccessGate, RecordStore, SessionStore, ViolationKind};
///
/// let records = RecordStore::seeded();
/// let gate = AccessGate::new(Arc::new(SessionStore::new()));
/// let token = gate.sessions().create_session(records.get("1").unwrap());
///
/// let own = gate.authorize(Some(token.as_str()), "1").unwrap();
/// assert_eq!(own.id, "1");
///
/// let other = gate.authorize(Some(token.as_str()), "2").unwrap_err();
/// assert_eq!(other.kind, ViolationKind::Forbidden);
///
/// let anonymous = gate.authorize(None, "1").unwrap_err();
/// assert_eq!(anonymous.kind, ViolationKind::Unauthenticated);
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    sessions: Arc<SessionStore>,
}

impl AccessGate {
    /// Creates a gate backed by `sessions`.
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Returns the session store the gate resolves credentials against.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Starts a policy check for one request.
    pub fn check(&self, meta: RequestMeta) -> PolicyGate<'_> {
        PolicyGate {
            sessions: &self.sessions,
            meta,
            requirements: Vec::new(),
        }
    }

    /// Resolves `token` and checks that it owns `requested_id`.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` if the token is absent or unknown, `Forbidden` if it
    /// belongs to a different principal.
    pub fn authorize(
        &self,
        token: Option<&str>,
        requested_id: &str,
    ) -> Result<Arc<PrincipalRecord>, Violation> {
        let meta = RequestMeta {
            request_id: Uuid::new_v4().to_string(),
            credential: token.map(str::to_owned),
        };
        self.guard(meta, requested_id, Arc::clone)
    }

    /// Runs `op` on the caller's record once it is proven to own `requested_id`.
    ///
    /// # Errors
    ///
    /// Same as [`authorize`](Self::authorize); `op` is not called on error.
    pub fn guard<T>(
        &self,
        meta: RequestMeta,
        requested_id: &str,
        op: impl FnOnce(&Arc<PrincipalRecord>) -> T,
    ) -> Result<T, Violation> {
        let ctx = self
            .check(meta)
            .require(Authenticated)
            .require(OwnsRecord::id(requested_id))
            .build()?;

        let record = ctx.principal().ok_or_else(Violation::unauthenticated)?;
        Ok(op(record))
    }
}

/// Builder that accumulates requirements for one request.
///
/// Obtained from [`AccessGate::check`].
#[derive(Debug)]
pub struct PolicyGate<'a> {
    sessions: &'a SessionStore,
    meta: RequestMeta,
    requirements: Vec<PolicyReq>,
}

impl PolicyGate<'_> {
    /// Adds a requirement, ignoring exact duplicates.
    pub fn require(mut self, policy: impl Into<PolicyReq>) -> Self {
        let req = policy.into();
        if !self.requirements.contains(&req) {
            self.requirements.push(req);
        }
        self
    }

    /// Validates every requirement and returns the resulting context.
    ///
    /// # Errors
    ///
    /// Returns the `Violation` of the first requirement that fails.
    pub fn build(self) -> Result<Ctx, Violation> {
        let principal = self
            .meta
            .credential
            .as_deref()
            .and_then(|token| self.sessions.resolve(token).ok());

        for req in &self.requirements {
            if let Err(violation) = validate_one(req, principal.as_deref()) {
                tracing::info!(
                    request_id = %self.meta.request_id,
                    kind = %violation.kind,
                    "access denied"
                );
                return Err(violation);
            }
        }

        Ok(Ctx::new(self.meta.request_id, principal))
    }
}

fn validate_one(req: &PolicyReq, principal: Option<&PrincipalRecord>) -> Result<(), Violation> {
    let principal = principal.ok_or_else(Violation::unauthenticated)?;
    match req {
        PolicyReq::Authenticated => Ok(()),
        PolicyReq::OwnsRecord { id } if principal.id == *id => Ok(()),
        PolicyReq::OwnsRecord { .. } => Err(Violation::forbidden()),
    }
}
