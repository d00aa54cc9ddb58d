/// A policy requirement that must be satisfied.
///
/// Requirements are evaluated in the order they were added during
/// `PolicyGate::build()`, stopping at the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyReq {
    /// Requires a credential that resolves to a live session
    Authenticated,
    /// Requires the authenticated principal to be the owner of `id`
    OwnsRecord {
        /// Identifier of the record being read
        id: String,
    },
}

/// Policy requiring authentication.
///
/// Satisfied when the request carries a session token known to the
/// `SessionStore`.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

/// Policy restricting a read to the caller's own record.
///
/// Ownership is exact string equality between the session's record
/// identifier and the requested one. There are no roles, groups or
/// delegation.
#[derive(Debug, Clone)]
pub struct OwnsRecord {
    id: String,
}

impl OwnsRecord {
    /// Creates an ownership requirement for the record `id`.
    pub fn id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<Authenticated> for PolicyReq {
    fn from(_: Authenticated) -> Self {
        PolicyReq::Authenticated
    }
}

impl From<OwnsRecord> for PolicyReq {
    fn from(owns: OwnsRecord) -> Self {
        PolicyReq::OwnsRecord { id: owns.id }
    }
}
