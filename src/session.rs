use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use uuid::Uuid;

use crate::record::PrincipalRecord;

/// Opaque session token handed out by [`SessionStore::create_session`].
///
/// A UUID v4 string (122 random bits). `Debug` only shows a prefix so tokens
/// can appear in logs without being replayable from them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the token text to send back to the client.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

/// Returned by [`SessionStore::resolve`] for unknown tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session not found")]
pub struct SessionNotFound;

/// Maps session tokens to the principal record they authenticate.
///
/// Sessions are created by login and live until the process exits; there is
/// no expiry and no revocation. The map sits behind an `RwLock` so concurrent
/// logins and lookups never lose an insertion or observe a torn entry.
///
/// # Examples
///
/// ```
/// use seclab_core::{RecordStore, SessionStore};
///
/// let records = RecordStore::seeded();
/// let sessions = SessionStore::new();
///
/// let token = sessions.create_session(records.get("1").unwrap());
/// let record = sessions.resolve(token.as_str()).unwrap();
/// assert_eq!(record.id, "1");
///
/// assert!(sessions.resolve("not-a-token").is_err());
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<PrincipalRecord>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token bound to `record`.
    ///
    /// The token is unique among live tokens: on the (negligible) chance of a
    /// UUID collision a new one is drawn.
    pub fn create_session(&self, record: Arc<PrincipalRecord>) -> SessionToken {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            let token = SessionToken::generate();
            if let Entry::Vacant(slot) = sessions.entry(token.0.clone()) {
                tracing::debug!(principal = %record.id, token = ?token, "session created");
                slot.insert(record);
                return token;
            }
        }
    }

    /// Returns the record bound to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionNotFound`] if the token was never issued.
    pub fn resolve(&self, token: &str) -> Result<Arc<PrincipalRecord>, SessionNotFound> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(SessionNotFound)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no session has been created.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
