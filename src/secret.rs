use std::fmt;

use serde::Serializer;

/// A credential-like profile field that must not show up in logs.
///
/// Principal records carry a private API key. `Secret<T>` keeps it out of
/// every `Debug`/`Display` rendering, so a record can be logged with `?record`
/// without leaking the key. The value is reachable only through
/// [`expose_secret`](Self::expose_secret) or, for JSON bodies, the
/// [`serialize_exposed`] helper.
///
/// # Examples
///
/// ```
/// use seclab_core::Secret;
///
/// let api_key = Secret::new("sk_live_jordan_12345abcdef".to_string());
///
/// assert_eq!(format!("{:?}", api_key), "[REDACTED]");
/// assert_eq!(format!("{}", api_key), "[REDACTED]");
/// assert_eq!(api_key.expose_secret(), "sk_live_jordan_12345abcdef");
/// ```
// Do NOT derive Clone or Default: records are shared through Arc, never copied.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    ///
    /// Callers must not log what this returns.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Serializes the raw secret value.
///
/// Used with `#[serde(serialize_with = ...)]` on record fields that are
/// deliberately returned to callers. `Secret` itself does not implement
/// `Serialize`, so every field that leaks into a response body is opted in
/// by name.
pub fn serialize_exposed<T, S>(secret: &Secret<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: serde::Serialize,
    S: Serializer,
{
    secret.expose_secret().serialize(serializer)
}
