//! Library card credentials and the lookup trait.

use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A library card barcode and its PIN.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub barcode: String,
    pub pin: String,
}

impl Credentials {
    pub fn new(barcode: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("barcode", &self.barcode)
            .field("pin", &"<redacted>")
            .finish()
    }
}

/// Where the download center looks up credentials.
///
/// Implementations are owned by the application; the center only reads.
pub trait CredentialStore: Send + Sync {
    /// The credentials to use right now, if the user has provided any.
    fn credentials(&self) -> Option<Credentials>;
}

/// An in-memory [`CredentialStore`] whose content can be replaced at runtime.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    inner: RwLock<Option<Credentials>>,
}

impl StaticCredentials {
    /// A store holding `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: RwLock::new(Some(credentials)),
        }
    }

    /// An empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replaces the stored credentials.
    pub fn set(&self, credentials: Option<Credentials>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = credentials;
    }
}

impl CredentialStore for StaticCredentials {
    fn credentials(&self) -> Option<Credentials> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials_roundtrip() {
        let store = StaticCredentials::empty();
        assert!(store.credentials().is_none());

        store.set(Some(Credentials::new("1234", "5678")));
        assert_eq!(store.credentials(), Some(Credentials::new("1234", "5678")));

        store.set(None);
        assert!(store.credentials().is_none());
    }

    #[test]
    fn test_debug_hides_pin() {
        let debug = format!("{:?}", Credentials::new("1234", "secret"));
        assert!(debug.contains("1234"));
        assert!(!debug.contains("secret"));
    }
}
