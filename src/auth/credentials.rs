//! Client credentials and the cache key derived from them.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeSet;
use std::fmt;

use crate::{Error, Result};

/// OAuth2 client credentials issued in the TrueLayer console.
///
/// The secret is kept in a [`SecretString`] and never printed.
///
/// # Example
///
/// ```
/// use truelayer_rs::ClientCredentials;
///
/// let credentials = ClientCredentials::new("my-client", "my-secret").unwrap();
/// assert_eq!(credentials.client_id(), "my-client");
/// assert!(!format!("{:?}", credentials).contains("my-secret"));
///
/// assert!(ClientCredentials::new("", "my-secret").is_err());
/// ```
pub struct ClientCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl ClientCredentials {
    /// Create credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either value is empty.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(Error::InvalidInput("client_id must not be empty".to_string()));
        }
        if client_secret.trim().is_empty() {
            return Err(Error::InvalidInput(
                "client_secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
        })
    }

    /// The client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Cache key for tokens of these credentials with `scopes`.
    pub fn cache_key<S: AsRef<str>>(&self, scopes: &[S]) -> CredentialsKey {
        CredentialsKey::new(&self.client_id, scopes)
    }
}

impl Clone for ClientCredentials {
    fn clone(&self) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: SecretString::from(self.client_secret().to_string()),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Identifies one cacheable token: a client ID plus a set of scopes.
///
/// Scopes are sorted and deduplicated, so `["a", "b"]` and `["b", "a", "a"]`
/// produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialsKey {
    client_id: String,
    scopes: Vec<String>,
}

impl CredentialsKey {
    /// Build a key.
    pub fn new<S: AsRef<str>>(client_id: impl Into<String>, scopes: &[S]) -> Self {
        let scopes: BTreeSet<String> = scopes
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            client_id: client_id.into(),
            scopes: scopes.into_iter().collect(),
        }
    }

    /// The client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The normalized scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

impl fmt::Display for CredentialsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.client_id, self.scopes.join(" "))
    }
}
