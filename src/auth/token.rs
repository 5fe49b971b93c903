//! OAuth2 access tokens.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;

/// An access token returned by the token endpoint.
#[derive(Deserialize)]
pub struct AccessToken {
    #[serde(deserialize_with = "deserialize_secret")]
    access_token: SecretString,
    /// Token type, normally `Bearer`
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds from issuance
    pub expires_in: u64,
    /// Space-separated granted scopes
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AccessToken {
    /// Create a token.
    pub fn new(access_token: impl Into<String>, expires_in: u64) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            token_type: default_token_type(),
            expires_in,
            scope: None,
        }
    }

    /// The bearer value. Do not log it.
    pub fn secret(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Lifetime from issuance.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self {
            access_token: SecretString::from(self.secret().to_string()),
            token_type: self.token_type.clone(),
            expires_in: self.expires_in,
            scope: self.scope.clone(),
        }
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.secret() == other.secret()
            && self.token_type == other.token_type
            && self.expires_in == other.expires_in
            && self.scope == other.scope
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}
