//! Access token acquisition for API calls.

use futures_util::FutureExt;
use std::fmt;
use std::sync::Arc;

use super::cache::{CredentialsCache, TokenFetch};
use super::credentials::ClientCredentials;
use super::issuer::TokenIssuer;
use super::token::AccessToken;
use crate::{Error, Result};

/// Combines credentials, an issuer and a cache into "give me a token".
///
/// Cloning is cheap; clones share the issuer and the cache.
#[derive(Clone)]
pub struct Authenticator {
    credentials: ClientCredentials,
    issuer: Arc<dyn TokenIssuer>,
    cache: Arc<dyn CredentialsCache>,
}

impl Authenticator {
    /// Create an authenticator.
    pub fn new(
        credentials: ClientCredentials,
        issuer: Arc<dyn TokenIssuer>,
        cache: Arc<dyn CredentialsCache>,
    ) -> Self {
        Self {
            credentials,
            issuer,
            cache,
        }
    }

    /// The credentials tokens are requested with.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// The issuer used on cache misses.
    pub fn issuer(&self) -> &Arc<dyn TokenIssuer> {
        &self.issuer
    }

    /// A valid token for `scopes`, from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `scopes` is empty and
    /// [`Error::Issuance`] if a token could not be obtained.
    pub async fn access_token(&self, scopes: &[String]) -> Result<AccessToken> {
        let key = self.credentials.cache_key(scopes);
        if key.scopes().is_empty() {
            return Err(Error::InvalidInput("at least one scope is required".to_string()));
        }

        let issuer = Arc::clone(&self.issuer);
        let credentials = self.credentials.clone();
        let scopes = key.scopes().to_vec();
        let fetch: TokenFetch = async move { issuer.issue(&credentials, &scopes).await }.boxed();

        self.cache.get_token(&key, fetch).await
    }

    /// Drop the cached token for `scopes`, e.g. after the API rejected it.
    pub fn invalidate(&self, scopes: &[String]) {
        self.cache.invalidate(&self.credentials.cache_key(scopes));
    }

    /// Drop `token` from the cache for `scopes` after the API rejected it.
    ///
    /// A different token cached in the meantime, or a fetch in flight, is
    /// kept.
    pub fn reject(&self, scopes: &[String], token: &AccessToken) {
        self.cache
            .invalidate_token(&self.credentials.cache_key(scopes), token);
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
