//! Authentication for the TrueLayer API.
//!
//! TrueLayer uses the OAuth2 client-credentials grant: a client ID and
//! secret are exchanged for a short-lived access token at
//! `{auth}/connect/token`. This module provides:
//!
//! 1. [`ClientCredentials`] and [`AccessToken`] - the inputs and output
//! 2. [`TokenIssuer`] - runs the grant ([`HttpTokenIssuer`] over HTTP)
//! 3. [`CredentialsCache`] - keeps tokens until they expire and makes
//!    concurrent callers share one fetch ([`InMemoryCredentialsCache`]),
//!    or not at all ([`NoopCredentialsCache`])
//! 4. [`Authenticator`] - ties the three together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use truelayer_rs::auth::{
//!     Authenticator, ClientCredentials, HttpTokenIssuer, InMemoryCredentialsCache,
//! };
//! use truelayer_rs::{ClientConfig, Environment, ReqwestTransport};
//!
//! # async fn example() -> truelayer_rs::Result<()> {
//! let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default())?);
//! let authenticator = Authenticator::new(
//!     ClientCredentials::new("client-id", "client-secret")?,
//!     Arc::new(HttpTokenIssuer::new(transport, &Environment::Sandbox)?),
//!     Arc::new(InMemoryCredentialsCache::new()),
//! );
//!
//! let token = authenticator.access_token(&["payments".to_string()]).await?;
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod cache;
mod credentials;
mod issuer;
mod token;

pub use authenticator::Authenticator;
pub use cache::{
    CachedCredential, CredentialsCache, InMemoryCredentialsCache, NoopCredentialsCache,
    TokenFetch, DEFAULT_EXPIRY_MARGIN,
};
pub use credentials::{ClientCredentials, CredentialsKey};
pub use issuer::{HttpTokenIssuer, TokenIssuer};
pub use token::AccessToken;
