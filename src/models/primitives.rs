//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time, plus the
//! [`Environment`] that decides which TrueLayer hosts the client talks to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed payment ID.
///
/// # Example
///
/// ```
/// use truelayer_rs::PaymentId;
///
/// let payment = PaymentId::new("a-payment-id");
/// println!("Payment: {}", payment);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    /// Create a new payment ID from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the payment ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PaymentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PaymentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed merchant account ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantAccountId(String);

impl MerchantAccountId {
    /// Create a new merchant account ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the merchant account ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MerchantAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MerchantAccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for MerchantAccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MerchantAccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed mandate ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MandateId(String);

impl MandateId {
    /// Create a new mandate ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the mandate ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MandateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MandateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Base URLs of a non-standard deployment, e.g. a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentUris {
    /// Authorization server (token endpoint host)
    pub auth: String,
    /// Payments API, including any version prefix
    pub payments: String,
    /// Hosted payment page
    pub hpp: String,
}

/// Environment configuration for the TrueLayer API.
///
/// Determines which hosts are used for authentication, payments and the
/// hosted payment page. Defaults to [`Environment::Live`].
///
/// # Example
///
/// ```
/// use truelayer_rs::Environment;
///
/// let env = Environment::Sandbox;
/// assert_eq!(env.auth_base_url(), "https://auth.truelayer-sandbox.com");
///
/// let local = Environment::custom("http://localhost:8080");
/// assert_eq!(local.payments_base_url(), "http://localhost:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production environment - real payments with real money.
    #[default]
    Live,
    /// Sandbox environment - for testing with mock providers.
    Sandbox,
    /// Explicit base URLs.
    Custom(EnvironmentUris),
}

impl Environment {
    /// Point every API at the same base URL (trailing slashes removed).
    pub fn custom(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Environment::Custom(EnvironmentUris {
            auth: base.clone(),
            payments: base.clone(),
            hpp: base,
        })
    }

    /// Base URL of the authorization server.
    pub fn auth_base_url(&self) -> &str {
        match self {
            Environment::Live => "https://auth.truelayer.com",
            Environment::Sandbox => "https://auth.truelayer-sandbox.com",
            Environment::Custom(uris) => &uris.auth,
        }
    }

    /// Base URL of the payments API.
    pub fn payments_base_url(&self) -> &str {
        match self {
            Environment::Live => "https://api.truelayer.com/v3",
            Environment::Sandbox => "https://api.truelayer-sandbox.com/v3",
            Environment::Custom(uris) => &uris.payments,
        }
    }

    /// Base URL of the hosted payment page.
    pub fn hpp_base_url(&self) -> &str {
        match self {
            Environment::Live => "https://payment.truelayer.com",
            Environment::Sandbox => "https://payment.truelayer-sandbox.com",
            Environment::Custom(uris) => &uris.hpp,
        }
    }

    /// Returns `true` if this is the live environment.
    pub fn is_live(&self) -> bool {
        matches!(self, Environment::Live)
    }

    /// Returns `true` if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Live => write!(f, "live"),
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Custom(uris) => write!(f, "custom({})", uris.payments),
        }
    }
}
