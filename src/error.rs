//! Error types for the TrueLayer API client.
//!
//! Expected API failures (a well-formed non-2xx response) are not errors:
//! they come back inside [`ApiResponse`](crate::ApiResponse) as
//! [`ProblemDetails`](crate::models::ProblemDetails). The [`Error`] type
//! covers everything that prevents the client from producing such a
//! response in the first place.

use std::fmt;

use thiserror::Error;

/// A specialized `Result` type for TrueLayer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all TrueLayer client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A payload could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A narrowing accessor was called on the wrong variant
    #[error("Type mismatch: {0}")]
    TypeMismatch(#[from] TypeMismatchError),

    /// Fetching an OAuth2 access token failed
    #[error("Token issuance failed: {0}")]
    Issuance(#[from] IssuanceError),

    /// No interpretable response was received from the server
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid input provided to a constructor or function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request signer failed to produce a signature
    #[error("Signing error: {0}")]
    Signing(String),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    ///
    /// # Example
    ///
    /// ```
    /// use truelayer_rs::error::{Error, TransportError, TransportErrorKind};
    ///
    /// let err = Error::from(TransportError::new(TransportErrorKind::Timeout, "timed out"));
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_retryable(),
            Error::Issuance(e) => e.status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Issuance(_))
    }
}

/// A payload could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not a JSON object
    #[error("{family} payload is not a JSON object")]
    NotAnObject {
        /// Family being decoded
        family: &'static str,
    },

    /// The discriminator field is absent or not a string
    #[error("{family} payload is missing discriminator field `{field}`")]
    MissingDiscriminator {
        /// Family being decoded
        family: &'static str,
        /// Name of the discriminator field
        field: &'static str,
    },

    /// The discriminator names a variant this family does not know and
    /// no fallback is configured
    #[error("{family} has no variant for {field}=`{tag}`")]
    UnknownTag {
        /// Family being decoded
        family: &'static str,
        /// Name of the discriminator field
        field: &'static str,
        /// The unrecognized tag value
        tag: String,
    },

    /// The payload was structurally wrong for the selected type
    #[error("invalid {target} payload: {message}")]
    Payload {
        /// Type or variant being decoded
        target: String,
        /// Underlying deserializer message
        message: String,
    },
}

impl DecodeError {
    pub(crate) fn payload(target: impl Into<String>, err: impl fmt::Display) -> Self {
        DecodeError::Payload {
            target: target.into(),
            message: err.to_string(),
        }
    }
}

/// A narrowing accessor (`as_*`) was invoked on the wrong variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{family} is of type {actual}. Consider using {accessor}() instead.")]
pub struct TypeMismatchError {
    /// Family the value belongs to
    pub family: &'static str,
    /// Variant the caller asked for
    pub expected: &'static str,
    /// Variant the value actually is
    pub actual: &'static str,
    /// Accessor matching the actual variant
    pub accessor: &'static str,
}

/// Fetching an access token failed.
///
/// Cloneable so a single failed fetch can be handed to every caller
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct IssuanceError {
    /// HTTP status of the token endpoint response, if one was received
    pub status: Option<u16>,
    /// Human-readable reason
    pub message: String,
}

impl fmt::Display for IssuanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status={}, {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl IssuanceError {
    /// Create a new issuance error.
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Category of a [`TransportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The call did not complete within the configured timeout
    Timeout,
    /// A connection could not be established or was reset
    Connect,
    /// The response body could not be read
    Body,
    /// A success response carried a body that is not valid JSON
    MalformedBody,
    /// Anything else the transport reported
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Body => "body",
            TransportErrorKind::MalformedBody => "malformed body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// No interpretable server response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category
    pub kind: TransportErrorKind,
    /// Human-readable reason
    pub message: String,
}

impl TransportError {
    /// Create a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Timeout | TransportErrorKind::Connect
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        TransportError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let timeout = Error::from(TransportError::new(TransportErrorKind::Timeout, "slow"));
        assert!(timeout.is_retryable());

        let malformed = Error::from(TransportError::new(
            TransportErrorKind::MalformedBody,
            "not json",
        ));
        assert!(!malformed.is_retryable());

        assert!(Error::from(IssuanceError::new(Some(503), "down")).is_retryable());
        assert!(!Error::from(IssuanceError::new(Some(401), "bad client")).is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
    }

    #[test]
    fn test_error_auth() {
        assert!(Error::from(IssuanceError::new(Some(401), "invalid_client")).is_auth_error());
        assert!(!Error::Config("missing".into()).is_auth_error());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = TypeMismatchError {
            family: "beneficiary",
            expected: "ExternalAccount",
            actual: "MerchantAccount",
            accessor: "as_merchant_account",
        };
        assert_eq!(
            err.to_string(),
            "beneficiary is of type MerchantAccount. Consider using as_merchant_account() instead."
        );
    }

    #[test]
    fn test_issuance_error_display() {
        assert_eq!(
            IssuanceError::new(Some(400), "invalid_client").to_string(),
            "status=400, invalid_client"
        );
        assert_eq!(
            IssuanceError::new(None, "connection reset").to_string(),
            "connection reset"
        );
    }
}
