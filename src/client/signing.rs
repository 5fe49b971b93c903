//! Request signing seam.
//!
//! Some payment endpoints require a `Tl-Signature` header: a detached JWS
//! over the method, path, selected headers and body. Producing it needs a
//! private key and an ECDSA implementation, which this crate leaves to the
//! caller. Anything implementing [`RequestSigner`] (including a plain
//! closure) can be installed on the client.

use crate::Result;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "tl-signature";

/// The parts of a request covered by the signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// Upper-case HTTP method
    pub method: &'a str,
    /// URL path, e.g. `/v3/payments`
    pub path: &'a str,
    /// Headers to include, in signing order
    pub headers: &'a [(&'a str, &'a str)],
    /// Exact body bytes that will be sent
    pub body: &'a [u8],
}

/// Produces the value of the [`SIGNATURE_HEADER`] for a request.
///
/// # Example
///
/// ```
/// use truelayer_rs::{RequestSigner, SignableRequest};
///
/// let signer = |request: &SignableRequest<'_>| -> truelayer_rs::Result<String> {
///     Ok(format!("signed-{}-{}", request.method, request.path))
/// };
///
/// let request = SignableRequest {
///     method: "POST",
///     path: "/v3/payments",
///     headers: &[],
///     body: b"{}",
/// };
/// assert_eq!(signer.sign(&request).unwrap(), "signed-POST-/v3/payments");
/// ```
pub trait RequestSigner: Send + Sync {
    /// Sign `request`.
    ///
    /// # Errors
    ///
    /// Implementations should return [`Error::Signing`](crate::Error::Signing)
    /// when no signature can be produced.
    fn sign(&self, request: &SignableRequest<'_>) -> Result<String>;
}

impl<F> RequestSigner for F
where
    F: Fn(&SignableRequest<'_>) -> Result<String> + Send + Sync,
{
    fn sign(&self, request: &SignableRequest<'_>) -> Result<String> {
        self(request)
    }
}
