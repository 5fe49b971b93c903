//! The result envelope returned by every API operation.

use serde::de::DeserializeOwned;

use super::transport::HttpResponse;
use crate::error::{DecodeError, TransportError, TransportErrorKind};
use crate::models::{decode, Discriminated, ProblemDetails};
use crate::Result;

/// Response header TrueLayer uses to correlate requests in support cases.
pub const CORRELATION_ID_HEADER: &str = "tl-correlation-id";

/// Outcome of an API call that reached the server.
///
/// Holds exactly one of a success value `T` or an error value `E`
/// (by default [`ProblemDetails`]). A 4xx/5xx response is therefore not an
/// `Err` of the surrounding [`Result`]: callers inspect [`is_error`] and
/// branch.
///
/// [`is_error`]: ApiResponse::is_error
///
/// # Example
///
/// ```
/// use truelayer_rs::ApiResponse;
/// use truelayer_rs::models::ProblemDetails;
///
/// let ok: ApiResponse<u32> = ApiResponse::success(200, 7);
/// assert!(!ok.is_error());
/// assert_eq!(ok.data(), Some(&7));
///
/// let err: ApiResponse<u32> = ApiResponse::failure(404, ProblemDetails::default());
/// assert!(err.is_error());
/// assert!(err.data().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T, E = ProblemDetails> {
    status: u16,
    correlation_id: Option<String>,
    outcome: Outcome<T, E>,
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome<T, E> {
    Data(T),
    Error(E),
}

impl<T, E> ApiResponse<T, E> {
    /// Wrap a success value.
    pub fn success(status: u16, data: T) -> Self {
        Self {
            status,
            correlation_id: None,
            outcome: Outcome::Data(data),
        }
    }

    /// Wrap an error value.
    pub fn failure(status: u16, error: E) -> Self {
        Self {
            status,
            correlation_id: None,
            outcome: Outcome::Error(error),
        }
    }

    /// Attach the correlation ID reported by the server.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns `true` if the server answered with an error.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Value of the `Tl-Correlation-Id` response header, if present.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// The success value, if any.
    pub fn data(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Data(data) => Some(data),
            Outcome::Error(_) => None,
        }
    }

    /// The error value, if any.
    pub fn error(&self) -> Option<&E> {
        match &self.outcome {
            Outcome::Data(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }

    /// Take the success value, if any.
    pub fn into_data(self) -> Option<T> {
        match self.outcome {
            Outcome::Data(data) => Some(data),
            Outcome::Error(_) => None,
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<T, E> {
        match self.outcome {
            Outcome::Data(data) => Ok(data),
            Outcome::Error(error) => Err(error),
        }
    }

    /// Transform the success value, keeping status and correlation ID.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U, E> {
        ApiResponse {
            status: self.status,
            correlation_id: self.correlation_id,
            outcome: match self.outcome {
                Outcome::Data(data) => Outcome::Data(f(data)),
                Outcome::Error(error) => Outcome::Error(error),
            },
        }
    }
}

/// Interpret a raw HTTP response.
///
/// 2xx bodies decode into `T`; anything else decodes into
/// [`ProblemDetails`], synthesizing one when the body is not JSON.
pub(crate) fn from_http<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>> {
    from_http_with(response, |payload| {
        serde_json::from_value::<T>(payload)
            .map_err(|e| DecodeError::payload(std::any::type_name::<T>(), e))
    })
}

/// Like [`from_http`], but decodes a 2xx body through the family registry
/// so discriminator failures keep their specific [`DecodeError`] kind.
pub(crate) fn from_http_tagged<T: Discriminated>(
    response: HttpResponse,
) -> Result<ApiResponse<T>> {
    from_http_with(response, decode::<T>)
}

fn from_http_with<T>(
    response: HttpResponse,
    decode_payload: impl FnOnce(serde_json::Value) -> std::result::Result<T, DecodeError>,
) -> Result<ApiResponse<T>> {
    let correlation_id = response
        .headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let status = response.status;

    let envelope = if (200..300).contains(&status) {
        // 204 and friends carry no body; decode them as JSON null.
        let payload: serde_json::Value = if response.body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&response.body).map_err(|e| {
                TransportError::new(
                    TransportErrorKind::MalformedBody,
                    format!("status {} body is not JSON: {}", status, e),
                )
            })?
        };
        let data = decode_payload(payload)?;
        ApiResponse::success(status, data)
    } else {
        let problem = serde_json::from_slice::<ProblemDetails>(&response.body)
            .unwrap_or_else(|_| ProblemDetails::from_raw(status, &response.body));
        tracing::debug!(
            status,
            title = problem.title.as_deref().unwrap_or_default(),
            trace_id = problem.trace_id.as_deref().unwrap_or_default(),
            "API returned an error response"
        );
        ApiResponse::failure(status, problem)
    };

    Ok(match correlation_id {
        Some(id) => envelope.with_correlation_id(id),
        None => envelope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorizationFlowResponse, CreatePaymentResponse};
    use crate::Error;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_decodes_family() {
        let envelope: ApiResponse<CreatePaymentResponse> = from_http(response(
            201,
            r#"{"id":"pay-1","resource_token":"rt","user":{"id":"u"},"status":"authorized"}"#,
        ))
        .unwrap();

        assert!(!envelope.is_error());
        assert_eq!(envelope.status(), 201);
        assert!(envelope.data().unwrap().is_authorized());
        assert!(envelope.error().is_none());
    }

    #[test]
    fn test_error_decodes_problem_details() {
        let body = r#"{
            "type": "https://docs.truelayer.com/docs/error-types#unauthenticated",
            "title": "Unauthenticated",
            "status": 401,
            "trace_id": "trace-1",
            "detail": "Invalid access token."
        }"#;
        let mut http = response(401, body);
        http.headers
            .insert(CORRELATION_ID_HEADER, HeaderValue::from_static("corr-1"));

        let envelope: ApiResponse<CreatePaymentResponse> = from_http(http).unwrap();

        assert!(envelope.is_error());
        assert!(envelope.data().is_none());
        assert_eq!(envelope.correlation_id(), Some("corr-1"));
        let expected: ProblemDetails = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error(), Some(&expected));
    }

    #[test]
    fn test_error_with_non_json_body() {
        let envelope: ApiResponse<CreatePaymentResponse> =
            from_http(response(503, "<html>upstream down</html>")).unwrap();
        let problem = envelope.error().unwrap();
        assert_eq!(problem.status, Some(503));
        assert_eq!(problem.detail.as_deref(), Some("<html>upstream down</html>"));
    }

    #[test]
    fn test_success_with_non_json_body_is_transport_error() {
        let err = from_http::<CreatePaymentResponse>(response(200, "not json")).unwrap_err();
        match err {
            Error::Transport(e) => assert_eq!(e.kind, TransportErrorKind::MalformedBody),
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_success_with_unknown_tag_is_decode_error() {
        let err = from_http::<CreatePaymentResponse>(response(200, r#"{"status":"teleported"}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_tagged_decode_keeps_unknown_tag() {
        let err = from_http_tagged::<CreatePaymentResponse>(response(
            201,
            r#"{"id":"pay-1","status":"teleported"}"#,
        ))
        .unwrap_err();
        match err {
            Error::Decode(DecodeError::UnknownTag { field, tag, .. }) => {
                assert_eq!(field, "status");
                assert_eq!(tag, "teleported");
            }
            other => panic!("Expected unknown tag error, got {:?}", other),
        }
    }

    #[test]
    fn test_tagged_decode_keeps_missing_discriminator() {
        let err = from_http_tagged::<CreatePaymentResponse>(response(201, r#"{"id":"pay-1"}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MissingDiscriminator { field: "status", .. })
        ));
    }

    #[test]
    fn test_tagged_decode_passes_problem_details_through() {
        let envelope =
            from_http_tagged::<CreatePaymentResponse>(response(400, r#"{"title":"Invalid"}"#))
                .unwrap();
        assert_eq!(envelope.error().unwrap().title.as_deref(), Some("Invalid"));
    }

    #[test]
    fn test_success_with_unknown_tag_uses_fallback() {
        let envelope: ApiResponse<AuthorizationFlowResponse> =
            from_http(response(200, r#"{"status":"new_status"}"#)).unwrap();
        assert!(envelope.data().unwrap().is_authorizing());
    }

    #[test]
    fn test_empty_success_body() {
        let envelope: ApiResponse<()> = from_http(response(204, "")).unwrap();
        assert_eq!(envelope.into_result(), Ok(()));
    }

    #[test]
    fn test_map_keeps_metadata() {
        let envelope: ApiResponse<u32> = ApiResponse::success(200, 2).with_correlation_id("c");
        let mapped = envelope.map(|n| n * 10);
        assert_eq!(mapped.status(), 200);
        assert_eq!(mapped.correlation_id(), Some("c"));
        assert_eq!(mapped.into_data(), Some(20));
    }
}
