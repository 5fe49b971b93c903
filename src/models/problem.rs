//! RFC 7807 problem details returned by the API on failure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Structured error body of a non-2xx API response.
///
/// This is the default error type carried by
/// [`ApiResponse`](crate::ApiResponse). Every field is optional on the
/// wire; absent fields decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetails {
    /// URI identifying the problem type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Short summary of the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTTP status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Identifier to quote to TrueLayer support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl ProblemDetails {
    /// Build a problem for an error response whose body could not be parsed.
    pub(crate) fn from_raw(status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body).trim().to_string();
        Self {
            title: Some(format!("HTTP {}", status)),
            status: Some(status),
            detail: (!text.is_empty()).then_some(text),
            ..Default::default()
        }
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or("unknown error");
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", title, detail),
            None => f.write_str(title),
        }
    }
}
