//! OAuth2 client-credentials token issuance.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

use super::credentials::ClientCredentials;
use super::token::AccessToken;
use crate::client::response::from_http;
use crate::client::transport::{HttpRequest, Transport};
use crate::error::IssuanceError;
use crate::{ApiResponse, Environment, Result};

/// Obtains access tokens from an authorization server.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Run a client-credentials grant and return the raw outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only if no interpretable response was received.
    async fn request_token(
        &self,
        credentials: &ClientCredentials,
        scopes: &[String],
    ) -> Result<ApiResponse<AccessToken>>;

    /// Run a client-credentials grant, folding every failure into an
    /// [`IssuanceError`].
    async fn issue(
        &self,
        credentials: &ClientCredentials,
        scopes: &[String],
    ) -> std::result::Result<AccessToken, IssuanceError> {
        let response = self
            .request_token(credentials, scopes)
            .await
            .map_err(|e| IssuanceError::new(None, e.to_string()))?;
        let status = response.status();
        response
            .into_result()
            .map_err(|problem| IssuanceError::new(Some(status), problem.to_string()))
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

/// [`TokenIssuer`] calling `POST {auth}/connect/token`.
#[derive(Clone)]
pub struct HttpTokenIssuer {
    transport: Arc<dyn Transport>,
    token_url: Url,
}

impl HttpTokenIssuer {
    /// Issue tokens from the authorization server of `environment`.
    pub fn new(transport: Arc<dyn Transport>, environment: &Environment) -> Result<Self> {
        let token_url = Url::parse(&format!("{}/connect/token", environment.auth_base_url()))?;
        Ok(Self {
            transport,
            token_url,
        })
    }

    /// The token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

impl fmt::Debug for HttpTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTokenIssuer")
            .field("token_url", &self.token_url.as_str())
            .finish()
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn request_token(
        &self,
        credentials: &ClientCredentials,
        scopes: &[String],
    ) -> Result<ApiResponse<AccessToken>> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: credentials.client_id(),
            client_secret: credentials.client_secret(),
            scope: (!scopes.is_empty()).then(|| scopes.join(" ")),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let request = HttpRequest {
            method: Method::POST,
            url: self.token_url.clone(),
            headers,
            body: Some(serde_json::to_vec(&body)?),
        };

        tracing::debug!(
            url = %self.token_url,
            client_id = credentials.client_id(),
            scope = body.scope.as_deref().unwrap_or_default(),
            "requesting access token"
        );
        let response = self.transport.send(request).await?;
        from_http(response)
    }
}
