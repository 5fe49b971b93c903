//! HTTP client implementation for the TrueLayer API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

use crate::api::{
    AuthService, HostedPaymentPage, MandatesService, MerchantAccountsService, PaymentsProvidersService,
    PaymentsService,
};
use crate::auth::{
    AccessToken, Authenticator, ClientCredentials, CredentialsCache, HttpTokenIssuer, InMemoryCredentialsCache,
    NoopCredentialsCache, TokenIssuer,
};
use crate::models::Discriminated;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::idempotency::{IdempotencyKeyGenerator, UuidKeyGenerator, IDEMPOTENCY_KEY_HEADER};
use super::response::{from_http, from_http_tagged, ApiResponse};
use super::signing::{RequestSigner, SignableRequest, SIGNATURE_HEADER};
use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// The main client for interacting with the TrueLayer API.
///
/// This client provides access to all API services through method calls
/// that return service structs. The client obtains and caches access
/// tokens, attaches idempotency keys and signatures, retries transient
/// failures and decodes responses.
///
/// Cloning is cheap; clones share the token cache.
///
/// # Example
///
/// ```no_run
/// use truelayer_rs::{ClientConfig, ClientCredentials, Environment, PaymentId, TrueLayerClient};
///
/// # async fn example() -> truelayer_rs::Result<()> {
/// let client = TrueLayerClient::new(
///     ClientCredentials::new("client-id", "client-secret")?,
///     ClientConfig::default().with_environment(Environment::Sandbox),
/// )?;
///
/// let payment = client.payments()?.get_payment(&PaymentId::new("pay-123")).await?;
/// if let Some(detail) = payment.data() {
///     println!("status: {:?}", detail.status());
/// }
/// # Ok(())
/// # }
/// ```
pub struct TrueLayerClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) authenticator: Authenticator,
    pub(crate) signer: Option<Arc<dyn RequestSigner>>,
    pub(crate) idempotency_keys: Arc<dyn IdempotencyKeyGenerator>,
    pub(crate) config: ClientConfig,
}

impl TrueLayerClient {
    /// Create a client with the default collaborators.
    ///
    /// Signed endpoints need a signer; use [`builder`](Self::builder) to
    /// install one.
    pub fn new(credentials: ClientCredentials, config: ClientConfig) -> Result<Self> {
        Self::builder(credentials).with_config(config).build()
    }

    /// Start building a client.
    pub fn builder(credentials: ClientCredentials) -> TrueLayerClientBuilder {
        TrueLayerClientBuilder {
            credentials,
            config: ClientConfig::default(),
            transport: None,
            token_issuer: None,
            credentials_cache: None,
            signer: None,
            idempotency_keys: None,
        }
    }

    /// Get the authentication service.
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.inner.clone())
    }

    /// Get the payments service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no request signer was configured.
    pub fn payments(&self) -> Result<PaymentsService> {
        if self.inner.signer.is_none() {
            return Err(Error::Config("signing options must be set".to_string()));
        }
        Ok(PaymentsService::new(self.inner.clone()))
    }

    /// Get the merchant accounts service.
    pub fn merchant_accounts(&self) -> MerchantAccountsService {
        MerchantAccountsService::new(self.inner.clone())
    }

    /// Get the mandates service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no request signer was configured.
    pub fn mandates(&self) -> Result<MandatesService> {
        if self.inner.signer.is_none() {
            return Err(Error::Config("signing options must be set".to_string()));
        }
        Ok(MandatesService::new(self.inner.clone()))
    }

    /// Get the payments providers service.
    pub fn payments_providers(&self) -> PaymentsProvidersService {
        PaymentsProvidersService::new(self.inner.clone())
    }

    /// Get the hosted payment page link builder.
    pub fn hpp(&self) -> HostedPaymentPage {
        HostedPaymentPage::new(self.inner.config.environment.hpp_base_url())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

/// Builder for [`TrueLayerClient`].
///
/// Every collaborator is optional and falls back to the default
/// implementation.
///
/// # Example
///
/// ```
/// use truelayer_rs::{ClientConfig, ClientCredentials, Environment, SignableRequest, TrueLayerClient};
///
/// # fn main() -> truelayer_rs::Result<()> {
/// let client = TrueLayerClient::builder(ClientCredentials::new("client-id", "client-secret")?)
///     .with_config(ClientConfig::default().with_environment(Environment::Sandbox))
///     .with_signer(|_request: &SignableRequest<'_>| -> truelayer_rs::Result<String> {
///         Ok("detached-jws".to_string())
///     })
///     .build()?;
/// assert!(client.payments().is_ok());
/// # Ok(())
/// # }
/// ```
pub struct TrueLayerClientBuilder {
    credentials: ClientCredentials,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    token_issuer: Option<Arc<dyn TokenIssuer>>,
    credentials_cache: Option<Arc<dyn CredentialsCache>>,
    signer: Option<Arc<dyn RequestSigner>>,
    idempotency_keys: Option<Arc<dyn IdempotencyKeyGenerator>>,
}

impl TrueLayerClientBuilder {
    /// Set the configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Send requests through `transport` instead of `reqwest`.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Obtain tokens from `issuer`.
    pub fn with_token_issuer(mut self, issuer: Arc<dyn TokenIssuer>) -> Self {
        self.token_issuer = Some(issuer);
        self
    }

    /// Store tokens in `cache`, e.g. one shared between several clients.
    pub fn with_credentials_cache(mut self, cache: Arc<dyn CredentialsCache>) -> Self {
        self.credentials_cache = Some(cache);
        self
    }

    /// Sign payment requests with `signer`.
    pub fn with_signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Generate idempotency keys with `generator`.
    pub fn with_idempotency_keys(mut self, generator: impl IdempotencyKeyGenerator + 'static) -> Self {
        self.idempotency_keys = Some(Arc::new(generator));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no scope is configured, the default HTTP client
    /// cannot be built or the environment URLs are invalid.
    pub fn build(self) -> Result<TrueLayerClient> {
        let config = self.config;

        if config.scopes.iter().all(|scope| scope.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "at least one scope is required".to_string(),
            ));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };
        let issuer: Arc<dyn TokenIssuer> = match self.token_issuer {
            Some(issuer) => issuer,
            None => Arc::new(HttpTokenIssuer::new(transport.clone(), &config.environment)?),
        };
        let cache: Arc<dyn CredentialsCache> = match self.credentials_cache {
            Some(cache) => cache,
            None if config.credentials_caching => Arc::new(
                InMemoryCredentialsCache::with_expiry_margin(config.token_expiry_margin),
            ),
            None => Arc::new(NoopCredentialsCache),
        };

        // Fail early on a malformed custom environment.
        Url::parse(config.environment.payments_base_url())?;

        tracing::debug!(
            environment = %config.environment,
            caching = config.credentials_caching,
            signing = self.signer.is_some(),
            "building TrueLayer client"
        );

        Ok(TrueLayerClient {
            inner: Arc::new(ClientInner {
                transport,
                authenticator: Authenticator::new(self.credentials, issuer, cache),
                signer: self.signer,
                idempotency_keys: self
                    .idempotency_keys
                    .unwrap_or_else(|| Arc::new(UuidKeyGenerator)),
                config,
            }),
        })
    }
}

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// No credentials attached
    Public,
    /// Bearer token
    Bearer,
    /// Bearer token and request signature
    Signed,
}

impl ClientInner {
    /// Build a payments API URL from path segments. Segments are
    /// percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(self.config.environment.payments_base_url())?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("payments base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ApiResponse<T>> {
        from_http(self.execute(Method::GET, url, None, Access::Bearer).await?)
    }

    /// Make a GET request whose body is a discriminated family.
    pub(crate) async fn get_tagged<T: Discriminated>(&self, url: Url) -> Result<ApiResponse<T>> {
        from_http_tagged(self.execute(Method::GET, url, None, Access::Bearer).await?)
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        url.query_pairs_mut().extend_pairs(query);
        from_http(self.execute(Method::GET, url, None, Access::Bearer).await?)
    }

    /// Make an unauthenticated GET request with query parameters.
    pub(crate) async fn get_public_with_query<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        url.query_pairs_mut().extend_pairs(query);
        from_http(self.execute(Method::GET, url, None, Access::Public).await?)
    }

    /// Make an idempotent POST request whose response is a discriminated
    /// family.
    pub(crate) async fn post_tagged<T: Discriminated, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        let body = serde_json::to_vec(body)?;
        from_http_tagged(self.execute(Method::POST, url, Some(body), Access::Bearer).await?)
    }

    /// Make an idempotent, signed POST request.
    pub(crate) async fn post_signed<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        let body = serde_json::to_vec(body)?;
        from_http(self.execute(Method::POST, url, Some(body), Access::Signed).await?)
    }

    /// Make an idempotent, signed POST request without a body.
    pub(crate) async fn post_signed_empty<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<ApiResponse<T>> {
        from_http(self.execute(Method::POST, url, None, Access::Signed).await?)
    }

    /// Make an idempotent, signed POST request whose response is a
    /// discriminated family.
    pub(crate) async fn post_signed_tagged<T: Discriminated, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        let body = serde_json::to_vec(body)?;
        from_http_tagged(self.execute(Method::POST, url, Some(body), Access::Signed).await?)
    }

    /// Build request headers, with authentication when a token is given.
    fn build_headers(&self, token: Option<&AccessToken>, has_body: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token.secret()))
                    .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(headers)
    }

    /// Send one logical call: authenticate, attach the idempotency key and
    /// signature once, then retry the identical request as configured.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        access: Access,
    ) -> Result<HttpResponse> {
        let token = match access {
            Access::Public => None,
            Access::Bearer | Access::Signed => Some(
                self.authenticator
                    .access_token(&self.config.scopes)
                    .await?,
            ),
        };
        let mut headers = self.build_headers(token.as_ref(), body.is_some())?;

        let idempotency_key = if method == Method::GET {
            None
        } else {
            let key = self.idempotency_keys.generate();
            headers.insert(
                IDEMPOTENCY_KEY_HEADER,
                HeaderValue::from_str(&key)
                    .map_err(|_| Error::InvalidInput(format!("invalid idempotency key '{}'", key)))?,
            );
            Some(key)
        };

        if access == Access::Signed {
            let signer = self
                .signer
                .as_ref()
                .ok_or_else(|| Error::Config("signing options must be set".to_string()))?;
            let signed_headers: Vec<(&str, &str)> = idempotency_key
                .iter()
                .map(|key| (IDEMPOTENCY_KEY_HEADER, key.as_str()))
                .collect();
            let signature = signer.sign(&SignableRequest {
                method: method.as_str(),
                path: url.path(),
                headers: &signed_headers,
                body: body.as_deref().unwrap_or_default(),
            })?;
            headers.insert(
                SIGNATURE_HEADER,
                HeaderValue::from_str(&signature).map_err(|_| {
                    Error::Signing("signature is not a valid header value".to_string())
                })?,
            );
        }

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                "sending request"
            );

            match self.transport.send(request.clone()).await {
                Ok(response)
                    if attempt < retry.max_retries && retry.should_retry_status(response.status) =>
                {
                    let backoff = retry.backoff_for_attempt(attempt);
                    tracing::warn!(
                        status = response.status,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "retryable status, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Ok(response) => {
                    tracing::debug!(status = response.status, "received response");
                    if let (401, Some(token)) = (response.status, &token) {
                        // The token may have been revoked; fetch a new one next time.
                        self.authenticator.reject(&self.config.scopes, token);
                    }
                    return Ok(response);
                }
                Err(e) if attempt < retry.max_retries && e.is_retryable() => {
                    let backoff = retry.backoff_for_attempt(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "transport error, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "request failed");
                    return Err(e.into());
                }
            }

            attempt += 1;
        }
    }
}

impl Clone for TrueLayerClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for TrueLayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueLayerClient")
            .field("config", &self.inner.config)
            .field("authenticator", &self.inner.authenticator)
            .field("signing", &self.inner.signer.is_some())
            .finish()
    }
}

impl std::fmt::Debug for TrueLayerClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueLayerClientBuilder")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment;

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("client-id", "client-secret").unwrap()
    }

    #[test]
    fn test_payments_requires_signer() {
        let client = TrueLayerClient::new(credentials(), ClientConfig::default()).unwrap();
        match client.payments() {
            Err(Error::Config(msg)) => assert_eq!(msg, "signing options must be set"),
            other => panic!("Expected config error, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(client.mandates(), Err(Error::Config(_))));
    }

    #[test]
    fn test_build_rejects_empty_scopes() {
        for scopes in [vec![], vec!["", "  "]] {
            let err = TrueLayerClient::new(
                credentials(),
                ClientConfig::default().with_scopes(scopes),
            )
            .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(ref msg) if msg == "at least one scope is required"));
        }
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = TrueLayerClient::builder(credentials())
            .with_config(
                ClientConfig::default().with_environment(Environment::custom("http://localhost:1234/v3/")),
            )
            .build()
            .unwrap();

        let url = client.inner.url(&["payments", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/v3/payments/a%2Fb%20c");
    }

    #[test]
    fn test_hpp_uses_environment() {
        let client = TrueLayerClient::new(
            credentials(),
            ClientConfig::default().with_environment(Environment::Sandbox),
        )
        .unwrap();
        assert_eq!(client.hpp().base_url(), "https://payment.truelayer-sandbox.com");
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = TrueLayerClient::new(credentials(), ClientConfig::default()).unwrap();
        assert!(!format!("{:?}", client).contains("client-secret"));
    }
}
