//! Auth service for direct token requests.

use std::sync::Arc;

use crate::auth::AccessToken;
use crate::client::{ApiResponse, ClientInner};
use crate::Result;

/// Service for the OAuth2 token endpoint.
///
/// Requests made here bypass the credentials cache; API calls made
/// through the other services obtain their tokens automatically.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: truelayer_rs::TrueLayerClient) -> truelayer_rs::Result<()> {
/// let response = client.auth().get_oauth_token(&["payments".to_string()]).await?;
/// match response.into_result() {
///     Ok(token) => println!("expires in {}s", token.expires_in),
///     Err(problem) => println!("token request rejected: {}", problem),
/// }
/// # Ok(())
/// # }
/// ```
pub struct AuthService {
    inner: Arc<ClientInner>,
}

impl AuthService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Run a client-credentials grant for `scopes`.
    ///
    /// The token is not cached. A rejected grant is returned as an error
    /// envelope carrying the problem details.
    pub async fn get_oauth_token(&self, scopes: &[String]) -> Result<ApiResponse<AccessToken>> {
        let authenticator = &self.inner.authenticator;
        authenticator
            .issuer()
            .request_token(authenticator.credentials(), scopes)
            .await
    }
}
