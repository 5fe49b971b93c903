//! Payments providers lookup.

use std::sync::Arc;

use crate::client::{ApiResponse, ClientInner};
use crate::models::{PaymentsProvider, ProviderQuery};
use crate::Result;

/// Service for looking up payments providers.
///
/// Lookups are not authenticated with a token; the client ID travels as a
/// query parameter.
pub struct PaymentsProvidersService {
    inner: Arc<ClientInner>,
}

impl PaymentsProvidersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get a provider by ID.
    ///
    /// # Arguments
    ///
    /// * `provider_id` - e.g. `ob-natwest`
    /// * `query` - Optional filters on the capabilities returned
    pub async fn get_provider(
        &self,
        provider_id: &str,
        query: &ProviderQuery,
    ) -> Result<ApiResponse<PaymentsProvider>> {
        let url = self.inner.url(&["payments-providers", provider_id])?;
        let client_id = self.inner.authenticator.credentials().client_id();
        self.inner
            .get_public_with_query(url, &query.to_query_pairs(client_id))
            .await
    }
}
