//! Mandates service for recurring payments.

use std::sync::Arc;

use crate::client::{ApiResponse, ClientInner};
use crate::models::{
    CreateMandateRequest, CreateMandateResponse, MandateDetail, MandatesPage, MandatesQuery,
};
use crate::{MandateId, Result};

/// Service for mandate operations.
///
/// Obtained from [`TrueLayerClient::mandates`](crate::TrueLayerClient::mandates),
/// which requires a request signer.
///
/// # Example
///
/// ```no_run
/// use truelayer_rs::models::MandatesQuery;
///
/// # async fn example(client: truelayer_rs::TrueLayerClient) -> truelayer_rs::Result<()> {
/// let mandates = client.mandates()?;
/// let page = mandates.list_mandates(&MandatesQuery::for_user("user-1")).await?;
/// for mandate in page.into_data().map(|p| p.items).unwrap_or_default() {
///     if mandate.is_authorized() {
///         mandates.revoke_mandate(mandate.id()).await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct MandatesService {
    inner: Arc<ClientInner>,
}

impl MandatesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a mandate. The request is signed.
    pub async fn create_mandate(
        &self,
        request: &CreateMandateRequest,
    ) -> Result<ApiResponse<CreateMandateResponse>> {
        let url = self.inner.url(&["mandates"])?;
        self.inner.post_signed(url, request).await
    }

    /// Get a mandate by ID.
    pub async fn get_mandate(&self, mandate_id: &MandateId) -> Result<ApiResponse<MandateDetail>> {
        let url = self.inner.url(&["mandates", mandate_id.as_str()])?;
        self.inner.get_tagged(url).await
    }

    /// List mandates, one page at a time.
    pub async fn list_mandates(&self, query: &MandatesQuery) -> Result<ApiResponse<MandatesPage>> {
        let url = self.inner.url(&["mandates"])?;
        self.inner.get_with_query(url, &query.to_query_pairs()).await
    }

    /// Revoke a mandate. The request is signed and has no body; success
    /// is an empty 204.
    pub async fn revoke_mandate(&self, mandate_id: &MandateId) -> Result<ApiResponse<()>> {
        let url = self.inner.url(&["mandates", mandate_id.as_str(), "revoke"])?;
        self.inner.post_signed_empty(url).await
    }
}
