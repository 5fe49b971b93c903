//! Payments service for creating payments and driving their authorization.

use std::sync::Arc;

use crate::client::{ApiResponse, ClientInner};
use crate::models::{
    AuthorizationFlowResponse, CreatePaymentRequest, CreatePaymentResponse, PaymentDetail,
    StartAuthorizationFlowRequest, SubmitProviderSelectionRequest,
};
use crate::{PaymentId, Result};

/// Service for payment operations.
///
/// Obtained from [`TrueLayerClient::payments`](crate::TrueLayerClient::payments),
/// which requires a request signer.
///
/// # Example
///
/// ```no_run
/// use truelayer_rs::models::{
///     Beneficiary, CreatePaymentRequest, Currency, MerchantAccountBeneficiary, PaymentMethod,
///     PaymentUser, ProviderSelection,
/// };
///
/// # async fn example(client: truelayer_rs::TrueLayerClient) -> truelayer_rs::Result<()> {
/// let request = CreatePaymentRequest::new(
///     100,
///     Currency::Gbp,
///     PaymentMethod::bank_transfer(
///         ProviderSelection::user_selected(),
///         Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("merchant-account-id")),
///     ),
///     PaymentUser::new("Jane Doe", Some("jane@example.com"), None)?,
/// )?;
///
/// let response = client.payments()?.create_payment(&request).await?;
/// if let Some(created) = response.data() {
///     println!("created {} ({:?})", created.id(), created.status());
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaymentsService {
    inner: Arc<ClientInner>,
}

impl PaymentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a payment.
    ///
    /// The request is signed and carries one idempotency key across
    /// retries.
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<ApiResponse<CreatePaymentResponse>> {
        let url = self.inner.url(&["payments"])?;
        self.inner.post_signed_tagged(url, request).await
    }

    /// Get a payment by ID.
    pub async fn get_payment(&self, payment_id: &PaymentId) -> Result<ApiResponse<PaymentDetail>> {
        let url = self.inner.url(&["payments", payment_id.as_str()])?;
        self.inner.get_tagged(url).await
    }

    /// Start the authorization flow of a payment.
    pub async fn start_authorization_flow(
        &self,
        payment_id: &PaymentId,
        request: &StartAuthorizationFlowRequest,
    ) -> Result<ApiResponse<AuthorizationFlowResponse>> {
        let url = self
            .inner
            .url(&["payments", payment_id.as_str(), "authorization-flow"])?;
        self.inner.post_tagged(url, request).await
    }

    /// Submit the provider chosen by the user.
    ///
    /// # Arguments
    ///
    /// * `payment_id` - Payment whose flow asked for a provider selection
    /// * `request` - The selected provider
    pub async fn submit_provider_selection(
        &self,
        payment_id: &PaymentId,
        request: &SubmitProviderSelectionRequest,
    ) -> Result<ApiResponse<AuthorizationFlowResponse>> {
        let url = self.inner.url(&[
            "payments",
            payment_id.as_str(),
            "authorization-flow",
            "actions",
            "provider-selection",
        ])?;
        self.inner.post_tagged(url, request).await
    }
}
