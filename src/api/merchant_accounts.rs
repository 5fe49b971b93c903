//! Merchant accounts service.

use std::sync::Arc;

use crate::client::{ApiResponse, ClientInner};
use crate::models::{MerchantAccount, Transaction, TransactionsQuery};
use crate::{MerchantAccountId, Result};

/// Service for merchant account operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: truelayer_rs::TrueLayerClient) -> truelayer_rs::Result<()> {
/// let accounts = client.merchant_accounts().list().await?;
/// for account in accounts.into_data().unwrap_or_default() {
///     println!("{}: {} {}", account.id, account.available_balance_in_minor, account.currency);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MerchantAccountsService {
    inner: Arc<ClientInner>,
}

impl MerchantAccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List the merchant accounts of the client.
    pub async fn list(&self) -> Result<ApiResponse<Vec<MerchantAccount>>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<MerchantAccount>,
        }
        let url = self.inner.url(&["merchant-accounts"])?;
        let response: ApiResponse<Response> = self.inner.get(url).await?;
        Ok(response.map(|r| r.items))
    }

    /// Get a merchant account by ID.
    pub async fn get(&self, id: &MerchantAccountId) -> Result<ApiResponse<MerchantAccount>> {
        let url = self.inner.url(&["merchant-accounts", id.as_str()])?;
        self.inner.get(url).await
    }

    /// List transactions on a merchant account within a date range.
    ///
    /// # Arguments
    ///
    /// * `id` - The merchant account
    /// * `query` - Inclusive date range
    pub async fn list_transactions(
        &self,
        id: &MerchantAccountId,
        query: &TransactionsQuery,
    ) -> Result<ApiResponse<Vec<Transaction>>> {
        #[derive(serde::Deserialize)]
        struct Response {
            items: Vec<Transaction>,
        }
        let url = self
            .inner
            .url(&["merchant-accounts", id.as_str(), "transactions"])?;
        let response: ApiResponse<Response> =
            self.inner.get_with_query(url, &query.to_query_pairs()).await?;
        Ok(response.map(|r| r.items))
    }
}
