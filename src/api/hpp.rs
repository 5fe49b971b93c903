//! Hosted payment page links.

use url::Url;

use crate::{Error, PaymentId, Result};

/// Builds links to the TrueLayer hosted payment page (HPP).
///
/// The HPP lets the payer pick a bank and authorize a payment created
/// with [`PaymentsService::create_payment`](crate::api::PaymentsService::create_payment).
/// Building a link makes no network call.
///
/// # Example
///
/// ```
/// use truelayer_rs::api::HostedPaymentPage;
/// use truelayer_rs::{Environment, PaymentId};
///
/// let hpp = HostedPaymentPage::new(Environment::Sandbox.hpp_base_url());
/// let link = hpp
///     .link(&PaymentId::new("pay-1"), "token", "https://example.com/done")
///     .unwrap();
/// assert!(link.as_str().starts_with("https://payment.truelayer-sandbox.com/payments#payment_id=pay-1"));
/// ```
#[derive(Debug, Clone)]
pub struct HostedPaymentPage {
    base_url: String,
}

impl HostedPaymentPage {
    /// Build links against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The HPP base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link to the page for one payment.
    ///
    /// # Arguments
    ///
    /// * `payment_id` - ID returned when the payment was created
    /// * `resource_token` - Token returned alongside the ID
    /// * `return_uri` - Where the payer lands afterwards; must be allowed in
    ///   the console
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the resource token is empty or
    /// `return_uri` is not an absolute URL.
    pub fn link(&self, payment_id: &PaymentId, resource_token: &str, return_uri: &str) -> Result<Url> {
        if resource_token.trim().is_empty() {
            return Err(Error::InvalidInput("resource token must not be empty".to_string()));
        }
        Url::parse(return_uri)
            .map_err(|e| Error::InvalidInput(format!("invalid return uri '{}': {}", return_uri, e)))?;

        let fragment = format!(
            "payment_id={}&resource_token={}&return_uri={}",
            urlencoding::encode(payment_id.as_str()),
            urlencoding::encode(resource_token),
            urlencoding::encode(return_uri),
        );

        let mut url = Url::parse(&format!("{}/payments", self.base_url))?;
        url.set_fragment(Some(&fragment));
        Ok(url)
    }
}
