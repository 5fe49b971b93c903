//! Payments providers (banks) and their capabilities.

use serde::{Deserialize, Serialize};

use super::enums::Currency;
use crate::{Error, Result};

/// A bank as described by the payments-providers endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsProvider {
    /// Provider ID, e.g. `ob-natwest`
    pub id: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Icon URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    /// Logo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    /// Brand colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// What the provider supports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<ProviderCapabilities>,
}

impl PaymentsProvider {
    /// Returns `true` if the provider supports bank transfer payments.
    pub fn supports_bank_transfer(&self) -> bool {
        self.capabilities
            .as_ref()
            .and_then(|c| c.payments.as_ref())
            .and_then(|p| p.bank_transfer.as_ref())
            .is_some()
    }
}

/// Capabilities of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCapabilities {
    /// Payment capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentsCapabilities>,
}

/// Payment capabilities of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsCapabilities {
    /// Bank transfer support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_transfer: Option<BankTransferCapability>,
}

/// Bank transfer support of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankTransferCapability {
    /// `general_availability`, `public_beta` or `private_beta`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_channel: Option<String>,
    /// Payment schemes the provider can use
    pub schemes: Vec<PaymentScheme>,
}

/// A payment scheme, e.g. `faster_payments_service`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentScheme {
    /// Scheme ID
    pub id: String,
}

/// Authorization flow the caller intends to run with the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlowType {
    /// Redirect to the bank
    Redirect,
    /// Embedded credentials collection
    Embedded,
}

impl AuthFlowType {
    fn as_str(&self) -> &'static str {
        match self {
            AuthFlowType::Redirect => "redirect",
            AuthFlowType::Embedded => "embedded",
        }
    }
}

/// Kind of account the payer pays from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// UK sort code and account number
    SortCodeAccountNumber,
    /// IBAN
    Iban,
}

impl AccountType {
    fn as_str(&self) -> &'static str {
        match self {
            AccountType::SortCodeAccountNumber => "sort_code_account_number",
            AccountType::Iban => "iban",
        }
    }
}

/// Optional filters for a provider lookup.
///
/// The client ID is added by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Authorization flow the caller intends to run
    pub auth_flow_type: Option<AuthFlowType>,
    /// Kind of account the payer pays from
    pub account_type: Option<AccountType>,
    /// Currency of the intended payment
    pub currency: Option<Currency>,
}

impl ProviderQuery {
    /// Filter by authorization flow.
    pub fn with_auth_flow_type(mut self, auth_flow_type: AuthFlowType) -> Self {
        self.auth_flow_type = Some(auth_flow_type);
        self
    }

    /// Filter by account type.
    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Filter by currency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for [`Currency::Unknown`].
    pub fn with_currency(mut self, currency: Currency) -> Result<Self> {
        if currency == Currency::Unknown {
            return Err(Error::InvalidInput(
                "provider lookup needs a concrete currency".to_string(),
            ));
        }
        self.currency = Some(currency);
        Ok(self)
    }

    pub(crate) fn to_query_pairs(&self, client_id: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("client_id", client_id.to_string())];
        if let Some(flow) = self.auth_flow_type {
            pairs.push(("auth_flow_type", flow.as_str().to_string()));
        }
        if let Some(account_type) = self.account_type {
            pairs.push(("account_type", account_type.as_str().to_string()));
        }
        if let Some(currency) = self.currency {
            pairs.push(("currency", currency.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_capabilities() {
        let provider: PaymentsProvider = serde_json::from_value(json!({
            "id": "ob-natwest",
            "display_name": "NatWest",
            "country_code": "GB",
            "capabilities": {
                "payments": {
                    "bank_transfer": {
                        "release_channel": "general_availability",
                        "schemes": [{ "id": "faster_payments_service" }]
                    }
                }
            }
        }))
        .unwrap();

        assert!(provider.supports_bank_transfer());
        assert!(!PaymentsProvider::default().supports_bank_transfer());
    }

    #[test]
    fn test_query_pairs() {
        let query = ProviderQuery::default()
            .with_auth_flow_type(AuthFlowType::Redirect)
            .with_currency(Currency::Eur)
            .unwrap();
        assert_eq!(
            query.to_query_pairs("client-id"),
            vec![
                ("client_id", "client-id".to_string()),
                ("auth_flow_type", "redirect".to_string()),
                ("currency", "EUR".to_string()),
            ]
        );
        assert!(ProviderQuery::default().with_currency(Currency::Unknown).is_err());
    }
}
