//! Payment requests, payment methods and payment resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::authorization_flow::AuthorizationFlow;
use super::beneficiary::{AccountIdentifier, Beneficiary};
use super::discriminated::discriminated;
use super::enums::{Currency, FailureStage, PaymentStatus};
use crate::{Error, PaymentId, Result};

/// Body of a create-payment call.
///
/// # Example
///
/// ```
/// use truelayer_rs::models::{
///     Beneficiary, CreatePaymentRequest, Currency, MerchantAccountBeneficiary, PaymentMethod,
///     PaymentUser, ProviderSelection,
/// };
///
/// # fn main() -> truelayer_rs::Result<()> {
/// let request = CreatePaymentRequest::new(
///     100,
///     Currency::Gbp,
///     PaymentMethod::bank_transfer(
///         ProviderSelection::user_selected(),
///         Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("ma-123")),
///     ),
///     PaymentUser::new("Jane Doe", Some("jane@example.com"), None)?,
/// )?;
/// assert_eq!(request.amount_in_minor, 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in the currency's minor unit (pence, cents)
    pub amount_in_minor: u64,
    /// Currency of the amount
    pub currency: Currency,
    /// How the payment is made
    pub payment_method: PaymentMethod,
    /// The payer
    pub user: PaymentUser,
    /// Free-form key/value pairs echoed back on the payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl CreatePaymentRequest {
    /// Create a payment request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the amount is zero.
    pub fn new(
        amount_in_minor: u64,
        currency: Currency,
        payment_method: PaymentMethod,
        user: PaymentUser,
    ) -> Result<Self> {
        if amount_in_minor == 0 {
            return Err(Error::InvalidInput(
                "amount_in_minor must be positive".to_string(),
            ));
        }
        Ok(Self {
            amount_in_minor,
            currency,
            payment_method,
            user,
            metadata: None,
        })
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// The payer of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentUser {
    /// TrueLayer user ID, assigned on first payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PaymentUser {
    /// Describe a new payer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the name is empty or neither an
    /// email nor a phone number is given.
    pub fn new(
        name: impl Into<String>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("user name must not be empty".to_string()));
        }
        let email = email.filter(|s| !s.trim().is_empty());
        let phone = phone.filter(|s| !s.trim().is_empty());
        if email.is_none() && phone.is_none() {
            return Err(Error::InvalidInput(
                "user needs an email or a phone number".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            name: Some(name),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        })
    }

    /// Refer to a payer TrueLayer already knows.
    pub fn existing(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// How a payment is made.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Single open-banking bank transfer
    BankTransfer(BankTransfer),
    /// Payment against an existing mandate
    Mandate(MandatePayment),
}

discriminated! {
    PaymentMethod("payment method", discriminator = "type") {
        BankTransfer(BankTransfer) = "bank_transfer" => is_bank_transfer, as_bank_transfer, into_bank_transfer;
        Mandate(MandatePayment) = "mandate" => is_mandate, as_mandate, into_mandate;
    }
}

impl PaymentMethod {
    /// A bank transfer to `beneficiary`.
    pub fn bank_transfer(provider_selection: ProviderSelection, beneficiary: Beneficiary) -> Self {
        PaymentMethod::BankTransfer(BankTransfer {
            provider_selection: Some(provider_selection),
            beneficiary: Some(beneficiary),
        })
    }

    /// A payment against `mandate_id`.
    pub fn mandate(mandate_id: impl Into<String>) -> Self {
        PaymentMethod::Mandate(MandatePayment {
            mandate_id: mandate_id.into(),
            reference: None,
        })
    }
}

/// Bank transfer payment method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankTransfer {
    /// How the payer's bank is chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_selection: Option<ProviderSelection>,
    /// Receiver of the funds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Beneficiary>,
}

/// Mandate payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandatePayment {
    /// Mandate the payment is made under
    pub mandate_id: String,
    /// Statement reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// How the payer's bank (provider) is picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderSelection {
    /// The payer chooses during the authorization flow
    UserSelected(UserSelectedProvider),
    /// The merchant already knows the provider
    Preselected(PreselectedProvider),
}

discriminated! {
    ProviderSelection("provider selection", discriminator = "type") {
        UserSelected(UserSelectedProvider) = "user_selected" => is_user_selected, as_user_selected, into_user_selected;
        Preselected(PreselectedProvider) = "preselected" => is_preselected, as_preselected, into_preselected;
    }
}

impl ProviderSelection {
    /// Let the payer pick any provider.
    pub fn user_selected() -> Self {
        ProviderSelection::UserSelected(UserSelectedProvider::default())
    }

    /// Let the payer pick among providers matching `filter`.
    pub fn user_selected_with_filter(filter: ProviderFilter) -> Self {
        ProviderSelection::UserSelected(UserSelectedProvider {
            filter: Some(filter),
            ..Default::default()
        })
    }

    /// Skip provider selection.
    pub fn preselected(provider_id: impl Into<String>) -> Self {
        ProviderSelection::Preselected(PreselectedProvider {
            provider_id: provider_id.into(),
            ..Default::default()
        })
    }
}

/// User-selected provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSelectedProvider {
    /// Restricts the providers offered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ProviderFilter>,
    /// Provider chosen by the payer (set on responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Payment scheme used (set on responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,
}

/// Preselected provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreselectedProvider {
    /// Provider to use
    pub provider_id: String,
    /// Payment scheme to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,
}

/// Filter applied to the providers offered to the payer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFilter {
    /// ISO 3166-1 alpha-2 country codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    /// `general_availability`, `public_beta` or `private_beta`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_channel: Option<String>,
    /// `retail`, `business` or `corporate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_segments: Option<Vec<String>>,
    /// Explicit provider allow-list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_ids: Option<Vec<String>>,
}

/// Response to a create-payment call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreatePaymentResponse {
    /// The payment needs the payer to authorize it
    AuthorizationRequired(CreatedPayment),
    /// The payment was authorized immediately (e.g. under a mandate)
    Authorized(CreatedPayment),
    /// The payment was rejected on creation
    Failed(CreatedPaymentFailed),
}

discriminated! {
    CreatePaymentResponse("create payment response", discriminator = "status") {
        AuthorizationRequired(CreatedPayment) = "authorization_required"
            => is_authorization_required, as_authorization_required, into_authorization_required;
        Authorized(CreatedPayment) = "authorized" => is_authorized, as_authorized, into_authorized;
        Failed(CreatedPaymentFailed) = "failed" => is_failed, as_failed, into_failed;
    }
}

impl CreatePaymentResponse {
    /// ID of the created payment.
    pub fn id(&self) -> &PaymentId {
        match self {
            CreatePaymentResponse::AuthorizationRequired(p)
            | CreatePaymentResponse::Authorized(p) => &p.id,
            CreatePaymentResponse::Failed(p) => &p.id,
        }
    }

    /// Token for front-end components (HPP, embedded payment page).
    pub fn resource_token(&self) -> &str {
        match self {
            CreatePaymentResponse::AuthorizationRequired(p)
            | CreatePaymentResponse::Authorized(p) => &p.resource_token,
            CreatePaymentResponse::Failed(p) => &p.resource_token,
        }
    }

    /// Status carried by the discriminator.
    pub fn status(&self) -> PaymentStatus {
        match self {
            CreatePaymentResponse::AuthorizationRequired(_) => PaymentStatus::AuthorizationRequired,
            CreatePaymentResponse::Authorized(_) => PaymentStatus::Authorized,
            CreatePaymentResponse::Failed(_) => PaymentStatus::Failed,
        }
    }
}

/// A newly created payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedPayment {
    /// Payment ID
    pub id: PaymentId,
    /// Token for front-end components
    pub resource_token: String,
    /// Payer, with the ID TrueLayer assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PaymentUser>,
}

/// A payment that failed on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedPaymentFailed {
    /// Payment ID
    pub id: PaymentId,
    /// Token for front-end components
    pub resource_token: String,
    /// Payer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PaymentUser>,
    /// Where it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_stage: Option<FailureStage>,
    /// Why it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Fields common to a payment in any status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSummary {
    /// Payment ID
    pub id: PaymentId,
    /// Amount in minor units
    pub amount_in_minor: u64,
    /// Currency
    pub currency: Currency,
    /// Payer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PaymentUser>,
    /// How the payment is made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Metadata set at creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// A payment resource, as returned by get-payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentDetail {
    /// Waiting for the authorization flow to start
    AuthorizationRequired(AuthorizationRequiredPayment),
    /// Authorization flow in progress
    Authorizing(AuthorizingPayment),
    /// Authorized by the payer's bank
    Authorized(AuthorizedPayment),
    /// Submitted to the payment scheme
    Executed(ExecutedPayment),
    /// Funds arrived in a merchant account
    Settled(SettledPayment),
    /// Failed
    Failed(FailedPayment),
}

discriminated! {
    PaymentDetail("payment", discriminator = "status") {
        AuthorizationRequired(AuthorizationRequiredPayment) = "authorization_required"
            => is_authorization_required, as_authorization_required, into_authorization_required;
        Authorizing(AuthorizingPayment) = "authorizing" => is_authorizing, as_authorizing, into_authorizing;
        Authorized(AuthorizedPayment) = "authorized" => is_authorized, as_authorized, into_authorized;
        Executed(ExecutedPayment) = "executed" => is_executed, as_executed, into_executed;
        Settled(SettledPayment) = "settled" => is_settled, as_settled, into_settled;
        Failed(FailedPayment) = "failed" => is_failed, as_failed, into_failed;
    }
}

impl PaymentDetail {
    /// Fields shared by every status.
    pub fn summary(&self) -> &PaymentSummary {
        match self {
            PaymentDetail::AuthorizationRequired(p) => &p.summary,
            PaymentDetail::Authorizing(p) => &p.summary,
            PaymentDetail::Authorized(p) => &p.summary,
            PaymentDetail::Executed(p) => &p.summary,
            PaymentDetail::Settled(p) => &p.summary,
            PaymentDetail::Failed(p) => &p.summary,
        }
    }

    /// Payment ID.
    pub fn id(&self) -> &PaymentId {
        &self.summary().id
    }

    /// Status carried by the discriminator.
    pub fn status(&self) -> PaymentStatus {
        match self {
            PaymentDetail::AuthorizationRequired(_) => PaymentStatus::AuthorizationRequired,
            PaymentDetail::Authorizing(_) => PaymentStatus::Authorizing,
            PaymentDetail::Authorized(_) => PaymentStatus::Authorized,
            PaymentDetail::Executed(_) => PaymentStatus::Executed,
            PaymentDetail::Settled(_) => PaymentStatus::Settled,
            PaymentDetail::Failed(_) => PaymentStatus::Failed,
        }
    }
}

/// Payment in `authorization_required`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequiredPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
}

/// Payment in `authorizing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizingPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
    /// Progress of the authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
}

/// Payment in `authorized`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
    /// Completed authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
}

/// Payment in `executed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutedPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
    /// Completed authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
    /// When the scheme accepted the payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
}

/// Payment in `settled`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettledPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
    /// Completed authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
    /// When the scheme accepted the payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    /// When the funds arrived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
    /// Account the funds came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<PaymentSource>,
}

/// Payment in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailedPayment {
    /// Common fields
    #[serde(flatten)]
    pub summary: PaymentSummary,
    /// Authorization flow up to the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
    /// When it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    /// Where it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_stage: Option<FailureStage>,
    /// Why it failed, e.g. `authorization_failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// The payer's account, as reported once funds have moved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSource {
    /// Source ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name on the payer's account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    /// Account identifiers of the payer's account
    pub account_identifiers: Vec<AccountIdentifier>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discriminated::{decode, Discriminated};
    use crate::models::MerchantAccountBeneficiary;
    use serde_json::json;

    fn summary_json(status: &str) -> serde_json::Value {
        json!({
            "id": "pay-1",
            "amount_in_minor": 100,
            "currency": "GBP",
            "user": { "id": "user-1" },
            "payment_method": {
                "type": "bank_transfer",
                "provider_selection": { "type": "user_selected" },
                "beneficiary": { "type": "merchant_account", "merchant_account_id": "ma-1" }
            },
            "created_at": "2024-01-02T03:04:05Z",
            "status": status
        })
    }

    #[test]
    fn test_create_payment_request_rejects_zero_amount() {
        let user = PaymentUser::existing("user-1");
        let result = CreatePaymentRequest::new(0, Currency::Gbp, PaymentMethod::mandate("m-1"), user);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_payment_user_validation() {
        assert!(PaymentUser::new("", Some("a@b.c"), None).is_err());
        assert!(PaymentUser::new("Jane", None, Some(" ")).is_err());
        let user = PaymentUser::new("Jane", None, Some("+447777777777")).unwrap();
        assert_eq!(user.phone.as_deref(), Some("+447777777777"));
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_create_payment_request_serialize() {
        let request = CreatePaymentRequest::new(
            120,
            Currency::Gbp,
            PaymentMethod::bank_transfer(
                ProviderSelection::user_selected(),
                Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("ma-1")),
            ),
            PaymentUser::existing("user-1"),
        )
        .unwrap()
        .with_metadata("order", "42");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "amount_in_minor": 120,
                "currency": "GBP",
                "payment_method": {
                    "type": "bank_transfer",
                    "provider_selection": { "type": "user_selected" },
                    "beneficiary": { "type": "merchant_account", "merchant_account_id": "ma-1" }
                },
                "user": { "id": "user-1" },
                "metadata": { "order": "42" }
            })
        );
    }

    #[test]
    fn test_create_payment_response_variants() {
        let response: CreatePaymentResponse = decode(json!({
            "id": "pay-1",
            "resource_token": "rt",
            "user": { "id": "user-1" },
            "status": "authorization_required"
        }))
        .unwrap();
        assert!(response.is_authorization_required());
        assert_eq!(response.id().as_str(), "pay-1");
        assert_eq!(response.resource_token(), "rt");
        assert_eq!(response.status(), PaymentStatus::AuthorizationRequired);

        let failed: CreatePaymentResponse = decode(json!({
            "id": "pay-2",
            "resource_token": "rt",
            "status": "failed",
            "failure_stage": "authorization_required",
            "failure_reason": "blocked"
        }))
        .unwrap();
        let failure = failed.as_failed().unwrap();
        assert_eq!(failure.failure_stage, Some(FailureStage::AuthorizationRequired));
        assert_eq!(failure.failure_reason.as_deref(), Some("blocked"));
        assert!(failed.as_authorized().is_err());
    }

    #[test]
    fn test_payment_detail_every_status() {
        for tag in PaymentDetail::registry().tags() {
            let payment: PaymentDetail = decode(summary_json(tag)).unwrap();
            assert_eq!(payment.tag(), tag);
            assert_eq!(payment.id().as_str(), "pay-1");
            assert_eq!(payment.summary().amount_in_minor, 100);
            assert!(payment.summary().payment_method.as_ref().unwrap().is_bank_transfer());
            assert_eq!(
                serde_json::to_value(payment.status()).unwrap(),
                json!(tag)
            );
        }
    }

    #[test]
    fn test_payment_detail_settled_fields() {
        let mut body = summary_json("settled");
        body["settled_at"] = json!("2024-01-02T04:00:00Z");
        body["payment_source"] = json!({
            "account_holder_name": "Jane Doe",
            "account_identifiers": [
                { "type": "sort_code_account_number", "sort_code": "040004", "account_number": "12345678" }
            ]
        });

        let payment: PaymentDetail = decode(body).unwrap();
        let settled = payment.as_settled().unwrap();
        assert!(settled.settled_at.is_some());
        let source = settled.payment_source.as_ref().unwrap();
        assert!(source.account_identifiers[0].is_sort_code_account_number());
    }

    #[test]
    fn test_payment_detail_serializes_status() {
        let payment: PaymentDetail = decode(summary_json("executed")).unwrap();
        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["status"], "executed");
        assert_eq!(value["id"], "pay-1");
    }

    #[test]
    fn test_provider_selection_preselected() {
        let selection: ProviderSelection = decode(json!({
            "type": "preselected",
            "provider_id": "mock-payments-gb-redirect",
            "scheme_id": "faster_payments_service"
        }))
        .unwrap();
        let preselected = selection.as_preselected().unwrap();
        assert_eq!(preselected.provider_id, "mock-payments-gb-redirect");
        assert!(selection.as_user_selected().is_err());
    }
}
