//! Mandates: standing consents to pay a beneficiary repeatedly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::authorization_flow::AuthorizationFlow;
use super::beneficiary::Beneficiary;
use super::discriminated::discriminated;
use super::enums::{Currency, FailureStage};
use super::payment::{PaymentUser, ProviderSelection};
use crate::{Error, MandateId, Result};

/// Body of a create-mandate call.
///
/// # Example
///
/// ```
/// use truelayer_rs::models::{
///     Beneficiary, CreateMandateRequest, Currency, Mandate, MandateConstraints,
///     MerchantAccountBeneficiary, PaymentUser, ProviderSelection,
/// };
///
/// # fn main() -> truelayer_rs::Result<()> {
/// let request = CreateMandateRequest::new(
///     Mandate::sweeping(
///         ProviderSelection::preselected("ob-natwest"),
///         Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("ma-123")),
///     ),
///     Currency::Gbp,
///     PaymentUser::new("Jane Doe", Some("jane@example.com"), None)?,
///     MandateConstraints::new(10_000)?,
/// );
/// assert!(request.mandate.is_sweeping());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMandateRequest {
    /// Kind of mandate and who it pays
    pub mandate: Mandate,
    /// Currency of payments under the mandate
    pub currency: Currency,
    /// The payer
    pub user: PaymentUser,
    /// Limits on payments under the mandate
    pub constraints: MandateConstraints,
    /// Free-form key/value pairs echoed back on the mandate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl CreateMandateRequest {
    /// Create a mandate request.
    pub fn new(
        mandate: Mandate,
        currency: Currency,
        user: PaymentUser,
        constraints: MandateConstraints,
    ) -> Self {
        Self {
            mandate,
            currency,
            user,
            constraints,
            metadata: None,
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Kind of mandate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mandate {
    /// Moves funds between the payer's own accounts (VRP sweeping)
    Sweeping(MandateTerms),
    /// Pays a merchant (commercial VRP)
    Commercial(MandateTerms),
}

discriminated! {
    Mandate("mandate", discriminator = "type") {
        Sweeping(MandateTerms) = "sweeping" => is_sweeping, as_sweeping, into_sweeping;
        Commercial(MandateTerms) = "commercial" => is_commercial, as_commercial, into_commercial;
    }
}

impl Mandate {
    /// A sweeping mandate paying `beneficiary`.
    pub fn sweeping(provider_selection: ProviderSelection, beneficiary: Beneficiary) -> Self {
        Mandate::Sweeping(MandateTerms::new(provider_selection, beneficiary))
    }

    /// A commercial mandate paying `beneficiary`.
    pub fn commercial(provider_selection: ProviderSelection, beneficiary: Beneficiary) -> Self {
        Mandate::Commercial(MandateTerms::new(provider_selection, beneficiary))
    }

    /// Terms shared by every kind.
    pub fn terms(&self) -> &MandateTerms {
        match self {
            Mandate::Sweeping(terms) | Mandate::Commercial(terms) => terms,
        }
    }
}

/// Who a mandate pays and through which bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateTerms {
    /// How the payer's bank is chosen
    pub provider_selection: ProviderSelection,
    /// Receiver of the funds
    pub beneficiary: Beneficiary,
    /// Statement reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl MandateTerms {
    fn new(provider_selection: ProviderSelection, beneficiary: Beneficiary) -> Self {
        Self {
            provider_selection,
            beneficiary,
            reference: None,
        }
    }
}

/// Limits on payments made under a mandate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandateConstraints {
    /// First moment payments are allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    /// Last moment payments are allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
    /// Largest single payment, in minor units
    pub maximum_individual_amount: u64,
    /// Caps over rolling or calendar periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_limits: Option<PeriodicLimits>,
}

impl MandateConstraints {
    /// Constraints capping each payment at `maximum_individual_amount`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the amount is zero.
    pub fn new(maximum_individual_amount: u64) -> Result<Self> {
        if maximum_individual_amount == 0 {
            return Err(Error::InvalidInput(
                "maximum_individual_amount must be positive".to_string(),
            ));
        }
        Ok(Self {
            maximum_individual_amount,
            ..Default::default()
        })
    }

    /// Restrict payments to the window `from..=to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `from` is after `to`.
    pub fn with_validity(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(Error::InvalidInput(format!(
                "valid_from ({}) must not be after valid_to ({})",
                from, to
            )));
        }
        self.valid_from = Some(from);
        self.valid_to = Some(to);
        Ok(self)
    }

    /// Set the periodic caps.
    pub fn with_periodic_limits(mut self, limits: PeriodicLimits) -> Self {
        self.periodic_limits = Some(limits);
        self
    }
}

/// Per-period caps. Unset periods are unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicLimits {
    /// Daily cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<PeriodicLimit>,
    /// Weekly cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<PeriodicLimit>,
    /// Fortnightly cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fortnight: Option<PeriodicLimit>,
    /// Monthly cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<PeriodicLimit>,
    /// Half-yearly cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_year: Option<PeriodicLimit>,
    /// Yearly cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<PeriodicLimit>,
}

/// Cap for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicLimit {
    /// Total allowed in the period, in minor units
    pub maximum_amount: u64,
    /// How the period is anchored
    pub period_alignment: PeriodAlignment,
}

/// Anchor of a mandate period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodAlignment {
    /// Periods start when the mandate is authorized
    Consent,
    /// Periods follow the calendar
    Calendar,
    /// Alignment not known to this version of the crate
    #[serde(other)]
    Unknown,
}

/// Response to a create-mandate call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateMandateResponse {
    /// Mandate ID
    pub id: MandateId,
    /// Token for front-end components
    pub resource_token: String,
    /// Payer, with the ID TrueLayer assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PaymentUser>,
}

/// Lifecycle status of a mandate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    /// Waiting for the authorization flow to start
    AuthorizationRequired,
    /// Authorization flow in progress
    Authorizing,
    /// Payments may be made
    Authorized,
    /// Authorization failed
    Failed,
    /// Cancelled by the payer, merchant or bank
    Revoked,
}

/// A mandate resource, as returned by get-mandate and list-mandates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MandateDetail {
    /// Waiting for the authorization flow to start
    AuthorizationRequired(PendingMandate),
    /// Authorization flow in progress
    Authorizing(PendingMandate),
    /// Payments may be made
    Authorized(AuthorizedMandate),
    /// Authorization failed
    Failed(FailedMandate),
    /// No longer usable
    Revoked(RevokedMandate),
}

discriminated! {
    MandateDetail("mandate detail", discriminator = "status") {
        AuthorizationRequired(PendingMandate) = "authorization_required"
            => is_authorization_required, as_authorization_required, into_authorization_required;
        Authorizing(PendingMandate) = "authorizing" => is_authorizing, as_authorizing, into_authorizing;
        Authorized(AuthorizedMandate) = "authorized" => is_authorized, as_authorized, into_authorized;
        Failed(FailedMandate) = "failed" => is_failed, as_failed, into_failed;
        Revoked(RevokedMandate) = "revoked" => is_revoked, as_revoked, into_revoked;
    }
}

impl MandateDetail {
    /// Fields shared by every status.
    pub fn summary(&self) -> &MandateSummary {
        match self {
            MandateDetail::AuthorizationRequired(m) | MandateDetail::Authorizing(m) => &m.summary,
            MandateDetail::Authorized(m) => &m.summary,
            MandateDetail::Failed(m) => &m.summary,
            MandateDetail::Revoked(m) => &m.summary,
        }
    }

    /// Mandate ID.
    pub fn id(&self) -> &MandateId {
        &self.summary().id
    }

    /// Status carried by the discriminator.
    pub fn status(&self) -> MandateStatus {
        match self {
            MandateDetail::AuthorizationRequired(_) => MandateStatus::AuthorizationRequired,
            MandateDetail::Authorizing(_) => MandateStatus::Authorizing,
            MandateDetail::Authorized(_) => MandateStatus::Authorized,
            MandateDetail::Failed(_) => MandateStatus::Failed,
            MandateDetail::Revoked(_) => MandateStatus::Revoked,
        }
    }
}

/// Fields common to a mandate in any status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandateSummary {
    /// Mandate ID
    pub id: MandateId,
    /// Currency
    pub currency: Currency,
    /// Kind and terms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate: Option<Mandate>,
    /// Payer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PaymentUser>,
    /// Limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<MandateConstraints>,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Metadata set at creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// Mandate in `authorization_required` or `authorizing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingMandate {
    /// Common fields
    #[serde(flatten)]
    pub summary: MandateSummary,
    /// Progress of the authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
}

/// Mandate in `authorized`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedMandate {
    /// Common fields
    #[serde(flatten)]
    pub summary: MandateSummary,
    /// When the payer's bank authorized it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_at: Option<DateTime<Utc>>,
}

/// Mandate in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailedMandate {
    /// Common fields
    #[serde(flatten)]
    pub summary: MandateSummary,
    /// Where it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_stage: Option<FailureStage>,
    /// Why it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// When it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
}

/// Mandate in `revoked`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevokedMandate {
    /// Common fields
    #[serde(flatten)]
    pub summary: MandateSummary,
    /// When it was revoked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    /// Who revoked it (`client`, `user` or `provider`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_source: Option<String>,
}

/// Filter for list-mandates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MandatesQuery {
    /// Only mandates of this payer
    pub user_id: Option<String>,
    /// Pagination cursor from a previous page
    pub cursor: Option<String>,
    /// Page size
    pub limit: Option<u32>,
}

impl MandatesQuery {
    /// Mandates of the payer `user_id`.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Continue from `cursor`.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Return at most `limit` mandates.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = &self.user_id {
            pairs.push(("user_id", user_id.clone()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// One page of list-mandates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandatesPage {
    /// Mandates on this page
    pub items: Vec<MandateDetail>,
    /// Cursor for the next page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
