//! Enumeration types for the TrueLayer API.
//!
//! Plain string enums. Shapes whose fields depend on a tag live in their
//! own modules as discriminated families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency supported by the payments API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Pound sterling
    #[default]
    Gbp,
    /// Euro
    Eur,
    /// Currency not known to this version of the crate
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Lifecycle status of a payment.
///
/// Mirrors the `status` discriminator of
/// [`PaymentDetail`](crate::models::PaymentDetail) for callers that only
/// need the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Waiting for the payment to be authorized
    AuthorizationRequired,
    /// Authorization flow in progress
    Authorizing,
    /// Authorized by the payer's bank
    Authorized,
    /// Submitted to the payment scheme
    Executed,
    /// Funds arrived in the merchant account
    Settled,
    /// Terminal failure
    Failed,
    /// Unknown status
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Returns `true` if the payment can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Settled | PaymentStatus::Failed
        )
    }
}

/// Status of a merchant account transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Not yet settled
    Pending,
    /// Settled
    Settled,
    /// Executed by the scheme
    Executed,
    /// Failed
    Failed,
    /// Unknown status
    #[serde(other)]
    Unknown,
}

/// Point in the payment lifecycle at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Failed before the authorization flow began
    AuthorizationRequired,
    /// Failed during the authorization flow
    Authorizing,
    /// Failed after authorization
    Authorized,
    /// Unknown stage
    #[serde(other)]
    Unknown,
}
