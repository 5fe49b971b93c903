//! Merchant accounts and their transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::beneficiary::{AccountIdentifier, Beneficiary};
use super::discriminated::discriminated;
use super::enums::{Currency, TransactionStatus};
use super::payment::PaymentSource;
use crate::{Error, MerchantAccountId, PaymentId, Result};

/// A TrueLayer merchant account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantAccount {
    /// Account ID
    pub id: MerchantAccountId,
    /// Account currency
    pub currency: Currency,
    /// Bank details of the account
    pub account_identifiers: Vec<AccountIdentifier>,
    /// Funds available to pay out, in minor units
    pub available_balance_in_minor: i64,
    /// Balance including pending transactions, in minor units
    pub current_balance_in_minor: i64,
    /// Name on the account
    pub account_holder_name: String,
}

/// Date range for a transactions query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionsQuery {
    /// Inclusive start
    pub from: DateTime<Utc>,
    /// Inclusive end
    pub to: DateTime<Utc>,
}

impl TransactionsQuery {
    /// Query transactions between `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `from` is after `to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(Error::InvalidInput(format!(
                "from ({}) must not be after to ({})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub(crate) fn to_query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("from", self.from.to_rfc3339()),
            ("to", self.to.to_rfc3339()),
        ]
    }
}

/// A movement of funds on a merchant account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transaction {
    /// Incoming payment
    MerchantAccountPayment(MerchantAccountPayment),
    /// Incoming transfer not initiated through TrueLayer
    ExternalPayment(ExternalPayment),
    /// Outgoing payout
    Payout(Payout),
    /// Outgoing refund
    Refund(Refund),
}

discriminated! {
    Transaction("transaction", discriminator = "type") {
        MerchantAccountPayment(MerchantAccountPayment) = "merchant_account_payment"
            => is_merchant_account_payment, as_merchant_account_payment, into_merchant_account_payment;
        ExternalPayment(ExternalPayment) = "external_payment"
            => is_external_payment, as_external_payment, into_external_payment;
        Payout(Payout) = "payout" => is_payout, as_payout, into_payout;
        Refund(Refund) = "refund" => is_refund, as_refund, into_refund;
    }
}

impl Transaction {
    /// Transaction ID.
    pub fn id(&self) -> &str {
        match self {
            Transaction::MerchantAccountPayment(t) => &t.id,
            Transaction::ExternalPayment(t) => &t.id,
            Transaction::Payout(t) => &t.id,
            Transaction::Refund(t) => &t.id,
        }
    }

    /// Amount in minor units.
    pub fn amount_in_minor(&self) -> u64 {
        match self {
            Transaction::MerchantAccountPayment(t) => t.amount_in_minor,
            Transaction::ExternalPayment(t) => t.amount_in_minor,
            Transaction::Payout(t) => t.amount_in_minor,
            Transaction::Refund(t) => t.amount_in_minor,
        }
    }

    /// Returns `true` for outgoing transactions.
    pub fn is_outgoing(&self) -> bool {
        self.is_payout() || self.is_refund()
    }
}

/// Payment received through TrueLayer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantAccountPayment {
    /// Transaction ID
    pub id: String,
    /// Currency
    pub currency: Currency,
    /// Amount in minor units
    pub amount_in_minor: u64,
    /// Status
    pub status: Option<TransactionStatus>,
    /// Settlement time
    pub settled_at: Option<DateTime<Utc>>,
    /// Payer's account
    pub payment_source: Option<PaymentSource>,
    /// Originating payment
    pub payment_id: Option<PaymentId>,
}

/// Transfer received from outside TrueLayer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalPayment {
    /// Transaction ID
    pub id: String,
    /// Currency
    pub currency: Currency,
    /// Amount in minor units
    pub amount_in_minor: u64,
    /// Status
    pub status: Option<TransactionStatus>,
    /// Settlement time
    pub settled_at: Option<DateTime<Utc>>,
    /// Payer's account
    pub remitter: Option<PaymentSource>,
}

/// Payout from the merchant account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payout {
    /// Transaction ID
    pub id: String,
    /// Currency
    pub currency: Currency,
    /// Amount in minor units
    pub amount_in_minor: u64,
    /// Status
    pub status: Option<TransactionStatus>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Execution time
    pub executed_at: Option<DateTime<Utc>>,
    /// Receiver
    pub beneficiary: Option<Beneficiary>,
}

/// Refund of an earlier payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refund {
    /// Transaction ID
    pub id: String,
    /// Currency
    pub currency: Currency,
    /// Amount in minor units
    pub amount_in_minor: u64,
    /// Status
    pub status: Option<TransactionStatus>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Execution time
    pub executed_at: Option<DateTime<Utc>>,
    /// Refunded payment
    pub payment_id: Option<PaymentId>,
}
