//! Payment beneficiaries and bank account identifiers.

use serde::{Deserialize, Serialize};

use super::discriminated::discriminated;
use crate::{Error, MerchantAccountId, Result};

/// Where the funds of a payment go.
///
/// # Example
///
/// ```
/// use truelayer_rs::models::{Beneficiary, MerchantAccountBeneficiary};
///
/// let beneficiary = Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("ma-123"));
/// assert!(beneficiary.is_merchant_account());
///
/// let err = beneficiary.as_external_account().unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Type mismatch: beneficiary is of type MerchantAccount. Consider using as_merchant_account() instead."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Beneficiary {
    /// One of the merchant's own TrueLayer accounts
    MerchantAccount(MerchantAccountBeneficiary),
    /// Any other bank account
    ExternalAccount(ExternalAccountBeneficiary),
}

discriminated! {
    Beneficiary("beneficiary", discriminator = "type") {
        MerchantAccount(MerchantAccountBeneficiary) = "merchant_account"
            => is_merchant_account, as_merchant_account, into_merchant_account;
        ExternalAccount(ExternalAccountBeneficiary) = "external_account"
            => is_external_account, as_external_account, into_external_account;
    }
}

/// Beneficiary that is a TrueLayer merchant account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantAccountBeneficiary {
    /// Merchant account receiving the funds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<MerchantAccountId>,
    /// Override of the account holder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    /// Reference shown on the payer's statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl MerchantAccountBeneficiary {
    /// Pay into the given merchant account.
    pub fn new(merchant_account_id: impl Into<MerchantAccountId>) -> Self {
        Self {
            merchant_account_id: Some(merchant_account_id.into()),
            ..Default::default()
        }
    }

    /// Set the statement reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the account holder name.
    pub fn with_account_holder_name(mut self, name: impl Into<String>) -> Self {
        self.account_holder_name = Some(name.into());
        self
    }
}

/// Beneficiary identified by its bank account details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalAccountBeneficiary {
    /// Name on the receiving account
    pub account_holder_name: String,
    /// Reference shown on the payer's statement
    pub reference: String,
    /// Receiving account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_identifier: Option<AccountIdentifier>,
}

impl ExternalAccountBeneficiary {
    /// Create an external account beneficiary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the holder name or reference is empty.
    pub fn new(
        account_holder_name: impl Into<String>,
        reference: impl Into<String>,
        account_identifier: AccountIdentifier,
    ) -> Result<Self> {
        let account_holder_name = account_holder_name.into();
        let reference = reference.into();
        if account_holder_name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "account holder name must not be empty".to_string(),
            ));
        }
        if reference.trim().is_empty() {
            return Err(Error::InvalidInput("reference must not be empty".to_string()));
        }
        Ok(Self {
            account_holder_name,
            reference,
            account_identifier: Some(account_identifier),
        })
    }
}

/// A bank account, in one of the supported numbering schemes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountIdentifier {
    /// UK sort code and account number
    SortCodeAccountNumber(SortCodeAccountNumber),
    /// International bank account number
    Iban(Iban),
}

discriminated! {
    AccountIdentifier("account identifier", discriminator = "type") {
        SortCodeAccountNumber(SortCodeAccountNumber) = "sort_code_account_number"
            => is_sort_code_account_number, as_sort_code_account_number, into_sort_code_account_number;
        Iban(Iban) = "iban" => is_iban, as_iban, into_iban;
    }
}

impl AccountIdentifier {
    /// Build a UK account identifier. Dashes and spaces in the sort code
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless the sort code has 6 digits
    /// and the account number 8.
    pub fn sort_code_account_number(
        sort_code: impl AsRef<str>,
        account_number: impl AsRef<str>,
    ) -> Result<Self> {
        let sort_code: String = sort_code
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .collect();
        let account_number = account_number.as_ref().trim();

        if sort_code.len() != 6 || !sort_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "sort code must be 6 digits, got '{}'",
                sort_code
            )));
        }
        if account_number.len() != 8 || !account_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "account number must be 8 digits, got '{}'",
                account_number
            )));
        }

        Ok(AccountIdentifier::SortCodeAccountNumber(SortCodeAccountNumber {
            sort_code,
            account_number: account_number.to_string(),
        }))
    }

    /// Build an IBAN identifier. Whitespace is removed and letters are
    /// upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the IBAN is not 15 to 34
    /// alphanumeric characters starting with a country code.
    pub fn iban(iban: impl AsRef<str>) -> Result<Self> {
        let iban: String = iban
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let valid = (15..=34).contains(&iban.len())
            && iban.chars().all(|c| c.is_ascii_alphanumeric())
            && iban.chars().take(2).all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(Error::InvalidInput(format!("invalid IBAN '{}'", iban)));
        }

        Ok(AccountIdentifier::Iban(Iban { iban }))
    }
}

/// UK account details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortCodeAccountNumber {
    /// Six-digit sort code
    pub sort_code: String,
    /// Eight-digit account number
    pub account_number: String,
}

/// International bank account number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Iban {
    /// The IBAN, without spaces
    pub iban: String,
}
