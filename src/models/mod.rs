//! Data models for the TrueLayer API.
//!
//! This module contains all the strongly-typed data structures used to
//! interact with the TrueLayer API. Models are organized by domain:
//!
//! - [`discriminated`] - Tagged-union decoding and narrowing accessors
//! - [`primitives`] - Core types like `PaymentId` and `Environment`
//! - [`enums`] - Plain enumerations (currency, statuses)
//! - [`problem`] - Problem details returned on API errors
//! - [`beneficiary`] - Beneficiaries and account identifiers
//! - [`payment`] - Payment requests, methods and resources
//! - [`authorization_flow`] - Authorization flow requests and responses
//! - [`merchant_account`] - Merchant accounts and transactions
//! - [`mandate`] - Mandates and their constraints
//! - [`provider`] - Payments providers and their capabilities

pub mod discriminated;
pub mod primitives;
pub mod enums;
pub mod problem;
pub mod beneficiary;
pub mod payment;
pub mod authorization_flow;
pub mod merchant_account;
pub mod mandate;
pub mod provider;

// Re-export commonly used types
pub use discriminated::{decode, Discriminated, VariantRegistry};
pub use primitives::*;
pub use enums::*;
pub use problem::*;
pub use beneficiary::*;
pub use payment::*;
pub use authorization_flow::*;
pub use merchant_account::*;
pub use mandate::*;
pub use provider::*;
