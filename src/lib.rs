//! # truelayer-rs
//!
//! An async Rust client for the TrueLayer payments API.
//!
//! This crate covers payment creation and authorization, mandates,
//! merchant accounts and hosted payment page links, on top of two building blocks
//! that can be used on their own:
//!
//! - **Discriminated responses**: every polymorphic API shape (payment
//!   status, authorization flow step, beneficiary type, ...) decodes into an
//!   enum with `is_x()`, `as_x()` and `into_x()` accessors. See
//!   [`models::Discriminated`].
//! - **Credentials cache**: access tokens are cached until shortly before
//!   they expire, and concurrent callers share a single token request. See
//!   [`auth::InMemoryCredentialsCache`].
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 client-credentials grant with token caching
//! - **Payments**: Create, fetch and authorize payments
//! - **Merchant Accounts**: Balances and transactions
//! - **Mandates**: Create, list and revoke recurring payment mandates
//! - **Payments Providers**: Look up a bank and its capabilities
//! - **Hosted Payment Page**: Build HPP links
//! - **Pluggable**: Bring your own transport, signer or token cache
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use truelayer_rs::models::{
//!     Beneficiary, CreatePaymentRequest, Currency, MerchantAccountBeneficiary, PaymentMethod,
//!     PaymentUser, ProviderSelection,
//! };
//! use truelayer_rs::{ClientConfig, ClientCredentials, Environment, SignableRequest, TrueLayerClient};
//!
//! #[tokio::main]
//! async fn main() -> truelayer_rs::Result<()> {
//!     let client = TrueLayerClient::builder(ClientCredentials::new("client-id", "client-secret")?)
//!         .with_config(ClientConfig::default().with_environment(Environment::Sandbox))
//!         // Produce a detached JWS with your signing key here.
//!         .with_signer(|_request: &SignableRequest<'_>| -> truelayer_rs::Result<String> {
//!             Ok("signature".to_string())
//!         })
//!         .build()?;
//!
//!     let request = CreatePaymentRequest::new(
//!         100,
//!         Currency::Gbp,
//!         PaymentMethod::bank_transfer(
//!             ProviderSelection::user_selected(),
//!             Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("merchant-account-id")),
//!         ),
//!         PaymentUser::new("Jane Doe", Some("jane@example.com"), None)?,
//!     )?;
//!
//!     let response = client.payments()?.create_payment(&request).await?;
//!     match response.into_result() {
//!         Ok(created) if created.is_authorization_required() => {
//!             let link = client.hpp().link(
//!                 created.id(),
//!                 created.resource_token(),
//!                 "https://example.com/redirect",
//!             )?;
//!             println!("Send the payer to {}", link);
//!         }
//!         Ok(created) => println!("Payment {} is {:?}", created.id(), created.status()),
//!         Err(problem) => println!("Rejected: {}", problem),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Narrowing Responses
//!
//! ```rust
//! use truelayer_rs::models::{decode, PaymentDetail};
//!
//! let payment: PaymentDetail = decode(serde_json::json!({
//!     "status": "executed",
//!     "id": "pay-1",
//!     "amount_in_minor": 100,
//!     "currency": "GBP",
//!     "executed_at": "2024-01-01T00:00:00Z"
//! }))
//! .unwrap();
//!
//! assert!(payment.is_executed());
//! assert!(payment.as_executed().is_ok());
//! assert_eq!(
//!     payment.as_settled().unwrap_err().to_string(),
//!     "Type mismatch: payment is of type Executed. Consider using as_executed() instead."
//! );
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{Environment, MandateId, MerchantAccountId, PaymentId};
pub use client::idempotency::{IdempotencyKeyGenerator, UuidKeyGenerator};
pub use client::signing::{RequestSigner, SignableRequest};
pub use client::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use client::{ApiResponse, ClientConfig, RetryConfig, TrueLayerClient, TrueLayerClientBuilder};
pub use auth::ClientCredentials;

/// Prelude module for convenient imports.
///
/// ```rust
/// use truelayer_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        Environment, MandateId, MerchantAccountId, PaymentId,
        // Enums
        Currency, PaymentStatus,
        // Requests
        Beneficiary, CreatePaymentRequest, PaymentMethod, PaymentUser, ProviderSelection,
        StartAuthorizationFlowRequest, SubmitProviderSelectionRequest, CreateMandateRequest,
        // Responses
        AuthorizationFlowAction, AuthorizationFlowResponse, CreatePaymentResponse,
        PaymentDetail, ProblemDetails, CreateMandateResponse, MandateDetail,
        // Decoding
        decode, Discriminated,
    };
    pub use crate::client::{ApiResponse, ClientConfig, TrueLayerClient};
    pub use crate::auth::ClientCredentials;
}
