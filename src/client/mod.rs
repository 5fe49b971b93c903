//! HTTP client and service layer for the TrueLayer API.
//!
//! This module provides the main entry point [`TrueLayerClient`] together
//! with the seams it is built from: a [`Transport`](transport::Transport)
//! that moves bytes, a [`RequestSigner`](signing::RequestSigner) for
//! payment requests and an
//! [`IdempotencyKeyGenerator`](idempotency::IdempotencyKeyGenerator).
//!
//! # Example
//!
//! ```no_run
//! use truelayer_rs::{ClientConfig, ClientCredentials, Environment, TrueLayerClient};
//!
//! # async fn example() -> truelayer_rs::Result<()> {
//! let client = TrueLayerClient::new(
//!     ClientCredentials::new("client-id", "client-secret")?,
//!     ClientConfig::default().with_environment(Environment::Sandbox),
//! )?;
//!
//! let accounts = client.merchant_accounts().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod idempotency;
pub(crate) mod response;
pub mod signing;
pub mod transport;

pub use config::{ClientConfig, RetryConfig};
pub use http::{TrueLayerClient, TrueLayerClientBuilder};
pub use response::{ApiResponse, CORRELATION_ID_HEADER};
pub(crate) use http::ClientInner;
