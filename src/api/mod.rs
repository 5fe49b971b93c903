//! API service modules for TrueLayer endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the TrueLayer API.

mod auth;
mod hpp;
mod mandates;
mod merchant_accounts;
mod payments;
mod payments_providers;

pub use auth::AuthService;
pub use hpp::HostedPaymentPage;
pub use mandates::MandatesService;
pub use merchant_accounts::MerchantAccountsService;
pub use payments::PaymentsService;
pub use payments_providers::PaymentsProvidersService;
