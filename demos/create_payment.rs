//! Create a payment in the sandbox and print its hosted payment page link.
//!
//! Environment variables required:
//! - TRUELAYER_CLIENT_ID
//! - TRUELAYER_CLIENT_SECRET
//! - TRUELAYER_MERCHANT_ACCOUNT_ID
//!
//! Signing is stubbed; the sandbox rejects the request until a real
//! detached JWS signer is plugged in.
//!
//! Run with: cargo run --example create_payment

use truelayer_rs::models::{
    Beneficiary, CreatePaymentRequest, Currency, MerchantAccountBeneficiary, PaymentMethod,
    PaymentUser, ProviderSelection,
};
use truelayer_rs::{
    ClientConfig, ClientCredentials, Environment, SignableRequest, TrueLayerClient,
};

#[tokio::main]
async fn main() -> truelayer_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client_id = std::env::var("TRUELAYER_CLIENT_ID")
        .expect("TRUELAYER_CLIENT_ID environment variable required");
    let client_secret = std::env::var("TRUELAYER_CLIENT_SECRET")
        .expect("TRUELAYER_CLIENT_SECRET environment variable required");
    let merchant_account_id = std::env::var("TRUELAYER_MERCHANT_ACCOUNT_ID")
        .expect("TRUELAYER_MERCHANT_ACCOUNT_ID environment variable required");

    let client = TrueLayerClient::builder(ClientCredentials::new(client_id, client_secret)?)
        .with_config(ClientConfig::default().with_environment(Environment::Sandbox))
        .with_signer(|request: &SignableRequest<'_>| -> truelayer_rs::Result<String> {
            println!("signing {} {} ({} bytes)", request.method, request.path, request.body.len());
            Ok("unsigned".to_string())
        })
        .build()?;

    // List merchant accounts
    let accounts = client.merchant_accounts().list().await?;
    match accounts.into_result() {
        Ok(accounts) => {
            println!("Found {} merchant account(s):", accounts.len());
            for account in &accounts {
                println!(
                    "  - {} ({}) available: {}",
                    account.id, account.currency, account.available_balance_in_minor
                );
            }
        }
        Err(problem) => println!("Could not list merchant accounts: {}", problem),
    }

    let request = CreatePaymentRequest::new(
        1,
        Currency::Gbp,
        PaymentMethod::bank_transfer(
            ProviderSelection::user_selected(),
            Beneficiary::MerchantAccount(
                MerchantAccountBeneficiary::new(merchant_account_id).with_reference("demo"),
            ),
        ),
        PaymentUser::new("Jane Doe", Some("jane.doe@example.com"), None)?,
    )?;

    let response = client.payments()?.create_payment(&request).await?;
    println!("correlation id: {:?}", response.correlation_id());

    match response.into_result() {
        Ok(created) => {
            println!("Payment {} created with status {:?}", created.id(), created.status());
            let link = client.hpp().link(
                created.id(),
                created.resource_token(),
                "https://console.truelayer.com/redirect-page",
            )?;
            println!("Hosted payment page: {}", link);
        }
        Err(problem) => {
            println!("Payment rejected: {}", problem);
            if let Some(trace_id) = &problem.trace_id {
                println!("trace id: {}", trace_id);
            }
        }
    }

    Ok(())
}
