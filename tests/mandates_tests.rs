//! Integration tests for the mandates and payments providers services.
//!
//! Run with: cargo test --test mandates_tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use truelayer_rs::models::{
    AuthFlowType, Beneficiary, CreateMandateRequest, Currency, Mandate, MandateConstraints,
    MandateStatus, MandatesQuery, MerchantAccountBeneficiary, PaymentUser, ProviderQuery,
    ProviderSelection,
};
use truelayer_rs::{
    ClientConfig, ClientCredentials, Environment, MandateId, RetryConfig, SignableRequest,
    TrueLayerClient,
};

/// Method, path and body length the test signer saw.
type SignedCall = (String, String, usize);

fn client(server: &MockServer) -> (TrueLayerClient, Arc<Mutex<Vec<SignedCall>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let client = TrueLayerClient::builder(ClientCredentials::new("client-id", "client-secret").unwrap())
        .with_config(
            ClientConfig::default()
                .with_environment(Environment::custom(server.uri()))
                .with_scopes(["recurring_payments:sweeping"])
                .with_retry(RetryConfig::no_retry()),
        )
        .with_signer(move |request: &SignableRequest<'_>| -> truelayer_rs::Result<String> {
            recorder.lock().unwrap().push((
                request.method.to_string(),
                request.path.to_string(),
                request.body.len(),
            ));
            Ok("test-signature".to_string())
        })
        .build()
        .unwrap();
    (client, seen)
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(body_partial_json(json!({ "scope": "recurring_payments:sweeping" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "mandate-token",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn mandate_request() -> CreateMandateRequest {
    CreateMandateRequest::new(
        Mandate::sweeping(
            ProviderSelection::preselected("ob-natwest"),
            Beneficiary::MerchantAccount(MerchantAccountBeneficiary::new("ma-1")),
        ),
        Currency::Gbp,
        PaymentUser::new("Jane Doe", Some("jane@example.com"), None).unwrap(),
        MandateConstraints::new(10_000).unwrap(),
    )
}

// =============================================================================
// Mandates Tests
// =============================================================================

#[tokio::test]
async fn test_create_mandate_is_signed() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/mandates"))
        .and(header("authorization", "Bearer mandate-token"))
        .and(header("tl-signature", "test-signature"))
        .and(header_exists("idempotency-key"))
        .and(body_partial_json(json!({
            "mandate": {
                "type": "sweeping",
                "provider_selection": { "type": "preselected", "provider_id": "ob-natwest" },
                "beneficiary": { "type": "merchant_account", "merchant_account_id": "ma-1" }
            },
            "currency": "GBP",
            "constraints": { "maximum_individual_amount": 10_000 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "mandate-1",
            "resource_token": "res-token",
            "user": { "id": "user-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, seen) = client(&server);
    let created = client
        .mandates()
        .unwrap()
        .create_mandate(&mandate_request())
        .await
        .unwrap()
        .into_data()
        .unwrap();

    assert_eq!(created.id, MandateId::new("mandate-1"));
    assert_eq!(created.resource_token, "res-token");
    assert_eq!(created.user.unwrap().id.as_deref(), Some("user-1"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!((seen[0].0.as_str(), seen[0].1.as_str()), ("POST", "/mandates"));
    assert!(seen[0].2 > 0);
}

#[tokio::test]
async fn test_get_and_list_mandates() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/mandates/mandate-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "authorized",
            "id": "mandate-1",
            "currency": "GBP",
            "mandate": {
                "type": "sweeping",
                "provider_selection": { "type": "preselected", "provider_id": "ob-natwest" },
                "beneficiary": { "type": "merchant_account", "merchant_account_id": "ma-1" }
            },
            "authorized_at": "2024-03-01T10:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mandates"))
        .and(query_param("user_id", "user-1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "status": "authorizing", "id": "mandate-2", "currency": "GBP" },
                { "status": "revoked", "id": "mandate-3", "currency": "GBP", "revocation_source": "user" }
            ],
            "next_cursor": "cursor-2"
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let mandates = client.mandates().unwrap();

    let mandate = mandates
        .get_mandate(&MandateId::new("mandate-1"))
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert!(mandate.is_authorized());
    assert!(mandate.summary().mandate.as_ref().unwrap().is_sweeping());
    assert!(mandate.as_authorized().unwrap().authorized_at.is_some());

    let page = mandates
        .list_mandates(&MandatesQuery::for_user("user-1").with_limit(2))
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    let statuses: Vec<MandateStatus> = page.items.iter().map(|m| m.status()).collect();
    assert_eq!(statuses, vec![MandateStatus::Authorizing, MandateStatus::Revoked]);
}

#[tokio::test]
async fn test_revoke_mandate_sends_signed_empty_post() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/mandates/mandate-1/revoke"))
        .and(header("tl-signature", "test-signature"))
        .and(header_exists("idempotency-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, seen) = client(&server);
    let response = client
        .mandates()
        .unwrap()
        .revoke_mandate(&MandateId::new("mandate-1"))
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    assert_eq!(response.into_result(), Ok(()));

    let requests = server.received_requests().await.unwrap();
    let revoke = requests
        .iter()
        .find(|r| r.url.path() == "/mandates/mandate-1/revoke")
        .unwrap();
    assert!(revoke.body.is_empty());
    assert!(revoke.headers.get("content-type").is_none());
    assert_eq!(seen.lock().unwrap()[0].2, 0);
}

#[tokio::test]
async fn test_revoke_mandate_conflict_is_problem() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/mandates/mandate-1/revoke"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "title": "Mandate already revoked",
            "status": 409,
            "trace_id": "trace-409"
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let response = client
        .mandates()
        .unwrap()
        .revoke_mandate(&MandateId::new("mandate-1"))
        .await
        .unwrap();

    assert!(response.is_error());
    assert_eq!(response.error().unwrap().trace_id.as_deref(), Some("trace-409"));
}

// =============================================================================
// Payments Providers Tests
// =============================================================================

#[tokio::test]
async fn test_get_provider_is_unauthenticated() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/payments-providers/ob-natwest"))
        .and(query_param("client_id", "client-id"))
        .and(query_param("auth_flow_type", "redirect"))
        .and(query_param("currency", "GBP"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "id": "ob-natwest",
                    "display_name": "NatWest",
                    "country_code": "GB",
                    "capabilities": {
                        "payments": {
                            "bank_transfer": {
                                "release_channel": "general_availability",
                                "schemes": [{ "id": "faster_payments_service" }]
                            }
                        }
                    }
                }))
                .set_delay(Duration::from_millis(5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let query = ProviderQuery::default()
        .with_auth_flow_type(AuthFlowType::Redirect)
        .with_currency(Currency::Gbp)
        .unwrap();
    let provider = client
        .payments_providers()
        .get_provider("ob-natwest", &query)
        .await
        .unwrap()
        .into_data()
        .unwrap();

    assert_eq!(provider.display_name.as_deref(), Some("NatWest"));
    assert!(provider.supports_bank_transfer());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("idempotency-key").is_none());
}

#[tokio::test]
async fn test_get_unknown_provider_is_problem() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payments-providers/ob-missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "status": 404
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let response = client
        .payments_providers()
        .get_provider("ob-missing", &ProviderQuery::default())
        .await
        .unwrap();

    assert!(response.is_error());
    assert_eq!(response.status(), 404);
}
