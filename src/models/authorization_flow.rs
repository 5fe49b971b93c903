//! Payment authorization flow: requests, actions and responses.
//!
//! After a payment is created the payer is taken through an authorization
//! flow. Each response tells the caller which action comes next (pick a
//! provider, follow a redirect, wait, ...).

use serde::{Deserialize, Serialize};
use url::Url;

use super::discriminated::discriminated;
use super::enums::FailureStage;
use crate::{Error, Result};

/// Body of a start-authorization-flow call.
///
/// # Example
///
/// ```
/// use truelayer_rs::models::StartAuthorizationFlowRequest;
///
/// let request = StartAuthorizationFlowRequest::new()
///     .with_redirect("https://example.com/return")
///     .unwrap();
/// assert!(request.redirect.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAuthorizationFlowRequest {
    /// Declares that the caller can render a provider picker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_selection: Option<ProviderSelectionCapability>,
    /// Declares that the caller can follow a redirect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectCapability>,
}

impl StartAuthorizationFlowRequest {
    /// Start a flow supporting provider selection only.
    pub fn new() -> Self {
        Self {
            provider_selection: Some(ProviderSelectionCapability::default()),
            redirect: None,
        }
    }

    /// Also support redirects, returning the payer to `return_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `return_uri` is not an absolute URL.
    pub fn with_redirect(mut self, return_uri: impl AsRef<str>) -> Result<Self> {
        let parsed = Url::parse(return_uri.as_ref()).map_err(|e| {
            Error::InvalidInput(format!("invalid return_uri '{}': {}", return_uri.as_ref(), e))
        })?;
        self.redirect = Some(RedirectCapability {
            return_uri: parsed.to_string(),
            direct_return_uri: None,
        });
        Ok(self)
    }
}

/// Empty marker object on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSelectionCapability {}

/// Redirect support.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectCapability {
    /// Where the payer lands after authorizing
    pub return_uri: String,
    /// Where the payer lands when skipping the TrueLayer result page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_return_uri: Option<String>,
}

/// Body of a submit-provider-selection call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProviderSelectionRequest {
    /// Provider picked by the payer
    pub provider_id: String,
}

impl SubmitProviderSelectionRequest {
    /// Submit `provider_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the provider ID is empty.
    pub fn new(provider_id: impl Into<String>) -> Result<Self> {
        let provider_id = provider_id.into();
        if provider_id.trim().is_empty() {
            return Err(Error::InvalidInput("provider_id must not be empty".to_string()));
        }
        Ok(Self { provider_id })
    }
}

/// State of an authorization flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationFlow {
    /// Actions of the flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<AuthorizationFlowActions>,
}

impl AuthorizationFlow {
    /// The action the caller has to perform next, if any.
    pub fn next_action(&self) -> Option<&AuthorizationFlowAction> {
        self.actions.as_ref().and_then(|a| a.next.as_ref())
    }
}

/// Actions of an authorization flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationFlowActions {
    /// Next action to perform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<AuthorizationFlowAction>,
}

/// Something the caller has to do to progress the flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorizationFlowAction {
    /// Show the payer a list of providers
    ProviderSelection(ProviderSelectionAction),
    /// Send the payer to the provider
    Redirect(RedirectAction),
    /// Poll the payment until the flow moves on
    Wait(WaitAction),
    /// Collect the payer's consent
    Consent(ConsentAction),
    /// Collect additional inputs
    Form(FormAction),
}

discriminated! {
    AuthorizationFlowAction("authorization flow action", discriminator = "type") {
        ProviderSelection(ProviderSelectionAction) = "provider_selection"
            => is_provider_selection, as_provider_selection, into_provider_selection;
        Redirect(RedirectAction) = "redirect" => is_redirect, as_redirect, into_redirect;
        Wait(WaitAction) = "wait" => is_wait, as_wait, into_wait;
        Consent(ConsentAction) = "consent" => is_consent, as_consent, into_consent;
        Form(FormAction) = "form" => is_form, as_form, into_form;
    }
}

/// Providers the payer can choose from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSelectionAction {
    /// Offered providers
    pub providers: Vec<Provider>,
}

/// A bank (provider).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    /// Provider ID
    pub id: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Icon URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    /// Logo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    /// Brand colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Redirect the payer to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectAction {
    /// URI to send the payer to
    pub uri: String,
    /// Provider the redirect belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RedirectMetadata>,
}

/// Metadata of a redirect action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectMetadata {
    /// Always `provider`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Provider details
    #[serde(flatten)]
    pub provider: Provider,
}

/// Nothing to do but wait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitAction {}

/// Consent screen requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentAction {
    /// Scopes the payer is asked to consent to
    pub requested_scopes: Option<Vec<String>>,
}

/// Form inputs the payer must fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormAction {
    /// Inputs to render, passed through untouched
    pub inputs: Vec<serde_json::Value>,
}

/// Response to start-authorization-flow and submit-provider-selection.
///
/// Unknown `status` values decode as [`AuthorizationFlowResponse::Authorizing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthorizationFlowResponse {
    /// The flow continues
    Authorizing(AuthorizationFlowAuthorizing),
    /// The flow ended in failure
    Failed(AuthorizationFlowFailed),
}

discriminated! {
    AuthorizationFlowResponse("authorization flow response", discriminator = "status", fallback = "authorizing") {
        Authorizing(AuthorizationFlowAuthorizing) = "authorizing" => is_authorizing, as_authorizing, into_authorizing;
        Failed(AuthorizationFlowFailed) = "failed" => is_failed, as_failed, into_failed;
    }
}

/// Authorization flow still in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationFlowAuthorizing {
    /// Flow state, including the next action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<AuthorizationFlow>,
}

impl AuthorizationFlowAuthorizing {
    /// The action the caller has to perform next, if any.
    pub fn next_action(&self) -> Option<&AuthorizationFlowAction> {
        self.authorization_flow.as_ref().and_then(AuthorizationFlow::next_action)
    }
}

/// Authorization flow that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationFlowFailed {
    /// Where it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_stage: Option<FailureStage>,
    /// Why it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discriminated::{decode, Discriminated};
    use serde_json::json;

    fn authorizing(next: serde_json::Value) -> serde_json::Value {
        json!({
            "status": "authorizing",
            "authorization_flow": { "actions": { "next": next } }
        })
    }

    #[test]
    fn test_start_request_serialize() {
        let request = StartAuthorizationFlowRequest::new()
            .with_redirect("https://example.com/return")
            .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "provider_selection": {},
                "redirect": { "return_uri": "https://example.com/return" }
            })
        );
    }

    #[test]
    fn test_start_request_rejects_relative_uri() {
        let err = StartAuthorizationFlowRequest::new()
            .with_redirect("/return")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_submit_provider_selection_requires_id() {
        assert!(SubmitProviderSelectionRequest::new("").is_err());
        assert_eq!(
            SubmitProviderSelectionRequest::new("ob-bank").unwrap().provider_id,
            "ob-bank"
        );
    }

    #[test]
    fn test_provider_selection_action() {
        let response: AuthorizationFlowResponse = decode(authorizing(json!({
            "type": "provider_selection",
            "providers": [
                { "id": "ob-bank", "display_name": "Bank", "country_code": "GB" }
            ]
        })))
        .unwrap();

        let next = response.as_authorizing().unwrap().next_action().unwrap();
        let selection = next.as_provider_selection().unwrap();
        assert_eq!(selection.providers.len(), 1);
        assert_eq!(selection.providers[0].id, "ob-bank");
        assert!(next.as_redirect().is_err());
    }

    #[test]
    fn test_redirect_action() {
        let response: AuthorizationFlowResponse = decode(authorizing(json!({
            "type": "redirect",
            "uri": "https://bank.example/auth",
            "metadata": { "type": "provider", "id": "ob-bank" }
        })))
        .unwrap();

        let next = response.as_authorizing().unwrap().next_action().unwrap();
        let redirect = next.as_redirect().unwrap();
        assert_eq!(redirect.uri, "https://bank.example/auth");
        assert_eq!(redirect.metadata.as_ref().unwrap().provider.id, "ob-bank");
    }

    #[test]
    fn test_every_action_type() {
        for tag in AuthorizationFlowAction::registry().tags() {
            let action: AuthorizationFlowAction = decode(json!({ "type": tag })).unwrap();
            assert_eq!(action.tag(), tag);
        }
    }

    #[test]
    fn test_failed_response() {
        let response: AuthorizationFlowResponse = decode(json!({
            "status": "failed",
            "failure_stage": "authorizing",
            "failure_reason": "provider_rejected"
        }))
        .unwrap();

        assert!(response.is_failed());
        let failed = response.as_failed().unwrap();
        assert_eq!(failed.failure_stage, Some(FailureStage::Authorizing));
        assert_eq!(failed.failure_reason.as_deref(), Some("provider_rejected"));
        assert!(response.as_authorizing().is_err());
    }

    #[test]
    fn test_unknown_status_falls_back_to_authorizing() {
        let response: AuthorizationFlowResponse = decode(json!({
            "status": "brand_new_state",
            "authorization_flow": { "actions": { "next": { "type": "wait" } } }
        }))
        .unwrap();

        assert!(response.is_authorizing());
        assert!(response.as_authorizing().unwrap().next_action().unwrap().is_wait());
    }

    #[test]
    fn test_missing_status_is_an_error() {
        let err = decode::<AuthorizationFlowResponse>(json!({ "authorization_flow": {} })).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DecodeError::MissingDiscriminator { field: "status", .. }
        ));
    }
}
