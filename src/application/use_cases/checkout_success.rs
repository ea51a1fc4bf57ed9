use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::{SubscriptionApi, TokenProvider},
        use_cases::billing_portal::BillingPortalFlow,
    },
    domain::entities::{
        identity::{CheckoutSessionId, Identity},
        subscription::SubscriptionDetails,
    },
};

pub const SIGNED_OUT_DETAILS_MESSAGE: &str =
    "You need to be signed in to view subscription details";
pub const MISSING_SESSION_MESSAGE: &str = "No subscription information found";
pub const DETAILS_UNAVAILABLE_MESSAGE: &str = "Could not load subscription details";
pub const PORTAL_UNAVAILABLE_MESSAGE: &str = "Could not access billing portal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessViewState {
    Loading,
    /// Terminal for this view; the page offers a way back home.
    Error { message: String },
    Confirmed(SubscriptionDetails),
}

/// The page the payments provider redirects to after a completed checkout.
///
/// Correlates the provider's session id with subscription details exactly
/// once per view. The state is owned by the view and dropped with it.
pub struct CheckoutSuccessView {
    api: Arc<dyn SubscriptionApi>,
    tokens: Arc<dyn TokenProvider>,
    identity: watch::Receiver<Option<Identity>>,
    portal: BillingPortalFlow,
    state: SuccessViewState,
}

impl CheckoutSuccessView {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        tokens: Arc<dyn TokenProvider>,
        identity: watch::Receiver<Option<Identity>>,
        portal: BillingPortalFlow,
    ) -> Self {
        Self {
            api,
            tokens,
            identity,
            portal,
            state: SuccessViewState::Loading,
        }
    }

    pub fn state(&self) -> &SuccessViewState {
        &self.state
    }

    /// Reconcile the redirect. `session_id` is the raw `session_id` query value.
    #[instrument(skip(self))]
    pub async fn load(&mut self, session_id: Option<&str>) -> &SuccessViewState {
        let signed_in = self.identity.borrow().is_some();
        let session_id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(CheckoutSessionId::new);

        self.state = match (signed_in, session_id) {
            (false, _) => SuccessViewState::Error {
                message: SIGNED_OUT_DETAILS_MESSAGE.into(),
            },
            (true, None) => SuccessViewState::Error {
                message: MISSING_SESSION_MESSAGE.into(),
            },
            (true, Some(session_id)) => match self.fetch_details(&session_id).await {
                Ok(details) => SuccessViewState::Confirmed(details),
                Err(err) => {
                    error!(
                        session_id = %session_id,
                        code = err.code().as_str(),
                        error = %err,
                        "Error fetching subscription details"
                    );
                    SuccessViewState::Error {
                        message: DETAILS_UNAVAILABLE_MESSAGE.into(),
                    }
                }
            },
        };

        &self.state
    }

    async fn fetch_details(&self, session_id: &CheckoutSessionId) -> AppResult<SubscriptionDetails> {
        let token = self
            .tokens
            .get_token()
            .await?
            .ok_or(AppError::AuthMissing)?;
        self.api.get_subscription_details(session_id, &token).await
    }

    /// "Manage Billing" on the confirmation card.
    ///
    /// On failure the view switches to its error state.
    pub async fn manage_billing(&mut self) -> Option<url::Url> {
        match self.portal.open().await {
            Ok(url) => Some(url),
            Err(AppError::Validation(message)) => {
                self.state = SuccessViewState::Error { message };
                None
            }
            Err(err) => {
                warn!(code = err.code().as_str(), error = %err, "Error creating portal session");
                self.state = SuccessViewState::Error {
                    message: PORTAL_UNAVAILABLE_MESSAGE.into(),
                };
                None
            }
        }
    }
}
