use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{Navigator, SubscriptionApi, TokenProvider},
    domain::entities::{identity::Identity, plan::Plan},
};

pub const SIGNED_OUT_CHECKOUT_MESSAGE: &str = "You must be logged in to subscribe";

/// Hands the user over to the payments provider's hosted checkout.
///
/// This is the first half of a two-phase interaction: the provider completes
/// the purchase on its own origin and sends the browser back to the success
/// page with a session id (see `checkout_success`).
#[derive(Clone)]
pub struct CheckoutFlow {
    api: Arc<dyn SubscriptionApi>,
    tokens: Arc<dyn TokenProvider>,
    identity: watch::Receiver<Option<Identity>>,
    navigator: Arc<dyn Navigator>,
}

impl CheckoutFlow {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        tokens: Arc<dyn TokenProvider>,
        identity: watch::Receiver<Option<Identity>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            tokens,
            identity,
            navigator,
        }
    }

    /// Create a checkout session for `plan` and navigate to it.
    ///
    /// Returns the URL navigated to. On error nothing has been navigated and
    /// the caller stays interactive.
    #[instrument(skip(self, plan), fields(plan = plan.code))]
    pub async fn start(&self, plan: &Plan) -> AppResult<Url> {
        let Some(identity) = self.identity.borrow().clone() else {
            return Err(AppError::Validation(SIGNED_OUT_CHECKOUT_MESSAGE.into()));
        };

        let token = self
            .tokens
            .get_token()
            .await?
            .ok_or(AppError::AuthMissing)?;

        let url = self
            .api
            .create_checkout_session(
                plan.price_id,
                &identity.user_id,
                identity.email.as_deref(),
                &token,
            )
            .await?;

        info!(user_id = %identity.user_id, host = url.host_str().unwrap_or_default(), "redirecting to checkout");
        self.navigator.navigate(&url);
        Ok(url)
    }
}
