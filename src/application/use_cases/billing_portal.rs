use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{Navigator, SubscriptionApi, TokenProvider},
    domain::entities::identity::Identity,
};

pub const SIGNED_OUT_PORTAL_MESSAGE: &str = "You must be logged in to manage your subscription";

/// Sends the user to the provider-hosted billing portal.
#[derive(Clone)]
pub struct BillingPortalFlow {
    api: Arc<dyn SubscriptionApi>,
    tokens: Arc<dyn TokenProvider>,
    identity: watch::Receiver<Option<Identity>>,
    navigator: Arc<dyn Navigator>,
}

impl BillingPortalFlow {
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

    #[instrument(skip(self))]
    pub async fn open(&self) -> AppResult<Url> {
        let Some(identity) = self.identity.borrow().clone() else {
            return Err(AppError::Validation(SIGNED_OUT_PORTAL_MESSAGE.into()));
        };

        let token = self
            .tokens
            .get_token()
            .await?
            .ok_or(AppError::AuthMissing)?;

        let url = self
            .api
            .create_portal_session(&identity.user_id, &token)
            .await?;

        info!(user_id = %identity.user_id, "redirecting to billing portal");
        self.navigator.navigate(&url);
        Ok(url)
    }
}
