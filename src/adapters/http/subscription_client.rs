use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::{
    adapters::http::response::handle_response,
    app_error::{ApiOperation, AppError, AppResult},
    application::ports::SubscriptionApi,
    domain::entities::{
        checkout::{CheckoutSessionRequest, PortalSessionRequest},
        identity::{CheckoutSessionId, UserId},
        subscription::{SubscriptionDetails, SubscriptionStatus},
    },
};

// Relative, so a base URL with a path prefix keeps it.
const CHECKOUT_SESSION_PATH: &str = "api/create-checkout-session";
const PORTAL_SESSION_PATH: &str = "api/create-portal-session";
const SUBSCRIPTION_DETAILS_PATH: &str = "api/subscription-details";
const SUBSCRIPTION_STATUS_PATH: &str = "api/subscription-status";

#[derive(Deserialize)]
struct SessionUrlResponse {
    url: String,
}

/// reqwest client for the backend billing endpoints.
#[derive(Clone)]
pub struct HttpSubscriptionClient {
    client: Client,
    base_url: Url,
    origin: Url,
}

impl HttpSubscriptionClient {
    /// `base_url` is where the backend lives; `origin` is the page origin the
    /// provider redirects back to.
    pub fn new(client: Client, base_url: Url, origin: Url) -> Self {
        Self {
            client,
            base_url,
            origin,
        }
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid API base URL: {e}")))
    }

    async fn post_for_url<B: serde::Serialize + Sync>(
        &self,
        operation: ApiOperation,
        path: &str,
        body: &B,
        token: &SecretString,
    ) -> AppResult<Url> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;

        let session: SessionUrlResponse = handle_response(operation, response).await?;
        Url::parse(&session.url)
            .map_err(|e| AppError::InvalidResponse(format!("{operation}: invalid redirect URL: {e}")))
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionClient {
    #[instrument(skip(self, customer_email, token))]
    async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &UserId,
        customer_email: Option<&str>,
        token: &SecretString,
    ) -> AppResult<Url> {
        let body = CheckoutSessionRequest::new(price_id, customer_id, customer_email, &self.origin);
        self.post_for_url(ApiOperation::CheckoutSession, CHECKOUT_SESSION_PATH, &body, token)
            .await
    }

    #[instrument(skip(self, token))]
    async fn create_portal_session(
        &self,
        customer_id: &UserId,
        token: &SecretString,
    ) -> AppResult<Url> {
        let body = PortalSessionRequest::new(customer_id, &self.origin);
        self.post_for_url(ApiOperation::PortalSession, PORTAL_SESSION_PATH, &body, token)
            .await
    }

    #[instrument(skip(self, token))]
    async fn get_subscription_details(
        &self,
        session_id: &CheckoutSessionId,
        token: &SecretString,
    ) -> AppResult<SubscriptionDetails> {
        let response = self
            .client
            .get(self.endpoint(SUBSCRIPTION_DETAILS_PATH)?)
            .query(&[("session_id", session_id.as_str())])
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        handle_response(ApiOperation::SubscriptionDetails, response).await
    }

    #[instrument(skip(self, token))]
    async fn check_subscription_status(
        &self,
        user_id: &UserId,
        token: &SecretString,
    ) -> AppResult<SubscriptionStatus> {
        let response = self
            .client
            .get(self.endpoint(SUBSCRIPTION_STATUS_PATH)?)
            .query(&[("user_id", user_id.as_str())])
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        handle_response(ApiOperation::SubscriptionStatus, response).await
    }
}
