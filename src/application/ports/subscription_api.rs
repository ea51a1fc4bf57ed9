use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

use crate::{
    app_error::AppResult,
    domain::entities::{
        identity::{CheckoutSessionId, UserId},
        subscription::{SubscriptionDetails, SubscriptionStatus},
    },
};

/// Backend billing endpoints.
///
/// Every call is a single attempt carrying the caller's bearer token. Non-2xx
/// responses surface as `AppError::Api` tagged with the failing operation.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Returns the external checkout URL to navigate to.
    async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &UserId,
        customer_email: Option<&str>,
        token: &SecretString,
    ) -> AppResult<Url>;

    /// Returns the external billing portal URL to navigate to.
    async fn create_portal_session(
        &self,
        customer_id: &UserId,
        token: &SecretString,
    ) -> AppResult<Url>;

    async fn get_subscription_details(
        &self,
        session_id: &CheckoutSessionId,
        token: &SecretString,
    ) -> AppResult<SubscriptionDetails>;

    async fn check_subscription_status(
        &self,
        user_id: &UserId,
        token: &SecretString,
    ) -> AppResult<SubscriptionStatus>;
}
