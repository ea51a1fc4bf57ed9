use serde::Serialize;
use url::Url;

use super::identity::UserId;

/// Placeholder the payments provider substitutes with the real session id on redirect.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// URLs the payments provider sends the browser back to.
///
/// Always derived from the page origin at call time, never from configuration
/// of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    pub success_url: String,
    pub cancel_url: String,
    pub portal_return_url: String,
}

impl ReturnUrls {
    pub fn from_origin(origin: &Url) -> Self {
        let origin = origin.origin().ascii_serialization();
        Self {
            success_url: format!(
                "{origin}/subscription/success?session_id={CHECKOUT_SESSION_PLACEHOLDER}"
            ),
            cancel_url: format!("{origin}/subscription?canceled=true"),
            portal_return_url: format!("{origin}/subscription"),
        }
    }
}

/// Body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub price_id: String,
    pub customer_id: String,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    pub fn new(
        price_id: &str,
        customer_id: &UserId,
        customer_email: Option<&str>,
        origin: &Url,
    ) -> Self {
        let urls = ReturnUrls::from_origin(origin);
        Self {
            price_id: price_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_email: customer_email.map(str::to_string),
            success_url: urls.success_url,
            cancel_url: urls.cancel_url,
        }
    }
}

/// Body of `POST /api/create-portal-session`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSessionRequest {
    pub customer_id: String,
    pub return_url: String,
}

impl PortalSessionRequest {
    pub fn new(customer_id: &UserId, origin: &Url) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            return_url: ReturnUrls::from_origin(origin).portal_return_url,
        }
    }
}
