use serde::{Deserialize, Serialize};

/// Subscription state of the current user as reported by `/api/subscription-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

impl SubscriptionStatus {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn active(plan_id: impl Into<String>, plan_name: impl Into<String>) -> Self {
        Self {
            is_active: true,
            plan_id: Some(plan_id.into()),
            plan_name: Some(plan_name.into()),
        }
    }

    /// Returns true if the active subscription is on the given provider price.
    pub fn is_on_price(&self, price_id: &str) -> bool {
        self.is_active && self.plan_id.as_deref() == Some(price_id)
    }
}

/// Confirmation data shown after a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    pub plan_name: String,
    /// Already formatted for display by the backend.
    pub next_billing_date: String,
    pub subscription_id: String,
}
