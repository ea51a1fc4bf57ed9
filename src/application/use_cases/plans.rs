use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use tracing::error;
use url::Url;

use crate::{
    app_error::AppError,
    application::use_cases::{
        billing_portal::BillingPortalFlow, checkout::CheckoutFlow,
        subscription_store::SubscriptionState,
    },
    domain::entities::plan::{PLANS, Plan, find_plan},
};

pub const SIGN_IN_PROMPT: &str = "Please sign in to purchase a subscription";
pub const CHECKOUT_CANCELED_MESSAGE: &str =
    "Your checkout was canceled. You can try again when you're ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    fn new(severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Render model for one plan card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCard {
    pub plan: &'static Plan,
    pub is_current: bool,
    pub subscribe_enabled: bool,
    pub action_label: &'static str,
}

/// What the user has set in motion on the page.
#[derive(Default)]
struct Interaction {
    /// Plan codes with a checkout in flight.
    processing: HashSet<&'static str>,
    error: Option<String>,
}

/// State of the plans page: which card is current, which actions are
/// available and what alerts to show.
///
/// Actions take `&self` so the page can be rendered while one is pending.
pub struct PlansView {
    checkout: CheckoutFlow,
    signed_in: bool,
    canceled: bool,
    subscription: SubscriptionState,
    interaction: Mutex<Interaction>,
}

impl PlansView {
    pub fn new(
        checkout: CheckoutFlow,
        subscription: SubscriptionState,
        signed_in: bool,
        canceled: bool,
    ) -> Self {
        Self {
            checkout,
            signed_in,
            canceled,
            subscription,
            interaction: Mutex::new(Interaction::default()),
        }
    }

    fn interaction(&self) -> MutexGuard<'_, Interaction> {
        self.interaction.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the subscription snapshot, e.g. after the store refetched.
    pub fn set_subscription(&mut self, subscription: SubscriptionState) {
        self.subscription = subscription;
    }

    pub fn error(&self) -> Option<String> {
        self.interaction().error.clone()
    }

    pub fn cards(&self) -> Vec<PlanCard> {
        let interaction = self.interaction();
        PLANS
            .iter()
            .map(|plan| self.card(plan, interaction.processing.contains(plan.code)))
            .collect()
    }

    fn card(&self, plan: &'static Plan, processing: bool) -> PlanCard {
        let is_current = self
            .subscription
            .status()
            .is_some_and(|status| status.is_on_price(plan.price_id));
        let subscribe_enabled =
            self.signed_in && !processing && !self.subscription.is_loading() && !is_current;
        let action_label = if processing {
            "Processing..."
        } else if is_current {
            "Current Plan"
        } else {
            "Subscribe"
        };

        PlanCard {
            plan,
            is_current,
            subscribe_enabled,
            action_label,
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if !self.signed_in {
            alerts.push(Alert::new(AlertSeverity::Info, SIGN_IN_PROMPT));
        }
        if self.canceled {
            alerts.push(Alert::new(AlertSeverity::Info, CHECKOUT_CANCELED_MESSAGE));
        }
        if self.subscription.is_active() {
            let plan_name = self.subscription.plan_name().unwrap_or_default();
            alerts.push(Alert::new(
                AlertSeverity::Success,
                format!("You already have an active subscription to the {plan_name} plan."),
            ));
        }
        if let Some(message) = self.error() {
            alerts.push(Alert::new(AlertSeverity::Error, message));
        }
        alerts
    }

    /// Subscribe button handler. Returns the checkout URL when the handoff happened.
    pub async fn subscribe(&self, plan_code: &str) -> Option<Url> {
        let Some(plan) = find_plan(plan_code) else {
            self.interaction().error = Some(format!("Unknown plan: {plan_code}"));
            return None;
        };

        {
            let mut interaction = self.interaction();
            interaction.processing.insert(plan.code);
            interaction.error = None;
        }

        let outcome = self.checkout.start(plan).await;
        self.interaction().processing.remove(plan.code);

        match outcome {
            Ok(url) => Some(url),
            Err(err) => {
                if !matches!(err, AppError::Validation(_)) {
                    error!(plan = plan.code, code = err.code().as_str(), error = %err, "Error creating checkout session");
                }
                self.interaction().error = Some(err.to_string());
                None
            }
        }
    }

    /// Portal handoff from the plans page. Failures become the page error.
    pub async fn manage_billing(&self, portal: &BillingPortalFlow) -> Option<Url> {
        self.interaction().error = None;
        match portal.open().await {
            Ok(url) => Some(url),
            Err(err) => {
                if !matches!(err, AppError::Validation(_)) {
                    error!(code = err.code().as_str(), error = %err, "Error creating portal session");
                }
                self.interaction().error = Some(err.to_string());
                None
            }
        }
    }
}
